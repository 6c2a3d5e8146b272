// Server loop module
// Accepts connections until shutdown is requested, then drains in-flight connections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop on `listener` until `state.shutdown` fires.
///
/// On shutdown the listening socket is closed first, so new connection
/// attempts are refused, then every live connection is asked to finish its
/// current request. The drain waits for all of them unless
/// `performance.shutdown_timeout` sets a bound.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let graceful = GracefulShutdown::new();
    let active_connections = Arc::new(AtomicUsize::new(0));
    let local_addr = listener.local_addr().ok();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => {
                        // Per-connection accept failures (e.g. EMFILE, aborted handshakes) are not fatal
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = state.shutdown.wait() => break,
        }
    }

    drop(listener);
    logger::log_shutdown_draining(active_connections.load(Ordering::SeqCst));

    match state.config.performance.shutdown_timeout {
        None => graceful.shutdown().await,
        Some(secs) => {
            let drain_timeout = Duration::from_secs(secs);
            if tokio::time::timeout(drain_timeout, graceful.shutdown())
                .await
                .is_err()
            {
                logger::log_warning(&format!(
                    "Shutdown timeout of {secs} seconds reached: dropping {} connection(s) \
                     with requests still in progress",
                    active_connections.load(Ordering::SeqCst)
                ));
            }
        }
    }

    logger::log_shutdown_complete(local_addr.as_ref());
    Ok(())
}
