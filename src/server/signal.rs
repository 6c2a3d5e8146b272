// Signal handling module
//
// SIGTERM and SIGINT (Ctrl+C) request the same graceful shutdown as `?quit=1`.

use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Start the OS signal listener (Unix)
///
/// The background task exits after the first signal, or as soon as shutdown
/// was requested some other way.
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    logger::log_error(&format!("Failed to register signal handlers: {e}"));
                    return;
                }
            };

        let source = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
            () = state.shutdown.wait() => return,
        };

        logger::log_shutdown_requested(source);
        state.shutdown.request();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>) {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
                    return;
                }
                logger::log_shutdown_requested("Ctrl+C");
                state.shutdown.request();
            }
            () = state.shutdown.wait() => {}
        }
    });
}
