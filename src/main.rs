use std::env;
use std::sync::Arc;

use quittable_httpd::config::{AppState, CliArgs, Config};
use quittable_httpd::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse(env::args().skip(1))?;
    let cfg = Config::load_from(&args.config_path, args.port.as_deref())?;
    logger::init(&cfg.logging)?;

    // Create the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let state = Arc::new(AppState::new(cfg)?);

    let listener = server::bind_listener(addr).map_err(|e| {
        logger::log_error(&format!("Failed to bind {addr}: {e}"));
        e
    })?;
    let local_addr = listener.local_addr()?;
    logger::log_server_start(&local_addr, &state.config, &state.root);

    server::start_signal_handler(Arc::clone(&state));
    server::serve(listener, state).await?;
    Ok(())
}
