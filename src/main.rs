use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use imgroute::config::{AppState, Config};
use imgroute::logger;
use imgroute::server::{self, SignalHandler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;
    cfg.validate()?;

    // Tokio runtime, worker threads from config (defaults to CPU cores)
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    for warning in cfg.startup_warnings() {
        logger::log_warning(&warning);
    }

    let state = Arc::new(AppState::from_config(&cfg));
    let listener = server::create_listener(addr)?;

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))?;

    logger::log_server_start(&addr, &cfg, state.store.name(), state.routes.len());

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            Arc::new(AtomicUsize::new(0)),
            signals,
        ))
        .await;

    Ok(())
}
