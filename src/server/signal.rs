// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown coordination shared between the signal task and the server loop
pub struct SignalHandler {
    /// Woken once when shutdown is requested
    pub shutdown: Notify,
    shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Notify::new(),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Mark shutdown as requested and wake the server loop.
    ///
    /// `notify_one` stores a permit, so the request is not lost if the loop
    /// is between `select!` iterations.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the signal listener task (Unix)
///
/// | Signal  | Action         |
/// |---------|----------------|
/// | SIGTERM | Graceful stop  |
/// | SIGINT  | Graceful stop  |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        logger::log_warning(&format!("[Signal] {name} received, shutting down gracefully"));
        handler.request_shutdown();
    });

    Ok(())
}

/// Non-Unix fallback: only Ctrl+C is supported
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_warning("[Signal] Ctrl+C received, shutting down gracefully");
            handler.request_shutdown();
        }
    });

    Ok(())
}
