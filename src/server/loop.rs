// Server loop module
// Accepts connections until shutdown is requested, then drains in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Interval at which the drain phase re-checks the connection counter
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop on the current `LocalSet`.
///
/// Returns after a shutdown signal once every in-flight connection has
/// finished, or once the drain deadline has passed.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) {
    loop {
        if signals.is_shutdown_requested() {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = signals.shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    let performance = &state.config.performance;
    let grace = Duration::from_secs(std::cmp::max(
        performance.read_timeout,
        performance.write_timeout,
    ));
    drain_connections(&active_connections, grace).await;
}

/// Wait until no connection is active or `grace` elapses
async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {} connection(s) still open",
                active_connections.load(Ordering::SeqCst)
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}
