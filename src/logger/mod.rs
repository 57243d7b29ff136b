//! Logger module
//!
//! Provides logging utilities for the image router including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error, warning and debug logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        config.logging.debug_enabled(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn debug_enabled() -> bool {
    writer::get().is_some_and(writer::LogWriter::debug_enabled)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, store_name: &str, route_count: usize) {
    write_info("======================================");
    write_info("Image router started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info(&format!("Store backend: {store_name}"));
    if store_name == "directory" {
        write_info(&format!("Store root: {}", config.store.root));
    }
    write_info(&format!("Manual routes: {route_count}"));
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Debug line, dropped unless the configured level is `debug` or `trace`
pub fn log_debug(message: &str) {
    if debug_enabled() {
        write_info(&format!("[DEBUG] {message}"));
    }
}

/// Result of one store lookup during candidate resolution
pub fn log_probe(key: &str, hit: bool) {
    if debug_enabled() {
        let outcome = if hit { "hit" } else { "miss" };
        write_info(&format!("[DEBUG] [Probe] {key}: {outcome}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown(active_connections: usize) {
    write_info(&format!(
        "[Shutdown] Listener closed, {active_connections} connection(s) still in flight"
    ));
}
