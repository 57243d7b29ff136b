// Configuration module entry point
// Loads and validates application configuration, holds shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::routing::overridden_paths;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, RouteGroup, RoutesConfig,
    ServerConfig, StoreBackend, StoreConfig,
};

/// Config file used when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration using the first command line argument as the
    /// config file path (without extension), or `config` if absent
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Environment variables override file values, e.g.
    /// `IMGROUTE_SERVER__PORT=9000` or `IMGROUTE_STORE__ROOT=/srv/images`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("IMGROUTE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.enable_cors", false)?
            .set_default("store.backend", "directory")?
            .set_default("store.root", "images")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Settings that are valid but probably not what the operator meant
    pub fn startup_warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = overridden_paths(&self.routes.groups)
            .into_iter()
            .map(|(path, key)| {
                format!("Short path '{path}' is listed under several extensions; serving '{key}'")
            })
            .collect();

        if self.store.backend == StoreBackend::Memory {
            warnings.push(
                "store.backend = \"memory\" starts empty and nothing fills it in the standalone server; every image request will be 404"
                    .to_string(),
            );
        }
        warnings
    }

    /// Check the loaded configuration before the server starts
    pub fn validate(&self) -> Result<(), String> {
        self.get_socket_addr()?;

        for group in &self.routes.groups {
            if !is_valid_segment(&group.extension) {
                return Err(format!(
                    "Invalid route extension '{}': must be non-empty and contain no path separators",
                    group.extension
                ));
            }
            if let Some(path) = group.paths.iter().find(|p| !is_valid_segment(p)) {
                return Err(format!(
                    "Invalid short path '{path}' under extension '{}': must be non-empty and contain no path separators",
                    group.extension
                ));
            }
        }

        if self.store.backend == StoreBackend::Directory && self.store.root.is_empty() {
            return Err("store.root must be set for the directory backend".to_string());
        }

        Ok(())
    }
}

fn is_valid_segment(s: &str) -> bool {
    !s.is_empty() && !s.contains(['/', '\\'])
}
