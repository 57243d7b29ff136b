// Configuration data structures
// Every section falls back to its Default impl when missing from the file

use serde::Deserialize;

/// Top-level settings, one field per config file section
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub routes: RoutesConfig,
    pub store: StoreConfig,
}

/// `[server]`: bind address and runtime size
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; CPU count when unset
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

/// `[logging]`
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `debug` or `trace` also logs each store probe
    pub level: String,
    pub access_log: bool,
    /// `combined`, `common`, `json`, or a `$variable` pattern
    pub access_log_format: String,
    /// stdout when unset
    pub access_log_file: Option<String>,
    /// stderr when unset
    pub error_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

impl LoggingConfig {
    pub fn debug_enabled(&self) -> bool {
        self.level.eq_ignore_ascii_case("debug") || self.level.eq_ignore_ascii_case("trace")
    }
}

/// `[performance]`: connection limits, timeouts in seconds
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PerformanceConfig {
    /// 0 disables keep-alive
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        }
    }
}

/// `[http]`
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct HttpConfig {
    /// Add CORS headers to OPTIONS responses
    pub enable_cors: bool,
}

/// `[routes]`: manual short-path routes and probe endpoints
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RoutesConfig {
    /// Manual routes, grouped by the extension of the stored object.
    /// Later groups overwrite earlier ones for the same short path.
    pub groups: Vec<RouteGroup>,
    pub health: HealthConfig,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                RouteGroup::new("jpg", &["muppet", "legend", "genius"]),
                RouteGroup::new("jpeg", &["idiot"]),
                RouteGroup::new("gif", &["tool"]),
            ],
            health: HealthConfig::default(),
        }
    }
}

/// A set of short paths whose stored objects share one extension
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteGroup {
    pub extension: String,
    pub paths: Vec<String>,
}

impl RouteGroup {
    pub fn new(extension: &str, paths: &[&str]) -> Self {
        Self {
            extension: extension.to_string(),
            paths: paths.iter().map(ToString::to_string).collect(),
        }
    }
}

/// `[routes.health]`: liveness/readiness probe paths, answered before any
/// image lookup
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HealthConfig {
    pub enabled: bool,
    pub liveness_path: String,
    pub readiness_path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            liveness_path: "/healthz".to_string(),
            readiness_path: "/readyz".to_string(),
        }
    }
}

/// Object store backend selection
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Objects are files under `store.root`
    #[default]
    Directory,
    /// Process-local map that starts empty. Only useful when the router is
    /// embedded and the host fills the store; the standalone binary serves
    /// nothing but 404s with it.
    Memory,
}

/// `[store]`
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Directory backend root; keys resolve relative to it
    pub root: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Directory,
            root: "images".to_string(),
        }
    }
}
