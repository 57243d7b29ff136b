// Application state module
// Holds the values built once at startup and shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::routing::RouteTable;
use crate::store::{self, ImageStore};

/// Application state
///
/// Read-only after construction, so connections share it through `Arc`
/// without locking.
pub struct AppState {
    pub config: Config,
    pub routes: Arc<RouteTable>,
    pub store: Arc<dyn ImageStore>,
}

impl AppState {
    /// Create `AppState` with the store selected by configuration
    pub fn from_config(config: &Config) -> Self {
        let store = store::from_config(&config.store);
        Self::new(config, store)
    }

    /// Create `AppState` around an existing store
    pub fn new(config: &Config, store: Arc<dyn ImageStore>) -> Self {
        let routes = Arc::new(RouteTable::from_groups(&config.routes.groups));
        Self {
            config: config.clone(),
            routes,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Memory;
        let state = AppState::from_config(&config);
        assert_eq!(state.store.name(), "memory");
        assert_eq!(state.routes.get("tool"), Some("tool.gif"));
    }

    #[test]
    fn test_directory_backend_default() {
        let state = AppState::from_config(&Config::default());
        assert_eq!(state.store.name(), "directory");
    }
}
