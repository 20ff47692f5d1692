use std::sync::Arc;

use setcrm_db::store::Stores;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// One store per table, all from the configured backend.
    pub stores: Stores,
    /// Server configuration (upload limits, media directories, thresholds).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(stores: Stores, config: ServerConfig) -> Self {
        Self {
            stores,
            config: Arc::new(config),
        }
    }
}
