use std::sync::Arc;

use costume_engine::Engine;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Domain engine over the configured entity store.
    pub engine: Arc<Engine>,
    pub config: Arc<ServerConfig>,
}
