use std::sync::Arc;

use todo_db::store::SharedTodoStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Todo persistence backend.
    pub store: SharedTodoStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
