use std::sync::Arc;

use campus_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campus_db::DbPool,
    /// Server configuration, including the forum policy.
    pub config: Arc<ServerConfig>,
    /// Event bus carrying secondary effects to the dispatcher.
    pub events: Arc<EventBus>,
}
