use std::sync::Arc;

use mentora_events::{ConnectionRegistry, NotificationDispatcher};

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: mentora_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Live sessions keyed by authenticated user.
    pub registry: Arc<ConnectionRegistry>,
    /// Persists notifications and pushes them through `registry`.
    pub dispatcher: NotificationDispatcher,
}

impl AppState {
    /// Assemble state around a pool, wiring a fresh registry into the dispatcher.
    pub fn new(pool: mentora_db::DbPool, config: ServerConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = NotificationDispatcher::new(pool.clone(), Arc::clone(&registry));
        Self {
            pool,
            config: Arc::new(config),
            registry,
            dispatcher,
        }
    }
}
