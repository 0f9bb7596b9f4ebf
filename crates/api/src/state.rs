use std::sync::Arc;

use product_storage::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: product_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Backend serving `/images/{filename}`.
    pub images: Arc<dyn ImageStore>,
}
