use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Deployed version (`APP_VERSION`).
    pub version: String,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// GET|HEAD /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = product_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: state.config.app_version.clone(),
        db_healthy,
    })
}

/// Mount health check routes. `get` also answers HEAD.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
