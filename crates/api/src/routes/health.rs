use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Open live-transport sessions.
    pub live_sessions: usize,
    /// Users whose pushes are routed to a session.
    pub authenticated_users: usize,
}

/// GET /health -- service, database and live-transport health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = mentora_db::health_check(&state.pool).await.is_ok();
    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        live_sessions: state.registry.connection_count().await,
        authenticated_users: state.registry.registered_user_count().await,
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
