use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::urgent_request;
use crate::state::AppState;

/// Routes mounted at `/urgent-request`.
///
/// ```text
/// GET    /        -> list_urgent_requests
/// POST   /        -> create_urgent_request
/// PATCH  /{id}    -> resolve_urgent_request (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(urgent_request::list_urgent_requests).post(urgent_request::create_urgent_request),
        )
        .route("/{id}", patch(urgent_request::resolve_urgent_request))
}
