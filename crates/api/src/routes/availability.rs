use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::availability;
use crate::state::AppState;

/// Routes mounted at `/availability`.
///
/// ```text
/// GET    /        -> list_availability
/// POST   /        -> create_availability (admin)
/// DELETE /{id}    -> delete_availability (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(availability::list_availability).post(availability::create_availability),
        )
        .route("/{id}", delete(availability::delete_availability))
}
