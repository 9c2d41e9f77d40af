use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /        -> list_bookings
/// POST   /        -> create_booking
/// PATCH  /{id}    -> update_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(booking::list_bookings).post(booking::create_booking))
        .route("/{id}", patch(booking::update_booking))
}
