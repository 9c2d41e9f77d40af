use axum::routing::{get, put};
use axum::Router;

use crate::handlers::reservation_type;
use crate::state::AppState;

/// Routes mounted at `/reservation-types`.
///
/// ```text
/// GET    /        -> list_reservation_types
/// POST   /        -> create_reservation_type (admin)
/// PUT    /{id}    -> update_reservation_type (admin)
/// DELETE /{id}    -> delete_reservation_type (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reservation_type::list_reservation_types)
                .post(reservation_type::create_reservation_type),
        )
        .route(
            "/{id}",
            put(reservation_type::update_reservation_type)
                .delete(reservation_type::delete_reservation_type),
        )
}
