pub mod admin;
pub mod availability;
pub mod booking;
pub mod health;
pub mod notification;
pub mod reservation_type;
pub mod urgent_request;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                              WebSocket
/// /availability                    list, create (admin)
/// /availability/{id}               delete (admin)
/// /reservation-types               list, create (admin)
/// /reservation-types/{id}          update, delete (admin)
/// /bookings                        list (role-scoped), create
/// /bookings/{id}                   cancel
/// /urgent-request                  list (role-scoped), create
/// /urgent-request/{id}             resolve (admin)
/// /notifications/...               owner-scoped inbox
/// /admin/settings/booking-quota    get, update (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/availability", availability::router())
        .nest("/reservation-types", reservation_type::router())
        .nest("/bookings", booking::router())
        .nest("/urgent-request", urgent_request::router())
        .nest("/notifications", notification::router())
        .nest("/admin", admin::router())
}

/// The full application router without middleware layers.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1", api_routes())
}
