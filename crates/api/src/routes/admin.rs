use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /settings/booking-quota   -> get_booking_quota
/// PUT    /settings/booking-quota   -> update_booking_quota
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/settings/booking-quota",
        get(settings::get_booking_quota).put(settings::update_booking_quota),
    )
}
