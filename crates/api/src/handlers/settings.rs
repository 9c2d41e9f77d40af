//! Administrator settings: the global booking quota.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use mentora_core::error::CoreError;
use mentora_db::repositories::SettingRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Quota payload; `0` means unlimited.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuota {
    pub max_bookings_per_user: i64,
}

/// GET /api/v1/admin/settings/booking-quota
pub async fn get_booking_quota(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let max_bookings_per_user = SettingRepo::max_bookings_per_user(&state.pool).await?;
    Ok(Json(DataResponse {
        data: BookingQuota {
            max_bookings_per_user,
        },
    }))
}

/// PUT /api/v1/admin/settings/booking-quota
pub async fn update_booking_quota(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<BookingQuota>,
) -> AppResult<impl IntoResponse> {
    if input.max_bookings_per_user < 0 {
        return Err(CoreError::Validation(
            "maxBookingsPerUser must be zero (unlimited) or positive".into(),
        )
        .into());
    }

    let max_bookings_per_user =
        SettingRepo::set_max_bookings_per_user(&state.pool, input.max_bookings_per_user).await?;
    tracing::info!(
        max_bookings_per_user,
        user_id = admin.user_id,
        "Booking quota updated"
    );
    Ok(Json(DataResponse {
        data: BookingQuota {
            max_bookings_per_user,
        },
    }))
}
