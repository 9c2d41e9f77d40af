//! Handlers for the `/availability` resource.
//!
//! Listing is open to any authenticated user; create and delete are
//! administrator-only.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mentora_core::availability::{validate_days, validate_hours};
use mentora_core::types::{CalendarDay, DbId};
use mentora_db::repositories::AvailabilityRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListAvailabilityQuery {
    /// Include windows on days before today. Defaults to `false`.
    pub include_past: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityRequest {
    /// Window owner; defaults to the calling administrator.
    pub owner_id: Option<DbId>,
    pub days: Vec<CalendarDay>,
    pub from_hour: i16,
    pub to_hour: i16,
}

#[derive(Debug, Serialize)]
pub struct CreatedCount {
    pub created: u64,
}

/// GET /api/v1/availability
pub async fn list_availability(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListAvailabilityQuery>,
) -> AppResult<impl IntoResponse> {
    let from = if params.include_past.unwrap_or(false) {
        None
    } else {
        Some(chrono::Utc::now().date_naive())
    };
    let windows = AvailabilityRepo::list(&state.pool, from).await?;
    Ok(Json(DataResponse { data: windows }))
}

/// POST /api/v1/availability
///
/// Creates one window per requested day. Days the owner already has are
/// skipped, so `created` may be lower than the number of days sent.
pub async fn create_availability(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateAvailabilityRequest>,
) -> AppResult<impl IntoResponse> {
    validate_hours(input.from_hour, input.to_hour)?;
    validate_days(&input.days)?;
    let owner_id = input.owner_id.unwrap_or(admin.user_id);

    let created = AvailabilityRepo::create_for_days(
        &state.pool,
        owner_id,
        &input.days,
        input.from_hour,
        input.to_hour,
    )
    .await?;

    tracing::info!(
        owner_id,
        requested = input.days.len(),
        created,
        "Availability created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedCount { created },
        }),
    ))
}

/// DELETE /api/v1/availability/{id}
///
/// 409 while a booked booking starts on the window's day.
pub async fn delete_availability(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    AvailabilityRepo::delete_unbooked(&state.pool, id).await?;
    tracing::info!(availability_id = id, user_id = admin.user_id, "Availability deleted");
    Ok(StatusCode::NO_CONTENT)
}
