//! Handlers for the `/reservation-types` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mentora_core::error::CoreError;
use mentora_core::scheduling::validate_duration_minutes;
use mentora_core::types::DbId;
use mentora_db::models::reservation_type::{CreateReservationType, UpdateReservationType};
use mentora_db::repositories::ReservationTypeRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    Ok(())
}

/// GET /api/v1/reservation-types
pub async fn list_reservation_types(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let types = ReservationTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// POST /api/v1/reservation-types
pub async fn create_reservation_type(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateReservationType>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    validate_duration_minutes(input.duration_minutes)?;

    let created = ReservationTypeRepo::create(&state.pool, &input).await?;
    tracing::info!(
        reservation_type_id = created.id,
        duration_minutes = created.duration_minutes,
        "Reservation type created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/reservation-types/{id}
pub async fn update_reservation_type(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateReservationType>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(minutes) = input.duration_minutes {
        validate_duration_minutes(minutes)?;
    }

    let updated = ReservationTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ReservationType",
            id,
        })?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/reservation-types/{id}
///
/// 409 while a booked booking references the type.
pub async fn delete_reservation_type(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    ReservationTypeRepo::delete_unreferenced(&state.pool, id).await?;
    tracing::info!(reservation_type_id = id, "Reservation type deleted");
    Ok(StatusCode::NO_CONTENT)
}
