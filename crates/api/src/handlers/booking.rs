//! Handlers for the `/bookings` resource.
//!
//! Creation goes through [`BookingRepo::claim_slot`], which enforces the
//! quota and the no-overlap rule atomically. Administrator notifications
//! are sent after the claim commits.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use mentora_core::error::CoreError;
use mentora_core::notification::{
    admin_cancellation_message, new_booking_message, student_cancellation_message, KIND_BOOKING,
};
use mentora_core::scheduling::BookingStatus;
use mentora_core::types::{DbId, Timestamp};
use mentora_db::models::booking::{Booking, NewBooking};
use mentora_db::models::user::User;
use mentora_db::repositories::{BookingRepo, ReservationTypeRepo, UserRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Booking owner; students may omit it or pass their own id.
    pub user_id: Option<DbId>,
    pub date_time: Timestamp,
    pub reservation_type_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub status: String,
}

async fn load_user(state: &AppState, id: DbId) -> AppResult<User> {
    Ok(UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?)
}

/// GET /api/v1/bookings
///
/// Administrators see every booking; students only their own.
pub async fn list_bookings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let scope = if auth.is_admin() {
        None
    } else {
        Some(auth.user_id)
    };
    let bookings = BookingRepo::list_details(&state.pool, scope).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// POST /api/v1/bookings
///
/// Returns 200 with the new booking; administrators are notified after
/// the claim commits.
pub async fn create_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth.acting_for(input.user_id)?;
    let owner = load_user(&state, user_id).await?;

    let booking = BookingRepo::claim_slot(
        &state.pool,
        &NewBooking {
            user_id,
            date_time: input.date_time,
            reservation_type_id: input.reservation_type_id,
        },
        chrono::Utc::now(),
    )
    .await?;

    tracing::info!(
        booking_id = booking.id,
        user_id,
        start = %booking.date_time,
        end = %booking.end_time,
        "Booking created"
    );

    // The booking is committed; a failed lookup only drops the type name.
    let type_name = match booking.reservation_type_id {
        Some(type_id) => match ReservationTypeRepo::find_by_id(&state.pool, type_id).await {
            Ok(found) => found.map(|t| t.name),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    reservation_type_id = type_id,
                    "Failed to load reservation type name"
                );
                None
            }
        },
        None => None,
    };
    let message = new_booking_message(
        &owner.name,
        booking.date_time,
        booking.end_time,
        type_name.as_deref(),
    );
    state.dispatcher.notify_admins(&message, KIND_BOOKING).await;

    Ok(Json(DataResponse { data: booking }))
}

/// PATCH /api/v1/bookings/{id}
///
/// Only `{"status":"cancelled"}` is accepted. Students may cancel their own
/// bookings; administrators any. Repeating a cancellation is a no-op.
pub async fn update_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    if BookingStatus::parse(&input.status)? != BookingStatus::Cancelled {
        return Err(CoreError::Validation("status must be 'cancelled'".into()).into());
    }

    let existing = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id,
        })?;
    if !auth.is_admin() && existing.user_id != auth.user_id {
        return Err(CoreError::Forbidden("Booking belongs to another user".into()).into());
    }

    let cancelled = BookingRepo::cancel(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id,
        })?;
    let booking = cancelled.booking;

    if cancelled.was_booked {
        tracing::info!(
            booking_id = booking.id,
            user_id = auth.user_id,
            "Booking cancelled"
        );
    }

    if cancelled.was_booked && auth.is_admin() {
        notify_admin_cancellation(&state, &booking, auth.user_id).await;
    }

    Ok(Json(DataResponse { data: booking }))
}

/// Tell every administrator, and the owner unless they are the acting
/// administrator, that a booked slot was cancelled.
///
/// Runs after the cancellation committed, so failures are only logged.
async fn notify_admin_cancellation(state: &AppState, booking: &Booking, admin_id: DbId) {
    let owner_name = match UserRepo::find_by_id(&state.pool, booking.user_id).await {
        Ok(Some(owner)) => owner.name,
        Ok(None) => format!("user #{}", booking.user_id),
        Err(e) => {
            tracing::warn!(error = %e, user_id = booking.user_id, "Failed to load booking owner");
            format!("user #{}", booking.user_id)
        }
    };

    state
        .dispatcher
        .notify_admins(
            &admin_cancellation_message(&owner_name, booking.date_time),
            KIND_BOOKING,
        )
        .await;

    if booking.user_id != admin_id {
        if let Err(e) = state
            .dispatcher
            .notify(
                booking.user_id,
                &student_cancellation_message(booking.date_time),
                KIND_BOOKING,
                None,
            )
            .await
        {
            tracing::error!(error = %e, user_id = booking.user_id, "Failed to notify booking owner");
        }
    }
}
