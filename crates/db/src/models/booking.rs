//! Booking models and DTOs.

use mentora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::reservation_type::ReservationTypeSummary;
use super::user::UserSummary;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub user_id: DbId,
    pub date_time: Timestamp,
    pub end_time: Timestamp,
    pub status: String,
    pub reservation_type_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for a slot claim.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: DbId,
    pub date_time: Timestamp,
    pub reservation_type_id: Option<DbId>,
}

/// Flat join row backing [`BookingDetails`].
#[derive(Debug, FromRow)]
pub(crate) struct BookingDetailsRow {
    pub id: DbId,
    pub user_id: DbId,
    pub date_time: Timestamp,
    pub end_time: Timestamp,
    pub status: String,
    pub reservation_type_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub reservation_type_name: Option<String>,
    pub reservation_type_duration: Option<i32>,
    pub user_name: String,
}

/// A booking with its reservation type and owner embedded, as listed.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    pub id: DbId,
    pub user_id: DbId,
    pub date_time: Timestamp,
    pub end_time: Timestamp,
    pub status: String,
    pub reservation_type_id: Option<DbId>,
    pub reservation_type: Option<ReservationTypeSummary>,
    pub user: UserSummary,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BookingDetailsRow> for BookingDetails {
    fn from(row: BookingDetailsRow) -> Self {
        let reservation_type = match (
            row.reservation_type_id,
            row.reservation_type_name,
            row.reservation_type_duration,
        ) {
            (Some(id), Some(name), Some(duration_minutes)) => Some(ReservationTypeSummary {
                id,
                name,
                duration_minutes,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            user_id: row.user_id,
            date_time: row.date_time,
            end_time: row.end_time,
            status: row.status,
            reservation_type_id: row.reservation_type_id,
            reservation_type,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Result of a cancellation: the updated row and whether it was active before.
#[derive(Debug, Clone)]
pub struct CancelledBooking {
    pub booking: Booking,
    pub was_booked: bool,
}
