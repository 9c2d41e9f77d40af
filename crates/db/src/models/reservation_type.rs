//! Reservation type (meeting duration) models and DTOs.

use mentora_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reservation_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReservationType {
    pub id: DbId,
    pub name: String,
    pub duration_minutes: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Reservation type projection embedded in booking listings.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationTypeSummary {
    pub id: DbId,
    pub name: String,
    pub duration_minutes: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationType {
    pub name: String,
    pub duration_minutes: i32,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationType {
    pub name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
}
