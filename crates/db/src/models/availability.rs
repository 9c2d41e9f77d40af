//! Availability window model.

use mentora_core::types::{CalendarDay, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `availabilities` table: one bookable day for an owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Availability {
    pub id: DbId,
    pub owner_id: DbId,
    pub date: CalendarDay,
    pub from_hour: i16,
    pub to_hour: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
