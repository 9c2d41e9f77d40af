use mentora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `urgent_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UrgentRequest {
    pub id: DbId,
    pub user_id: DbId,
    pub message: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
