//! Notification entity model.

use mentora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// This is also the payload pushed to live sessions as `new_notification`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub kind: String,
    pub is_read: bool,
    pub archived: bool,
    pub post_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
