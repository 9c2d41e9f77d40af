use mentora_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `settings` key-value table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub id: DbId,
    pub key: String,
    pub value: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
