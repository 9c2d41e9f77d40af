//! Repository for the `notifications` table.
//!
//! Ownership is not checked here; the dispatcher compares `user_id` before
//! calling the mutating methods.

use mentora_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str =
    "id, user_id, content, kind, is_read, archived, post_id, created_at, updated_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, returning the full row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        content: &str,
        kind: &str,
        post_id: Option<DbId>,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, content, kind, post_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(content)
            .bind(kind)
            .bind(post_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE id = $1");
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's notifications, newest first, from either the inbox
    /// (`archived = false`) or the archive.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        archived: bool,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 AND archived = $2 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(archived)
            .fetch_all(pool)
            .await
    }

    /// Owner ids of the given notifications, as `(id, user_id)` pairs.
    pub async fn owners(pool: &PgPool, ids: &[DbId]) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as("SELECT id, user_id FROM notifications WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET is_read = true WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true \
             WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Move a notification into or out of the archive.
    pub async fn set_archived(
        pool: &PgPool,
        id: DbId,
        archived: bool,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET archived = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(archived)
            .fetch_optional(pool)
            .await
    }

    /// Archive several notifications owned by `user_id`.
    pub async fn archive_many(
        pool: &PgPool,
        ids: &[DbId],
        user_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET archived = true \
             WHERE id = ANY($1) AND user_id = $2 AND archived = false",
        )
        .bind(ids)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Hard-delete a notification. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of unread, non-archived notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE user_id = $1 AND is_read = false AND archived = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
