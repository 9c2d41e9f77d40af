//! Repository for the `urgent_requests` table.

use mentora_core::error::CoreError;
use mentora_core::types::DbId;
use mentora_core::urgent::{self, UrgentStatus};
use sqlx::PgPool;

use crate::error::{is_constraint_violation, RepoError, UNIQUE_VIOLATION};
use crate::models::urgent_request::UrgentRequest;

const COLUMNS: &str = "id, user_id, message, status, rejection_reason, created_at, updated_at";

/// Partial unique index allowing one pending request per user.
const PENDING_PER_USER_INDEX: &str = "uq_urgent_requests_pending_user";

pub struct UrgentRequestRepo;

impl UrgentRequestRepo {
    /// The user's pending request, if any.
    pub async fn find_pending_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UrgentRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM urgent_requests WHERE user_id = $1 AND status = $2"
        );
        sqlx::query_as::<_, UrgentRequest>(&query)
            .bind(user_id)
            .bind(UrgentStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Insert a pending request, refusing a second pending one for the user.
    ///
    /// The explicit check gives the common case a clean error; the partial
    /// unique index catches the concurrent case.
    pub async fn create_pending(
        pool: &PgPool,
        user_id: DbId,
        message: &str,
    ) -> Result<UrgentRequest, RepoError> {
        if Self::find_pending_for_user(pool, user_id).await?.is_some() {
            return Err(CoreError::DuplicatePendingRequest.into());
        }

        let query = format!(
            "INSERT INTO urgent_requests (user_id, message, status) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UrgentRequest>(&query)
            .bind(user_id)
            .bind(message)
            .bind(UrgentStatus::Pending.as_str())
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if is_constraint_violation(&e, UNIQUE_VIOLATION, PENDING_PER_USER_INDEX) {
                    RepoError::Domain(CoreError::DuplicatePendingRequest)
                } else {
                    RepoError::Database(e)
                }
            })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UrgentRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM urgent_requests WHERE id = $1");
        sqlx::query_as::<_, UrgentRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests, newest first. `user_id = None` lists every user's.
    pub async fn list(
        pool: &PgPool,
        user_id: Option<DbId>,
    ) -> Result<Vec<UrgentRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM urgent_requests \
             WHERE ($1::BIGINT IS NULL OR user_id = $1) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UrgentRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Resolve a pending request as confirmed or rejected.
    ///
    /// `rejection_reason` is written only for rejections with a non-blank
    /// reason. Fails with `NotFound` or `Validation` (not pending / bad target).
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        status: UrgentStatus,
        rejection_reason: Option<&str>,
    ) -> Result<UrgentRequest, RepoError> {
        let mut tx = pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM urgent_requests WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = current.ok_or(CoreError::NotFound {
            entity: "UrgentRequest",
            id,
        })?;

        urgent::validate_resolution(UrgentStatus::parse(&current)?, status)?;
        let reason = urgent::effective_reason(status, rejection_reason);

        let query = format!(
            "UPDATE urgent_requests SET status = $2, rejection_reason = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, UrgentRequest>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(request)
    }
}
