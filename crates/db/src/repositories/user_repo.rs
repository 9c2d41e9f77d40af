//! Repository for the `users` table.

use mentora_core::roles::ROLE_ADMIN;
use mentora_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, name, email, role, is_active, created_at, updated_at";

/// Identity lookups used by the scheduling core.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Ids of every active administrator, the fan-out target for staff alerts.
    pub async fn list_active_admin_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM users WHERE role = $1 AND is_active = true ORDER BY id")
            .bind(ROLE_ADMIN)
            .fetch_all(pool)
            .await
    }
}
