use mentora_core::error::CoreError;

/// Error returned by repository operations that enforce domain rules
/// inside a transaction (slot claims, guarded deletes, pending checks).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A domain rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// PostgreSQL SQLSTATE for unique constraint violations.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for exclusion constraint violations.
pub(crate) const EXCLUSION_VIOLATION: &str = "23P01";

/// Whether `err` is a database error with the given SQLSTATE and constraint.
pub(crate) fn is_constraint_violation(err: &sqlx::Error, code: &str, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(code) && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
