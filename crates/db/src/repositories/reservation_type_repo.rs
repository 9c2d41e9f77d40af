//! Repository for the `reservation_types` table.

use mentora_core::error::CoreError;
use mentora_core::scheduling::BookingStatus;
use mentora_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::reservation_type::{
    CreateReservationType, ReservationType, UpdateReservationType,
};
use crate::repositories::BookingRepo;

const COLUMNS: &str = "id, name, duration_minutes, description, created_at, updated_at";

pub struct ReservationTypeRepo;

impl ReservationTypeRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<ReservationType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservation_types ORDER BY duration_minutes, name");
        sqlx::query_as::<_, ReservationType>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReservationType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservation_types WHERE id = $1");
        sqlx::query_as::<_, ReservationType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateReservationType,
    ) -> Result<ReservationType, sqlx::Error> {
        let query = format!(
            "INSERT INTO reservation_types (name, duration_minutes, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReservationType>(&query)
            .bind(&input.name)
            .bind(input.duration_minutes)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Update the provided fields. Returns `None` for unknown ids.
    ///
    /// Existing bookings keep their materialized `end_time`; a new duration
    /// only affects future claims.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReservationType,
    ) -> Result<Option<ReservationType>, sqlx::Error> {
        let query = format!(
            "UPDATE reservation_types SET \
                name = COALESCE($2, name), \
                duration_minutes = COALESCE($3, duration_minutes), \
                description = COALESCE($4, description) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReservationType>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.duration_minutes)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a reservation type that no `booked` booking references.
    ///
    /// Cancelled bookings keep their row; the foreign key nulls their reference.
    pub async fn delete_unreferenced(pool: &PgPool, id: DbId) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;
        BookingRepo::lock_calendar(&mut tx).await?;

        let exists: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM reservation_types WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(CoreError::NotFound {
                entity: "ReservationType",
                id,
            }
            .into());
        }

        let referencing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE reservation_type_id = $1 AND status = $2",
        )
        .bind(id)
        .bind(BookingStatus::Booked.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if referencing > 0 {
            return Err(CoreError::Conflict(format!(
                "Reservation type is used by {referencing} active booking(s)"
            ))
            .into());
        }

        sqlx::query("DELETE FROM reservation_types WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
