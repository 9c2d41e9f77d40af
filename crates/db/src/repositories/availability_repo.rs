//! Repository for the `availabilities` table.

use mentora_core::availability::{day_bounds, days_to_create};
use mentora_core::error::CoreError;
use mentora_core::scheduling::BookingStatus;
use mentora_core::types::{CalendarDay, DbId};
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::availability::Availability;
use crate::repositories::BookingRepo;

/// Column list for `availabilities` queries.
const COLUMNS: &str = "id, owner_id, date, from_hour, to_hour, created_at, updated_at";

pub struct AvailabilityRepo;

impl AvailabilityRepo {
    /// List availability windows ordered by day.
    ///
    /// With `from = Some(day)`, windows before `day` are omitted.
    pub async fn list(
        pool: &PgPool,
        from: Option<CalendarDay>,
    ) -> Result<Vec<Availability>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM availabilities \
             WHERE ($1::DATE IS NULL OR date >= $1) \
             ORDER BY date, owner_id, id"
        );
        sqlx::query_as::<_, Availability>(&query)
            .bind(from)
            .fetch_all(pool)
            .await
    }

    /// Find a single window by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Availability>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM availabilities WHERE id = $1");
        sqlx::query_as::<_, Availability>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert one window per requested day the owner does not already have.
    ///
    /// Returns the number of rows inserted; days already present are skipped.
    pub async fn create_for_days(
        pool: &PgPool,
        owner_id: DbId,
        days: &[CalendarDay],
        from_hour: i16,
        to_hour: i16,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: Vec<CalendarDay> = sqlx::query_scalar(
            "SELECT date FROM availabilities WHERE owner_id = $1 AND date = ANY($2)",
        )
        .bind(owner_id)
        .bind(days)
        .fetch_all(&mut *tx)
        .await?;

        let new_days = days_to_create(days, &existing);
        if new_days.is_empty() {
            tx.commit().await?;
            return Ok(0);
        }

        let result = sqlx::query(
            "INSERT INTO availabilities (owner_id, date, from_hour, to_hour) \
             SELECT $1, d, $3, $4 FROM UNNEST($2::DATE[]) AS d",
        )
        .bind(owner_id)
        .bind(&new_days)
        .bind(from_hour)
        .bind(to_hour)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Delete a window unless a `booked` booking starts on its calendar day.
    ///
    /// Holds the booking-calendar lock so a concurrent slot claim cannot land
    /// on the day between the check and the delete.
    pub async fn delete_unbooked(pool: &PgPool, id: DbId) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;
        BookingRepo::lock_calendar(&mut tx).await?;

        let date: Option<CalendarDay> =
            sqlx::query_scalar("SELECT date FROM availabilities WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let date = date.ok_or(CoreError::NotFound {
            entity: "Availability",
            id,
        })?;

        let (day_start, next_day) = day_bounds(date);
        let booked: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings \
             WHERE status = $1 AND date_time >= $2 AND date_time < $3",
        )
        .bind(BookingStatus::Booked.as_str())
        .bind(day_start)
        .bind(next_day)
        .fetch_one(&mut *tx)
        .await?;

        if booked > 0 {
            return Err(CoreError::Conflict(format!(
                "Availability on {date} has {booked} booking(s) and cannot be deleted"
            ))
            .into());
        }

        sqlx::query("DELETE FROM availabilities WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
