//! Repository for the `bookings` table.
//!
//! [`BookingRepo::claim_slot`] is the only way to create a booking. It runs
//! the quota read, the duration lookup, the overlap check and the insert in
//! one transaction that holds the booking-calendar advisory lock, so two
//! concurrent claims for intersecting slots cannot both commit.

use mentora_core::error::CoreError;
use mentora_core::scheduling::{self, BookingStatus, Slot, BOOKING_CALENDAR_LOCK_KEY};
use mentora_core::settings::{parse_limit, SETTING_MAX_BOOKINGS_PER_USER};
use mentora_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::error::{is_constraint_violation, RepoError, EXCLUSION_VIOLATION};
use crate::models::booking::{
    Booking, BookingDetails, BookingDetailsRow, CancelledBooking, NewBooking,
};

/// Column list for `bookings` queries.
const COLUMNS: &str =
    "id, user_id, date_time, end_time, status, reservation_type_id, created_at, updated_at";

/// Exclusion constraint backing the no-overlap invariant.
const NO_OVERLAP_CONSTRAINT: &str = "ex_bookings_no_overlap";

pub struct BookingRepo;

impl BookingRepo {
    /// Acquire the transaction-scoped lock serializing all slot claims.
    ///
    /// Released automatically on commit or rollback.
    pub async fn lock_calendar(tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOOKING_CALENDAR_LOCK_KEY)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Atomically validate and insert a booking.
    ///
    /// 1. Start: `date_time` must not lie before `now`.
    /// 2. Quota: with `max_bookings_per_user > 0`, count the user's `booked`
    ///    bookings starting at or after `now`.
    /// 3. Duration: from the reservation type, else the default.
    /// 4. Overlap: three-way interval test against the `booked` slots that
    ///    touch the candidate.
    /// 5. Insert with status `booked`.
    pub async fn claim_slot(
        pool: &PgPool,
        input: &NewBooking,
        now: Timestamp,
    ) -> Result<Booking, RepoError> {
        scheduling::validate_start(input.date_time, now)?;

        let mut tx = pool.begin().await?;
        Self::lock_calendar(&mut tx).await?;

        // Quota
        let raw_limit: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
                .bind(SETTING_MAX_BOOKINGS_PER_USER)
                .fetch_optional(&mut *tx)
                .await?;
        let limit = parse_limit(raw_limit.as_deref());
        if limit > 0 {
            let active = Self::count_active_for_user(&mut *tx, input.user_id, now).await?;
            scheduling::check_quota(limit, active)?;
        }

        // Duration
        let type_minutes = match input.reservation_type_id {
            Some(type_id) => {
                let minutes: Option<i32> = sqlx::query_scalar(
                    "SELECT duration_minutes FROM reservation_types WHERE id = $1",
                )
                .bind(type_id)
                .fetch_optional(&mut *tx)
                .await?;
                Some(minutes.ok_or(CoreError::NotFound {
                    entity: "ReservationType",
                    id: type_id,
                })?)
            }
            None => None,
        };
        let slot = Slot::new(input.date_time, scheduling::resolve_duration(type_minutes))?;

        // Overlap. Back-to-back neighbours are loaded too; the core test
        // decides, and touching endpoints do not conflict.
        let neighbours: Vec<Slot> = sqlx::query_as::<_, (Timestamp, Timestamp)>(
            "SELECT date_time, end_time FROM bookings \
             WHERE status = $3 AND date_time <= $2 AND end_time >= $1 \
             ORDER BY date_time",
        )
        .bind(slot.start)
        .bind(slot.end)
        .bind(BookingStatus::Booked.as_str())
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(start, end)| Slot { start, end })
        .collect();

        if let Some(existing) = scheduling::find_conflict(&slot, &neighbours) {
            tracing::debug!(
                user_id = input.user_id,
                existing_start = %existing.start,
                existing_end = %existing.end,
                "Slot claim rejected by overlap check"
            );
            return Err(CoreError::SlotConflict.into());
        }

        // Insert
        let query = format!(
            "INSERT INTO bookings (user_id, date_time, end_time, status, reservation_type_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(input.user_id)
            .bind(slot.start)
            .bind(slot.end)
            .bind(BookingStatus::Booked.as_str())
            .bind(input.reservation_type_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_constraint_violation(&e, EXCLUSION_VIOLATION, NO_OVERLAP_CONSTRAINT) {
                    RepoError::Domain(CoreError::SlotConflict)
                } else {
                    RepoError::Database(e)
                }
            })?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Find a booking by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a booking to `cancelled`.
    ///
    /// Idempotent: cancelling an already-cancelled booking returns it
    /// unchanged with `was_booked = false`. Returns `None` for unknown ids.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<CancelledBooking>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            tx.commit().await?;
            return Ok(None);
        };

        let was_booked = BookingStatus::parse(&current)
            .map(|s| s.can_transition(BookingStatus::Cancelled))
            .unwrap_or(false);

        let booking = if was_booked {
            let query =
                format!("UPDATE bookings SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
            sqlx::query_as::<_, Booking>(&query)
                .bind(id)
                .bind(BookingStatus::Cancelled.as_str())
                .fetch_one(&mut *tx)
                .await?
        } else {
            let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
            sqlx::query_as::<_, Booking>(&query)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?
        };

        tx.commit().await?;
        Ok(Some(CancelledBooking {
            booking,
            was_booked,
        }))
    }

    /// List bookings with their reservation type and owner embedded.
    ///
    /// `user_id = None` lists every booking (administrator scope).
    pub async fn list_details(
        pool: &PgPool,
        user_id: Option<DbId>,
    ) -> Result<Vec<BookingDetails>, sqlx::Error> {
        let rows = sqlx::query_as::<_, BookingDetailsRow>(
            "SELECT b.id, b.user_id, b.date_time, b.end_time, b.status, \
                    b.reservation_type_id, b.created_at, b.updated_at, \
                    rt.name AS reservation_type_name, \
                    rt.duration_minutes AS reservation_type_duration, \
                    u.name AS user_name \
             FROM bookings b \
             JOIN users u ON u.id = b.user_id \
             LEFT JOIN reservation_types rt ON rt.id = b.reservation_type_id \
             WHERE ($1::BIGINT IS NULL OR b.user_id = $1) \
             ORDER BY b.date_time, b.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(BookingDetails::from).collect())
    }

    /// Number of the user's `booked` bookings starting at or after `now`.
    ///
    /// Runs on a pool or inside the slot-claim transaction.
    pub async fn count_active_for_user<'e, E>(
        executor: E,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings \
             WHERE user_id = $1 AND status = $2 AND date_time >= $3",
        )
        .bind(user_id)
        .bind(BookingStatus::Booked.as_str())
        .bind(now)
        .fetch_one(executor)
        .await
    }
}
