//! Booking slot arithmetic, quota rule and booking state machine.
//!
//! This module lives in `core` (zero internal deps). The repository's slot
//! claim decides conflicts with [`find_conflict`], so the claim path and the
//! tests share one definition of "overlap".

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Duration used when a booking references no reservation type.
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

/// Longest meeting a reservation type may define (one full day).
pub const MAX_DURATION_MINUTES: i32 = 24 * 60;

/// Key for the transaction-scoped advisory lock that serializes slot claims.
///
/// The calendar is shared by every booking (single-admin model), so one key
/// covers the whole overlap check.
pub const BOOKING_CALENDAR_LOCK_KEY: i64 = 0x6d65_6e74_6f72_61;

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a booking, stored as text in `bookings.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Booked,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "booked" => Ok(BookingStatus::Booked),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown booking status '{other}'"
            ))),
        }
    }

    /// `booked -> cancelled` is the only permitted transition.
    pub fn can_transition(self, to: BookingStatus) -> bool {
        matches!((self, to), (BookingStatus::Booked, BookingStatus::Cancelled))
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// The half-open interval `[start, end)` a booking occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Slot {
    /// Build a slot of `duration_minutes` starting at `start`.
    pub fn new(start: Timestamp, duration_minutes: i32) -> Result<Self, CoreError> {
        validate_duration_minutes(duration_minutes)?;
        Ok(Self {
            start,
            end: start + Duration::minutes(i64::from(duration_minutes)),
        })
    }

    /// Three-way intersection test against an existing booked slot.
    ///
    /// A conflict exists when this slot starts inside `existing`, ends inside
    /// `existing`, or fully contains it. Touching endpoints do not conflict.
    pub fn overlaps(&self, existing: &Slot) -> bool {
        let starts_inside = self.start >= existing.start && self.start < existing.end;
        let ends_inside = self.end > existing.start && self.end <= existing.end;
        let contains = self.start <= existing.start && self.end >= existing.end;
        starts_inside || ends_inside || contains
    }
}

/// Return the first slot in `existing` that `candidate` overlaps.
pub fn find_conflict<'a, I>(candidate: &Slot, existing: I) -> Option<&'a Slot>
where
    I: IntoIterator<Item = &'a Slot>,
{
    existing.into_iter().find(|slot| candidate.overlaps(slot))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Use the reservation type's duration when present, else the default.
pub fn resolve_duration(reservation_type_minutes: Option<i32>) -> i32 {
    reservation_type_minutes.unwrap_or(DEFAULT_DURATION_MINUTES)
}

/// Validate a meeting duration in minutes.
pub fn validate_duration_minutes(minutes: i32) -> Result<(), CoreError> {
    if minutes <= 0 || minutes > MAX_DURATION_MINUTES {
        return Err(CoreError::Validation(format!(
            "duration must be between 1 and {MAX_DURATION_MINUTES} minutes, got {minutes}"
        )));
    }
    Ok(())
}

/// Reject a booking whose start lies before `now`.
pub fn validate_start(start: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if start < now {
        return Err(CoreError::Validation(
            "dateTime must not be in the past".to_string(),
        ));
    }
    Ok(())
}

/// Enforce the per-user quota. A `limit` of zero (or less) means unlimited.
pub fn check_quota(limit: i64, active_bookings: i64) -> Result<(), CoreError> {
    if limit > 0 && active_bookings >= limit {
        return Err(CoreError::QuotaExceeded { limit });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32, minute: u32) -> Timestamp {
        chrono::Utc
            .with_ymd_and_hms(2025, 6, 10, hour, minute, 0)
            .single()
            .unwrap()
    }

    fn slot(hour: u32, minute: u32, minutes: i32) -> Slot {
        Slot::new(at(hour, minute), minutes).unwrap()
    }

    // -- Slot ---------------------------------------------------------------

    #[test]
    fn slot_end_is_start_plus_duration() {
        let s = slot(9, 0, 90);
        assert_eq!(s.end, at(10, 30));
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert!(Slot::new(at(9, 0), 0).is_err());
    }

    #[test]
    fn start_inside_existing_overlaps() {
        assert!(slot(9, 30, 60).overlaps(&slot(9, 0, 60)));
    }

    #[test]
    fn end_inside_existing_overlaps() {
        assert!(slot(8, 30, 60).overlaps(&slot(9, 0, 60)));
    }

    #[test]
    fn containing_existing_overlaps() {
        assert!(slot(8, 0, 180).overlaps(&slot(9, 0, 60)));
    }

    #[test]
    fn contained_by_existing_overlaps() {
        assert!(slot(9, 15, 15).overlaps(&slot(9, 0, 60)));
    }

    #[test]
    fn identical_slots_overlap() {
        assert!(slot(9, 0, 60).overlaps(&slot(9, 0, 60)));
    }

    #[test]
    fn back_to_back_slots_do_not_overlap() {
        assert!(!slot(10, 0, 60).overlaps(&slot(9, 0, 60)));
        assert!(!slot(8, 0, 60).overlaps(&slot(9, 0, 60)));
    }

    #[test]
    fn overlap_matches_half_open_intersection() {
        let existing = slot(10, 0, 60);
        for start_min in (0..=240).step_by(15) {
            for len in [15, 30, 60, 120] {
                let candidate = Slot::new(at(8, 0) + Duration::minutes(start_min), len).unwrap();
                let expected = candidate.start < existing.end && existing.start < candidate.end;
                assert_eq!(
                    candidate.overlaps(&existing),
                    expected,
                    "start +{start_min}m len {len}"
                );
            }
        }
    }

    #[test]
    fn find_conflict_returns_first_overlapping_slot() {
        let booked = [slot(9, 0, 60), slot(11, 0, 60)];
        let hit = find_conflict(&slot(11, 30, 30), &booked);
        assert_eq!(hit, Some(&booked[1]));
        assert!(find_conflict(&slot(10, 0, 60), &booked).is_none());
    }

    // -- Start time ---------------------------------------------------------

    #[test]
    fn start_before_now_is_rejected() {
        assert!(matches!(
            validate_start(at(8, 59), at(9, 0)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn start_at_or_after_now_is_accepted() {
        assert!(validate_start(at(9, 0), at(9, 0)).is_ok());
        assert!(validate_start(at(10, 0), at(9, 0)).is_ok());
    }

    // -- Quota --------------------------------------------------------------

    #[test]
    fn zero_limit_is_unlimited() {
        assert!(check_quota(0, 1_000).is_ok());
    }

    #[test]
    fn quota_rejects_at_limit() {
        let err = check_quota(1, 1).unwrap_err();
        assert!(matches!(err, CoreError::QuotaExceeded { limit: 1 }));
    }

    #[test]
    fn quota_allows_below_limit() {
        assert!(check_quota(2, 1).is_ok());
    }

    // -- Duration -----------------------------------------------------------

    #[test]
    fn missing_reservation_type_uses_default_duration() {
        assert_eq!(resolve_duration(None), DEFAULT_DURATION_MINUTES);
        assert_eq!(resolve_duration(Some(45)), 45);
    }

    #[test]
    fn duration_above_one_day_is_rejected() {
        assert!(validate_duration_minutes(MAX_DURATION_MINUTES).is_ok());
        assert!(validate_duration_minutes(MAX_DURATION_MINUTES + 1).is_err());
    }

    // -- State machine ------------------------------------------------------

    #[test]
    fn booked_can_be_cancelled() {
        assert!(BookingStatus::Booked.can_transition(BookingStatus::Cancelled));
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(!BookingStatus::Cancelled.can_transition(BookingStatus::Booked));
        assert!(!BookingStatus::Cancelled.can_transition(BookingStatus::Cancelled));
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [BookingStatus::Booked, BookingStatus::Cancelled] {
            assert_eq!(BookingStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(BookingStatus::parse("pending").is_err());
    }
}
