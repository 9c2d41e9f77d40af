//! Availability window validation and calendar-day helpers.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveTime};

use crate::error::CoreError;
use crate::types::{CalendarDay, Timestamp};

/// Upper bound for `to_hour` (a window may run until midnight).
pub const MAX_HOUR: i16 = 24;

/// Maximum number of days accepted by a single create request.
pub const MAX_DAYS_PER_REQUEST: usize = 366;

/// Validate an hour range: `0 <= from_hour < to_hour <= 24`.
pub fn validate_hours(from_hour: i16, to_hour: i16) -> Result<(), CoreError> {
    if !(0..MAX_HOUR).contains(&from_hour) {
        return Err(CoreError::Validation(format!(
            "from_hour must be between 0 and {}, got {from_hour}",
            MAX_HOUR - 1
        )));
    }
    if to_hour > MAX_HOUR || to_hour <= from_hour {
        return Err(CoreError::Validation(format!(
            "to_hour must be after from_hour ({from_hour}) and at most {MAX_HOUR}, got {to_hour}"
        )));
    }
    Ok(())
}

/// Validate the requested day list of a create call.
pub fn validate_days(days: &[CalendarDay]) -> Result<(), CoreError> {
    if days.is_empty() {
        return Err(CoreError::Validation("days must not be empty".to_string()));
    }
    if days.len() > MAX_DAYS_PER_REQUEST {
        return Err(CoreError::Validation(format!(
            "at most {MAX_DAYS_PER_REQUEST} days may be created at once, got {}",
            days.len()
        )));
    }
    Ok(())
}

/// Requested days that are not already covered, de-duplicated and sorted.
///
/// Days present in `existing` are skipped silently; callers report them only
/// through the difference between requested and created counts.
pub fn days_to_create(requested: &[CalendarDay], existing: &[CalendarDay]) -> Vec<CalendarDay> {
    let existing: BTreeSet<_> = existing.iter().copied().collect();
    requested
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|day| !existing.contains(day))
        .collect()
}

/// UTC bounds `[00:00, next day 00:00)` of a calendar day.
pub fn day_bounds(day: CalendarDay) -> (Timestamp, Timestamp) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}
