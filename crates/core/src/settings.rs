//! Well-known keys for the `settings` key-value table.

/// Maximum number of future `booked` bookings a single user may hold.
/// Stored as a decimal integer; `0` (or a missing row) means unlimited.
pub const SETTING_MAX_BOOKINGS_PER_USER: &str = "max_bookings_per_user";

/// Parse a stored integer setting, treating missing or malformed values as `0`.
pub fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .unwrap_or(0)
}
