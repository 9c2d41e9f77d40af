//! Notification kind constants and booking message text.
//!
//! The kind values must match the `CHECK` constraint on
//! `notifications.kind` and are used by clients to pick a rendering style.
//! `general` is the column default and has no producer here.

use crate::types::Timestamp;

/// Booking created or cancelled.
pub const KIND_BOOKING: &str = "booking";

/// Urgent meeting request; rendered with urgent priority.
pub const KIND_URGENT: &str = "urgent";

const SLOT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Message sent to administrators for a new booking.
pub fn new_booking_message(
    student: &str,
    start: Timestamp,
    end: Timestamp,
    reservation_type: Option<&str>,
) -> String {
    let base = format!(
        "New booking by {student} on {} until {} UTC",
        start.format(SLOT_FORMAT),
        end.format("%H:%M")
    );
    match reservation_type {
        Some(name) => format!("{base} ({name})"),
        None => base,
    }
}

/// Message sent to administrators when an administrator cancels a booking.
pub fn admin_cancellation_message(student: &str, start: Timestamp) -> String {
    format!(
        "Booking of {student} on {} UTC was cancelled by an administrator",
        start.format(SLOT_FORMAT)
    )
}

/// Message sent to the student whose booking was cancelled by an administrator.
pub fn student_cancellation_message(start: Timestamp) -> String {
    format!(
        "Your booking on {} UTC has been cancelled",
        start.format(SLOT_FORMAT)
    )
}
