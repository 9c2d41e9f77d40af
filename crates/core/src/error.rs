use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The user already holds the maximum number of future bookings.
    #[error("Booking quota exceeded: at most {limit} active bookings per user")]
    QuotaExceeded { limit: i64 },

    /// The requested slot intersects an existing booked slot.
    #[error("The requested time slot is already booked")]
    SlotConflict,

    #[error("An urgent request is already pending for this user")]
    DuplicatePendingRequest,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}
