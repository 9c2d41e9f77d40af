//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /                  -> list_notifications
/// GET    /unread-count      -> unread_count
/// PUT    /read-all          -> mark_all_read
/// PUT    /archive           -> archive_many
/// PUT    /{id}/read         -> mark_read
/// PUT    /{id}/archive      -> archive
/// PUT    /{id}/unarchive    -> unarchive
/// DELETE /{id}              -> delete_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list_notifications))
        .route("/unread-count", get(notification::unread_count))
        .route("/read-all", put(notification::mark_all_read))
        .route("/archive", put(notification::archive_many))
        .route("/{id}/read", put(notification::mark_read))
        .route("/{id}/archive", put(notification::archive))
        .route("/{id}/unarchive", put(notification::unarchive))
        .route("/{id}", delete(notification::delete_notification))
}
