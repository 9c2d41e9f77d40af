//! Handlers for the `/notifications` resource.
//!
//! All endpoints act on the authenticated user's own notifications; another
//! user's notification is rejected with 403.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mentora_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// List the archive instead of the inbox. Defaults to `false`.
    pub archived: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveManyRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

#[derive(Debug, Serialize)]
pub struct Archived {
    pub archived: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<NotificationQuery>,
) -> AppResult<impl IntoResponse> {
    let notifications = state
        .dispatcher
        .list(auth.user_id, params.archived.unwrap_or(false))
        .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = state.dispatcher.unread_count(auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// PUT /api/v1/notifications/{id}/read
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let notification = state.dispatcher.mark_read(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: notification }))
}

/// PUT /api/v1/notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let marked_read = state.dispatcher.mark_all_read(auth.user_id).await?;
    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}

/// PUT /api/v1/notifications/{id}/archive
pub async fn archive(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let notification = state.dispatcher.archive(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: notification }))
}

/// PUT /api/v1/notifications/archive
///
/// Bulk archive. Fails without changes if any id is unknown or foreign.
pub async fn archive_many(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ArchiveManyRequest>,
) -> AppResult<impl IntoResponse> {
    let archived = state
        .dispatcher
        .archive_many(auth.user_id, &input.ids)
        .await?;
    Ok(Json(DataResponse {
        data: Archived { archived },
    }))
}

/// PUT /api/v1/notifications/{id}/unarchive
pub async fn unarchive(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let notification = state.dispatcher.unarchive(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: notification }))
}

/// DELETE /api/v1/notifications/{id}
pub async fn delete_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    state.dispatcher.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
