//! Handlers for the `/urgent-request` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mentora_core::error::CoreError;
use mentora_core::notification::KIND_URGENT;
use mentora_core::types::DbId;
use mentora_core::urgent::{self, UrgentStatus};
use mentora_db::repositories::{UrgentRequestRepo, UserRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUrgentQuery {
    pub user_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrgentRequest {
    pub user_id: Option<DbId>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveUrgentRequest {
    pub status: String,
    pub rejection_reason: Option<String>,
}

/// GET /api/v1/urgent-request
///
/// Administrators see every request, optionally filtered by `userId`;
/// students see only their own.
pub async fn list_urgent_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListUrgentQuery>,
) -> AppResult<impl IntoResponse> {
    let scope = if auth.is_admin() {
        params.user_id
    } else {
        Some(auth.acting_for(params.user_id)?)
    };
    let requests = UrgentRequestRepo::list(&state.pool, scope).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/urgent-request
///
/// At most one pending request per user. Every administrator is alerted
/// with an `urgent` notification.
pub async fn create_urgent_request(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUrgentRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth.acting_for(input.user_id)?;
    let message = urgent::normalize_message(&input.message)?;
    let requester = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    let request = UrgentRequestRepo::create_pending(&state.pool, user_id, &message).await?;
    tracing::info!(urgent_request_id = request.id, user_id, "Urgent request created");

    state
        .dispatcher
        .notify_admins(
            &urgent::admin_alert_message(&requester.name, &message),
            KIND_URGENT,
        )
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// PATCH /api/v1/urgent-request/{id}
///
/// Confirm or reject a pending request and notify the requester.
pub async fn resolve_urgent_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ResolveUrgentRequest>,
) -> AppResult<impl IntoResponse> {
    let status = UrgentStatus::parse(&input.status)?;
    let request =
        UrgentRequestRepo::resolve(&state.pool, id, status, input.rejection_reason.as_deref())
            .await?;

    tracing::info!(
        urgent_request_id = id,
        status = status.as_str(),
        admin_id = admin.user_id,
        "Urgent request resolved"
    );

    let message = urgent::resolution_message(status, request.rejection_reason.as_deref());
    if let Err(e) = state
        .dispatcher
        .notify(request.user_id, &message, KIND_URGENT, None)
        .await
    {
        tracing::error!(error = %e, user_id = request.user_id, "Failed to notify requester");
    }

    Ok(Json(DataResponse { data: request }))
}
