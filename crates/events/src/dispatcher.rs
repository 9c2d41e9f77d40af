//! Notification persistence and live delivery.
//!
//! [`NotificationDispatcher`] is the single entry point for creating
//! notifications. Every notification is written to the `notifications` table
//! first; only then is it pushed to the recipient's registered session, if
//! any. A failed push is logged and never fails the caller, since the row
//! stays retrievable through the pull endpoints.
//!
//! The owner-scoped methods back the notification endpoints and reject
//! access to another user's rows with [`CoreError::Forbidden`].

use std::sync::Arc;

use mentora_core::error::CoreError;
use mentora_core::types::DbId;
use mentora_db::models::notification::Notification;
use mentora_db::repositories::{NotificationRepo, UserRepo};
use mentora_db::{DbPool, RepoError};

use crate::message::ServerMessage;
use crate::registry::ConnectionRegistry;

const ENTITY: &str = "Notification";

#[derive(Clone)]
pub struct NotificationDispatcher {
    pool: DbPool,
    registry: Arc<ConnectionRegistry>,
}

impl NotificationDispatcher {
    pub fn new(pool: DbPool, registry: Arc<ConnectionRegistry>) -> Self {
        Self { pool, registry }
    }

    /// Persist a notification for `user_id`, then push it live.
    pub async fn notify(
        &self,
        user_id: DbId,
        content: &str,
        kind: &str,
        post_id: Option<DbId>,
    ) -> Result<Notification, sqlx::Error> {
        let notification =
            NotificationRepo::create(&self.pool, user_id, content, kind, post_id).await?;
        self.push(&notification).await;
        Ok(notification)
    }

    /// Notify every active administrator.
    ///
    /// Recipients are handled independently: a failure for one is logged
    /// and the rest still receive theirs. Returns the number persisted.
    pub async fn notify_admins(&self, content: &str, kind: &str) -> usize {
        let admin_ids = match UserRepo::list_active_admin_ids(&self.pool).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load administrator recipients");
                return 0;
            }
        };

        let mut delivered = 0;
        for admin_id in admin_ids {
            match self.notify(admin_id, content, kind, None).await {
                Ok(_) => delivered += 1,
                Err(e) => {
                    tracing::error!(error = %e, user_id = admin_id, "Failed to notify administrator");
                }
            }
        }
        delivered
    }

    /// Best-effort live delivery of an already persisted notification.
    async fn push(&self, notification: &Notification) {
        let frame = match (ServerMessage::NewNotification {
            data: notification.clone(),
        })
        .to_outbound()
        {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, notification_id = notification.id, "Failed to encode push");
                return;
            }
        };

        if self.registry.push(notification.user_id, frame).await {
            tracing::debug!(
                user_id = notification.user_id,
                notification_id = notification.id,
                "Notification pushed"
            );
        } else {
            tracing::debug!(
                user_id = notification.user_id,
                notification_id = notification.id,
                "Recipient offline, notification left for polling"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Owner-scoped operations
    // -----------------------------------------------------------------------

    /// List the user's inbox (`archived = false`) or archive.
    pub async fn list(&self, user_id: DbId, archived: bool) -> Result<Vec<Notification>, sqlx::Error> {
        NotificationRepo::list_for_user(&self.pool, user_id, archived).await
    }

    pub async fn unread_count(&self, user_id: DbId) -> Result<i64, sqlx::Error> {
        NotificationRepo::unread_count(&self.pool, user_id).await
    }

    pub async fn mark_read(&self, user_id: DbId, id: DbId) -> Result<Notification, RepoError> {
        self.load_owned(user_id, id).await?;
        NotificationRepo::mark_read(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn mark_all_read(&self, user_id: DbId) -> Result<u64, sqlx::Error> {
        NotificationRepo::mark_all_read(&self.pool, user_id).await
    }

    pub async fn archive(&self, user_id: DbId, id: DbId) -> Result<Notification, RepoError> {
        self.set_archived(user_id, id, true).await
    }

    pub async fn unarchive(&self, user_id: DbId, id: DbId) -> Result<Notification, RepoError> {
        self.set_archived(user_id, id, false).await
    }

    /// Archive several notifications at once.
    ///
    /// Every id must exist and belong to `user_id`; otherwise nothing is
    /// changed. Returns the number of rows newly archived.
    pub async fn archive_many(&self, user_id: DbId, ids: &[DbId]) -> Result<u64, RepoError> {
        if ids.is_empty() {
            return Err(CoreError::Validation("ids must not be empty".to_string()).into());
        }
        let owners = NotificationRepo::owners(&self.pool, ids).await?;
        ensure_all_owned(user_id, ids, &owners)?;
        Ok(NotificationRepo::archive_many(&self.pool, ids, user_id).await?)
    }

    pub async fn delete(&self, user_id: DbId, id: DbId) -> Result<(), RepoError> {
        self.load_owned(user_id, id).await?;
        if NotificationRepo::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    async fn set_archived(
        &self,
        user_id: DbId,
        id: DbId,
        archived: bool,
    ) -> Result<Notification, RepoError> {
        self.load_owned(user_id, id).await?;
        NotificationRepo::set_archived(&self.pool, id, archived)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn load_owned(&self, user_id: DbId, id: DbId) -> Result<Notification, RepoError> {
        let notification = NotificationRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        ensure_owner(user_id, &notification)?;
        Ok(notification)
    }
}

fn not_found(id: DbId) -> RepoError {
    RepoError::Domain(CoreError::NotFound { entity: ENTITY, id })
}

/// Reject access to a notification owned by someone else.
pub fn ensure_owner(user_id: DbId, notification: &Notification) -> Result<(), CoreError> {
    if notification.user_id == user_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Notification belongs to another user".to_string(),
        ))
    }
}

/// Check a bulk request: every id must be found in `owners` and owned by `user_id`.
fn ensure_all_owned(user_id: DbId, ids: &[DbId], owners: &[(DbId, DbId)]) -> Result<(), CoreError> {
    for &id in ids {
        match owners.iter().find(|(nid, _)| *nid == id) {
            None => return Err(CoreError::NotFound { entity: ENTITY, id }),
            Some((_, owner)) if *owner != user_id => {
                return Err(CoreError::Forbidden(
                    "Notification belongs to another user".to_string(),
                ))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn notification(id: DbId, user_id: DbId) -> Notification {
        let now = chrono::Utc::now();
        Notification {
            id,
            user_id,
            content: "hello".to_string(),
            kind: "general".to_string(),
            is_read: false,
            archived: false,
            post_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_passes() {
        assert!(ensure_owner(7, &notification(1, 7)).is_ok());
    }

    #[test]
    fn other_user_is_forbidden() {
        assert_matches!(
            ensure_owner(8, &notification(1, 7)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn bulk_with_all_owned_passes() {
        assert!(ensure_all_owned(7, &[1, 2], &[(1, 7), (2, 7)]).is_ok());
    }

    #[test]
    fn bulk_with_missing_id_is_not_found() {
        assert_matches!(
            ensure_all_owned(7, &[1, 2], &[(1, 7)]),
            Err(CoreError::NotFound { id: 2, .. })
        );
    }

    #[test]
    fn bulk_with_foreign_id_is_forbidden() {
        assert_matches!(
            ensure_all_owned(7, &[1, 2], &[(1, 7), (2, 9)]),
            Err(CoreError::Forbidden(_))
        );
    }
}
