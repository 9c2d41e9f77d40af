//! Live-connection registry.
//!
//! Owns every open transport session's outbound channel and the mapping from
//! an authenticated user to the session that receives their pushes. One user
//! maps to at most one session: a later `register` for the same user takes
//! over push delivery, and the earlier session keeps working via polling.

use std::collections::HashMap;

use mentora_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// A frame queued for a session's sender task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    Ping,
    Close,
}

/// Channel sender half for pushing frames to a session.
pub type SessionSender = mpsc::UnboundedSender<Outbound>;

/// Metadata for a single open session.
struct Session {
    sender: SessionSender,
    user_id: Option<DbId>,
    connected_at: Timestamp,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, Session>,
    users: HashMap<DbId, String>,
}

/// Thread-safe registry of live sessions, shared via `Arc`.
///
/// Both maps sit behind a single `RwLock` so a lookup never observes a user
/// mapping whose session was already dropped.
pub struct ConnectionRegistry {
    inner: RwLock<Inner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Track a newly opened, not yet authenticated session.
    ///
    /// Returns the receiver half of the session's outbound channel.
    pub async fn attach(&self, session_id: String) -> mpsc::UnboundedReceiver<Outbound> {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Session {
            sender: tx,
            user_id: None,
            connected_at: chrono::Utc::now(),
        };
        self.inner.write().await.sessions.insert(session_id, session);
        rx
    }

    /// Route `user_id`'s pushes to `session_id`, replacing any prior mapping.
    pub async fn register(&self, user_id: DbId, session_id: &str) {
        let mut inner = self.inner.write().await;

        // A session re-authenticating as someone else stops serving the old user.
        inner
            .users
            .retain(|uid, sid| *uid == user_id || sid != session_id);

        if let Some(previous) = inner.users.insert(user_id, session_id.to_string()) {
            if previous != session_id {
                tracing::debug!(
                    user_id,
                    previous_session = %previous,
                    session_id,
                    "Push delivery taken over by newer session"
                );
            }
        }
        if let Some(session) = inner.sessions.get_mut(session_id) {
            session.user_id = Some(user_id);
        }
    }

    /// Forget a session and any user mapping that points at it.
    ///
    /// Scans all user mappings, which is linear in the number of connected
    /// users. Returns the user that was mapped to this session, if any.
    pub async fn unregister(&self, session_id: &str) -> Option<DbId> {
        let mut inner = self.inner.write().await;
        if let Some(session) = inner.sessions.remove(session_id) {
            let lifetime = chrono::Utc::now() - session.connected_at;
            tracing::debug!(
                session_id,
                user_id = ?session.user_id,
                lifetime_secs = lifetime.num_seconds(),
                "Session removed"
            );
        }

        let mut removed = None;
        inner.users.retain(|uid, sid| {
            if sid == session_id {
                removed = Some(*uid);
                false
            } else {
                true
            }
        });
        removed
    }

    /// The session currently receiving `user_id`'s pushes.
    pub async fn lookup(&self, user_id: DbId) -> Option<String> {
        self.inner.read().await.users.get(&user_id).cloned()
    }

    /// Queue a frame for the session registered to `user_id`.
    ///
    /// Returns `false` when the user has no live session or its channel is
    /// closed; the caller falls back to pull-based retrieval.
    pub async fn push(&self, user_id: DbId, frame: Outbound) -> bool {
        let inner = self.inner.read().await;
        let Some(session_id) = inner.users.get(&user_id) else {
            return false;
        };
        match inner.sessions.get(session_id) {
            Some(session) => session.sender.send(frame).is_ok(),
            None => false,
        }
    }

    /// Queue a frame for a specific session regardless of authentication.
    pub async fn send_to_session(&self, session_id: &str, frame: Outbound) -> bool {
        match self.inner.read().await.sessions.get(session_id) {
            Some(session) => session.sender.send(frame).is_ok(),
            None => false,
        }
    }

    /// Number of open sessions, authenticated or not.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// Number of users with a registered session.
    pub async fn registered_user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    /// Queue a Ping for every session. Used by the heartbeat task.
    pub async fn ping_all(&self) {
        let inner = self.inner.read().await;
        for session in inner.sessions.values() {
            let _ = session.sender.send(Outbound::Ping);
        }
    }

    /// Send Close to every session, then clear both maps.
    pub async fn shutdown_all(&self) {
        let mut inner = self.inner.write().await;
        let count = inner.sessions.len();
        for session in inner.sessions.values() {
            let _ = session.sender.send(Outbound::Close);
        }
        inner.sessions.clear();
        inner.users.clear();
        tracing::info!(count, "Closed all live sessions");
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
