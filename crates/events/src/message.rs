//! Live-transport wire messages.
//!
//! Frames are JSON text objects discriminated by an `event` field:
//!
//! ```text
//! client -> server  {"event":"authenticate","token":"<bearer>"}
//! server -> client  {"event":"authenticated","user_id":7}
//! server -> client  {"event":"new_notification","data":{...}}
//! server -> client  {"event":"error","message":"..."}
//! ```

use mentora_core::types::DbId;
use mentora_db::models::notification::Notification;
use serde::{Deserialize, Serialize};

use crate::registry::Outbound;

/// A frame sent by a connected client.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Bind this session to the user identified by the bearer token.
    Authenticate { token: String },
}

/// A frame pushed by the server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerMessage {
    Authenticated { user_id: DbId },
    NewNotification { data: Notification },
    Error { message: String },
}

impl ServerMessage {
    /// Serialize into an outbound text frame.
    pub fn to_outbound(&self) -> Result<Outbound, serde_json::Error> {
        serde_json::to_string(self).map(Outbound::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_authenticate_frame() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"authenticate","token":"abc"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Authenticate {
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn unknown_client_event_is_rejected() {
        let parsed = serde_json::from_str::<ClientMessage>(r#"{"event":"subscribe"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn new_notification_frame_carries_full_payload() {
        let now = chrono::Utc::now();
        let msg = ServerMessage::NewNotification {
            data: Notification {
                id: 3,
                user_id: 7,
                content: "New booking".to_string(),
                kind: "booking".to_string(),
                is_read: false,
                archived: false,
                post_id: None,
                created_at: now,
                updated_at: now,
            },
        };

        let Outbound::Text(text) = msg.to_outbound().unwrap() else {
            panic!("expected a text frame");
        };
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["event"], "new_notification");
        assert_eq!(json["data"]["id"], 3);
        assert_eq!(json["data"]["user_id"], 7);
        assert_eq!(json["data"]["content"], "New booking");
        assert_eq!(json["data"]["is_read"], false);
    }

    #[test]
    fn authenticated_frame_shape() {
        let Outbound::Text(text) = ServerMessage::Authenticated { user_id: 9 }
            .to_outbound()
            .unwrap()
        else {
            panic!("expected a text frame");
        };
        assert_eq!(text, r#"{"event":"authenticated","user_id":9}"#);
    }
}
