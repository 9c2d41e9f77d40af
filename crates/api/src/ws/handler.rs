use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use mentora_events::{ClientMessage, ConnectionRegistry, Outbound, ServerMessage};

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::state::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.registry, state.config.jwt.clone()))
}

/// Manage one session after upgrade.
///
/// The session starts unauthenticated. An `authenticate` frame carrying a
/// valid access token binds it to the token's user, after which the
/// dispatcher can push notifications to it. Closing the socket, by either
/// side, removes the session and its user mapping.
async fn handle_socket(socket: WebSocket, registry: Arc<ConnectionRegistry>, jwt: JwtConfig) {
    let session_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(session_id = %session_id, "WebSocket connected");

    let mut rx = registry.attach(session_id.clone()).await;
    let (mut sink, mut stream) = socket.split();

    let sender_session_id = session_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let closing = frame == Outbound::Close;
            if sink.send(to_ws_message(frame)).await.is_err() {
                tracing::debug!(session_id = %sender_session_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let reply = handle_frame(&registry, &jwt, &session_id, text.as_str()).await;
                send_reply(&registry, &session_id, reply).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(session_id = %session_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(session_id = %session_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    let user_id = registry.unregister(&session_id).await;
    send_task.abort();
    tracing::info!(session_id = %session_id, ?user_id, "WebSocket disconnected");
}

/// Process one inbound text frame and build the reply.
async fn handle_frame(
    registry: &ConnectionRegistry,
    jwt: &JwtConfig,
    session_id: &str,
    text: &str,
) -> ServerMessage {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(session_id, error = %e, "Unrecognized frame");
            return ServerMessage::Error {
                message: "Unrecognized message".to_string(),
            };
        }
    };

    match message {
        ClientMessage::Authenticate { token } => match validate_token(&token, jwt) {
            Ok(claims) => {
                registry.register(claims.sub, session_id).await;
                tracing::info!(session_id, user_id = claims.sub, "WebSocket session authenticated");
                ServerMessage::Authenticated {
                    user_id: claims.sub,
                }
            }
            Err(_) => ServerMessage::Error {
                message: "Invalid or expired token".to_string(),
            },
        },
    }
}

async fn send_reply(registry: &ConnectionRegistry, session_id: &str, reply: ServerMessage) {
    match reply.to_outbound() {
        Ok(frame) => {
            registry.send_to_session(session_id, frame).await;
        }
        Err(e) => tracing::warn!(session_id, error = %e, "Failed to encode reply"),
    }
}

fn to_ws_message(frame: Outbound) -> Message {
    match frame {
        Outbound::Text(text) => Message::Text(text.into()),
        Outbound::Ping => Message::Ping(Bytes::new()),
        Outbound::Close => Message::Close(None),
    }
}
