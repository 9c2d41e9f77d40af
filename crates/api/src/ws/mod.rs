//! Live transport: the WebSocket upgrade handler and heartbeat task.
//!
//! Session bookkeeping lives in [`mentora_events::ConnectionRegistry`].

mod handler;
mod heartbeat;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
