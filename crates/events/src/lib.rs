//! Mentora notification fan-out and live-connection infrastructure.
//!
//! - [`ConnectionRegistry`]: maps authenticated users to their live
//!   transport session and owns each session's outbound channel.
//! - [`NotificationDispatcher`]: persists a notification row per recipient,
//!   then best-effort pushes it to the recipient's session.
//! - [`message`]: JSON frames exchanged over the live transport.

pub mod dispatcher;
pub mod message;
pub mod registry;

pub use dispatcher::NotificationDispatcher;
pub use message::{ClientMessage, ServerMessage};
pub use registry::{ConnectionRegistry, Outbound};
