//! Mentora core domain: pure scheduling rules, state machines and message
//! text shared by the database, event and API crates. No I/O lives here.

pub mod availability;
pub mod error;
pub mod notification;
pub mod roles;
pub mod scheduling;
pub mod settings;
pub mod types;
pub mod urgent;
