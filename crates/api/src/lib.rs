//! Mentora API server library.
//!
//! Exposes config, state, error handling, routes and the live-transport
//! handler so integration tests and the binary entrypoint share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod ws;
