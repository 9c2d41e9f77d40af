//! Authentication primitives.
//!
//! Accounts and login are owned by an upstream identity service; this crate
//! only verifies the HS256 access tokens it issues.

pub mod jwt;
