//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STUDENT: &str = "student";

/// Whether the role name grants administrator privileges.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
