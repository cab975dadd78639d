//! User domain types.

use cantina_core::{Email, Roles, UserId};

/// A staff account (domain type).
///
/// The password hash never leaves the service layer; responses are built from
/// the sanitized projection in `routes::users`.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Role flags.
    pub roles: Roles,
}

/// Fields for a user about to be created; the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub roles: Roles,
}

/// The caller identity attached to a request after authentication.
///
/// Decoded by the auth middleware and trusted verbatim from there on.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: UserId,
    pub roles: Roles,
}
