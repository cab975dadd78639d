//! Role flags attached to user accounts.

use serde::{Deserialize, Serialize};

/// Role flags for a user account.
///
/// The wire format is an object (`{"admin": true}`) rather than a role name,
/// so this is a flag struct instead of an enum. Accounts default to non-admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Roles {
    /// Whether the account has administrative privileges.
    pub admin: bool,
}

impl Roles {
    /// Roles for an administrative account.
    #[must_use]
    pub const fn administrator() -> Self {
        Self { admin: true }
    }
}
