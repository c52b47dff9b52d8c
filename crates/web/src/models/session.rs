//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use washline_core::Role;

/// Session-stored identity.
///
/// Role and display name are stored together under one key so a reader
/// never observes one without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSession {
    /// Role established at login.
    pub role: Role,
    /// Name shown in greetings.
    pub display_name: String,
}

impl CurrentSession {
    /// The identity of a visitor with no established session.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            role: Role::Guest,
            display_name: String::new(),
        }
    }

    /// Whether this session was established by a completed login.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.role.is_authenticated()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the current role and display name.
    pub const CURRENT_SESSION: &str = "current_session";

    /// Key for the customer's subscription.
    pub const SUBSCRIPTION: &str = "subscription";
}
