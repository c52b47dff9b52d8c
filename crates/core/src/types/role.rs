//! Session roles.

use serde::{Deserialize, Serialize};

/// Who the current visitor is, as far as authorization is concerned.
///
/// `Guest` is never written to a session; it is what an empty or unreadable
/// session decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Not signed in.
    #[default]
    Guest,
    /// A customer.
    User,
    /// Laundry staff (operator).
    Staff,
    /// Business owner (operator with full access).
    Admin,
}

impl Role {
    /// Every role, in ascending order of reach.
    pub const ALL: [Self; 4] = [Self::Guest, Self::User, Self::Staff, Self::Admin];

    /// Whether this role represents an established session.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        !matches!(self, Self::Guest)
    }

    /// Whether this role may change pickup statuses.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }

    /// Stable string form used in sessions, forms and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct ParseRoleError(pub String);

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(Self::Guest),
            "user" => Ok(Self::User),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_is_not_authenticated() {
        assert!(!Role::Guest.is_authenticated());
        assert!(Role::User.is_authenticated());
        assert!(Role::Staff.is_authenticated());
        assert!(Role::Admin.is_authenticated());
    }

    #[test]
    fn test_operators() {
        assert!(!Role::Guest.is_operator());
        assert!(!Role::User.is_operator());
        assert!(Role::Staff.is_operator());
        assert!(Role::Admin.is_operator());
    }

    #[test]
    fn test_string_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_is_guest() {
        assert_eq!(Role::default(), Role::Guest);
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"staff\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
