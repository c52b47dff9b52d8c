//! Directory account domain types.

use chrono::{DateTime, Utc};

use washline_core::{AccountId, Email, Role};

/// An account in the server-side directory.
///
/// Used when roles are resolved from stored identities rather than picked on
/// the login form.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Login email.
    pub email: Email,
    /// Display name for operators.
    pub name: String,
    /// Role granted to this account.
    pub role: Role,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
