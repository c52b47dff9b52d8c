//! Authentication error types.

use thiserror::Error;
use washline_core::Role;

use crate::db::RepositoryError;
use crate::services::validation::FieldErrors;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more login fields failed validation; nothing was verified.
    #[error("invalid login details: {0}")]
    Validation(FieldErrors),

    /// Invalid credentials (wrong password or account not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account already exists.
    #[error("account already exists")]
    AccountAlreadyExists,

    /// Accounts cannot be created for this role.
    #[error("accounts cannot be created with role {0}")]
    InvalidRole(Role),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
