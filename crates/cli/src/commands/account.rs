//! Directory account commands.
//!
//! # Usage
//!
//! ```bash
//! WASHLINE_ACCOUNT_PASSWORD=... washline-cli account create -e owner@example.com -n "Owner" -r admin
//! ```

use secrecy::SecretString;
use thiserror::Error;

use washline_core::Role;
use washline_web::db::PgStore;
use washline_web::services::auth::{AuthError, register_account};

use super::{ConnectError, connect};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Invalid role: {0}. Valid roles: user, staff, admin")]
    InvalidRole(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a directory account.
///
/// Returns the id of the new account.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: &SecretString,
) -> Result<i64, AccountError> {
    let role: Role = role
        .parse()
        .ok()
        .filter(|role: &Role| role.is_authenticated())
        .ok_or_else(|| AccountError::InvalidRole(role.to_owned()))?;

    let store = PgStore::new(connect().await?);

    tracing::info!("Creating account: {} ({})", email, role);
    let account = register_account(&store, email, name, role, password).await?;

    tracing::info!(
        "Account created successfully! ID: {}, Email: {}, Role: {}",
        account.id,
        account.email,
        account.role
    );
    Ok(account.id.as_i64())
}
