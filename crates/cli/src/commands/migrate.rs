//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! washline-cli migrate
//! ```
//!
//! Runs the service migrations from `crates/web/migrations/`, then creates
//! the session table used by `tower-sessions`.

use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use super::{ConnectError, connect};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Session store migration error: {0}")]
    Sessions(#[from] sqlx::Error),
}

/// Run all migrations.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
