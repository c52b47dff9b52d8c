//! CLI command implementations.

pub mod account;
pub mod certifications;
pub mod migrate;

use sqlx::PgPool;
use thiserror::Error;

use washline_web::config::{ConfigError, WebConfig};
use washline_web::db;

/// Errors shared by commands that talk to the database.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect using `WASHLINE_DATABASE_URL` (or `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, ConnectError> {
    let config = WebConfig::from_env()?;
    let database_url = config.require_database_url()?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(database_url).await?)
}
