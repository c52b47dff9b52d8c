//! Persistence collaborator.
//!
//! # Database: `washline`
//!
//! ## Tables
//!
//! - `pickups` - Scheduled service requests
//! - `accounts` - Directory accounts (server-resolved roles)
//! - `certifications` - Staff certifications
//! - `training_modules` - Staff training catalogue
//! - `tower_sessions.session` - Session storage (created by tower-sessions)
//!
//! # Implementations
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx
//! - [`MemoryStore`] - in-process tables, used when no database is configured
//!   and in tests
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p washline-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use washline_core::{CertificationId, CertificationStatus, Email, RequestId, RequestStatus, Role};

use crate::models::{Account, Certification, NewServiceRequest, ServiceRequest, TrainingModule};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backing store refused or could not serve the call.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A directory account waiting to be inserted.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub password_hash: String,
}

/// The select/insert/update surface the service consumes.
///
/// Every call may fail; callers turn failures into notices and never let
/// them escape a request.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Check that the store can serve requests.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// All pickups, newest first.
    async fn select_pickups(&self) -> Result<Vec<ServiceRequest>, RepositoryError>;

    /// Insert a pickup; the stored row is always `Pending`.
    async fn insert_pickup(
        &self,
        pickup: &NewServiceRequest,
    ) -> Result<ServiceRequest, RepositoryError>;

    /// Set the status of one pickup.
    ///
    /// Returns `RepositoryError::NotFound` when no row has `id`.
    async fn update_pickup_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<(), RepositoryError>;

    /// Directory account by login email.
    async fn find_account(&self, email: &Email) -> Result<Option<Account>, RepositoryError>;

    /// Create a directory account.
    ///
    /// Returns `RepositoryError::Conflict` when the email is taken.
    async fn insert_account(&self, account: &NewAccount) -> Result<Account, RepositoryError>;

    /// All staff certifications.
    async fn select_certifications(&self) -> Result<Vec<Certification>, RepositoryError>;

    /// Set the status of one certification.
    async fn update_certification_status(
        &self,
        id: CertificationId,
        status: CertificationStatus,
    ) -> Result<(), RepositoryError>;

    /// The training catalogue.
    async fn select_training_modules(&self) -> Result<Vec<TrainingModule>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
