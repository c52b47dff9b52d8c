//! Certification maintenance.
//!
//! # Usage
//!
//! ```bash
//! washline-cli certifications refresh
//! ```
//!
//! The staff console refreshes statuses on load; this command does the same
//! for scheduled jobs.

use chrono::Utc;
use thiserror::Error;

use washline_core::CertificationStatus;
use washline_web::db::{PgStore, RepositoryError};
use washline_web::services::certifications::refresh_statuses;

use super::{ConnectError, connect};

#[derive(Debug, Error)]
pub enum CertificationsError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Recompute every certification status for today.
pub async fn refresh() -> Result<(), CertificationsError> {
    let store = PgStore::new(connect().await?);
    let today = Utc::now().date_naive();

    let certifications = refresh_statuses(&store, today).await?;
    let expiring = certifications
        .iter()
        .filter(|cert| cert.status == CertificationStatus::ExpiringSoon)
        .count();
    let expired = certifications
        .iter()
        .filter(|cert| cert.status == CertificationStatus::Expired)
        .count();

    tracing::info!(
        total = certifications.len(),
        expiring,
        expired,
        "Certification statuses refreshed for {today}"
    );
    Ok(())
}
