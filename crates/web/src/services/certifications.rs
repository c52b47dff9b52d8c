//! Staff certification status upkeep.

use chrono::NaiveDate;

use washline_core::CertificationStatus;

use crate::db::{Persistence, RepositoryError};
use crate::models::Certification;

/// Days from `today` until `expires_on`; negative once expired.
///
/// Dates carry no time of day, so this is the exact (already whole) day
/// difference.
#[must_use]
pub fn days_until_expiration(expires_on: NaiveDate, today: NaiveDate) -> i64 {
    (expires_on - today).num_days()
}

/// Status a certification should have on `today`.
#[must_use]
pub fn status_on(certification: &Certification, today: NaiveDate) -> CertificationStatus {
    CertificationStatus::from_days_remaining(days_until_expiration(certification.expires_on, today))
}

/// Recompute every certification's status and store the ones that changed.
///
/// Returns the certifications as they stand after the refresh. A failed
/// update is logged and the row keeps its stored status; the rest proceed.
///
/// # Errors
///
/// Returns `RepositoryError` if the certifications cannot be loaded.
pub async fn refresh_statuses(
    persistence: &dyn Persistence,
    today: NaiveDate,
) -> Result<Vec<Certification>, RepositoryError> {
    let mut certifications = persistence.select_certifications().await?;

    for certification in &mut certifications {
        let status = status_on(certification, today);
        if status == certification.status {
            continue;
        }

        match persistence
            .update_certification_status(certification.id, status)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    certification_id = %certification.id,
                    from = %certification.status,
                    to = %status,
                    "Certification status changed"
                );
                certification.status = status;
            }
            Err(e) => {
                tracing::warn!(
                    certification_id = %certification.id,
                    error = %e,
                    "Failed to update certification status"
                );
            }
        }
    }

    Ok(certifications)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use washline_core::{CertificationId, StaffId};

    use super::*;
    use crate::db::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cert(id: i64, expires_on: NaiveDate, status: CertificationStatus) -> Certification {
        Certification {
            id: CertificationId::new(id),
            staff_id: StaffId::new(1),
            title: format!("Cert {id}"),
            issued_on: date(2025, 1, 1),
            expires_on,
            status,
        }
    }

    #[test]
    fn test_days_until_expiration() {
        let today = date(2026, 5, 4);
        assert_eq!(days_until_expiration(date(2026, 5, 4), today), 0);
        assert_eq!(days_until_expiration(date(2026, 6, 3), today), 30);
        assert_eq!(days_until_expiration(date(2026, 5, 3), today), -1);
    }

    #[test]
    fn test_status_boundaries() {
        let today = date(2026, 5, 4);
        let status = |expires| status_on(&cert(1, expires, CertificationStatus::Active), today);

        assert_eq!(status(date(2026, 5, 3)), CertificationStatus::Expired);
        assert_eq!(status(date(2026, 5, 4)), CertificationStatus::ExpiringSoon);
        assert_eq!(status(date(2026, 6, 3)), CertificationStatus::ExpiringSoon);
        assert_eq!(status(date(2026, 6, 4)), CertificationStatus::Active);
    }

    #[tokio::test]
    async fn test_refresh_updates_only_changed_rows() {
        let today = date(2026, 5, 4);
        let store = MemoryStore::new().with_certifications(vec![
            cert(1, date(2026, 4, 1), CertificationStatus::Active),
            cert(2, date(2027, 1, 1), CertificationStatus::Active),
            cert(3, date(2026, 5, 20), CertificationStatus::ExpiringSoon),
        ]);

        let refreshed = refresh_statuses(&store, today).await.unwrap();
        let statuses: Vec<_> = refreshed.iter().map(|c| (c.id.as_i64(), c.status)).collect();
        assert!(statuses.contains(&(1, CertificationStatus::Expired)));
        assert!(statuses.contains(&(2, CertificationStatus::Active)));
        assert!(statuses.contains(&(3, CertificationStatus::ExpiringSoon)));

        let stored = store.select_certifications().await.unwrap();
        assert!(
            stored
                .iter()
                .any(|c| c.id.as_i64() == 1 && c.status == CertificationStatus::Expired)
        );
    }

    #[tokio::test]
    async fn test_refresh_propagates_load_failure() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(refresh_statuses(&store, date(2026, 5, 4)).await.is_err());
    }
}
