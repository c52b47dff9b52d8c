//! In-process implementation of [`Persistence`].
//!
//! Used when no database URL is configured and by the test suites. Ids are
//! assigned from per-table counters starting at 1, so they never collide with
//! the negative ids of the sample set.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use washline_core::{
    AccountId, CertificationId, CertificationStatus, Email, RequestId, RequestStatus,
};

use super::{NewAccount, Persistence, RepositoryError};
use crate::models::{Account, Certification, NewServiceRequest, ServiceRequest, TrainingModule};

/// Tables held in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    pickups: RwLock<Vec<ServiceRequest>>,
    accounts: RwLock<Vec<Account>>,
    certifications: RwLock<Vec<Certification>>,
    training_modules: RwLock<Vec<TrainingModule>>,
    next_pickup_id: AtomicI64,
    next_account_id: AtomicI64,
    unavailable: AtomicBool,
    status_updates: AtomicUsize,
    update_delay_ms: AtomicU64,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with pickups.
    #[must_use]
    pub fn with_pickups(pickups: Vec<ServiceRequest>) -> Self {
        let next = pickups.iter().map(|p| p.id.as_i64()).max().unwrap_or(0);
        Self {
            pickups: RwLock::new(pickups),
            next_pickup_id: AtomicI64::new(next),
            ..Self::default()
        }
    }

    /// Add staff certifications.
    #[must_use]
    pub fn with_certifications(mut self, certifications: Vec<Certification>) -> Self {
        self.certifications = RwLock::new(certifications);
        self
    }

    /// Add training modules.
    #[must_use]
    pub fn with_training_modules(mut self, modules: Vec<TrainingModule>) -> Self {
        self.training_modules = RwLock::new(modules);
        self
    }

    /// Make every subsequent call fail with `RepositoryError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Hold every pickup status update for `delay` before applying it.
    pub fn set_update_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.update_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of pickup status updates that reached the store.
    #[must_use]
    pub fn status_update_count(&self) -> usize {
        self.status_updates.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }

    async fn select_pickups(&self) -> Result<Vec<ServiceRequest>, RepositoryError> {
        self.check_available()?;
        let mut rows = self.pickups.read().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn insert_pickup(
        &self,
        pickup: &NewServiceRequest,
    ) -> Result<ServiceRequest, RepositoryError> {
        self.check_available()?;
        let id = self.next_pickup_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = pickup
            .clone()
            .into_request(RequestId::new(id), Utc::now());
        self.pickups.write().await.push(row.clone());
        Ok(row)
    }

    async fn update_pickup_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        self.status_updates.fetch_add(1, Ordering::SeqCst);
        let delay = self.update_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let mut pickups = self.pickups.write().await;
        let row = pickups
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.status = status;
        Ok(())
    }

    async fn find_account(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|a| a.email.as_str().eq_ignore_ascii_case(email.as_str()))
            .cloned())
    }

    async fn insert_account(&self, account: &NewAccount) -> Result<Account, RepositoryError> {
        self.check_available()?;
        let mut accounts = self.accounts.write().await;
        if accounts
            .iter()
            .any(|a| a.email.as_str().eq_ignore_ascii_case(account.email.as_str()))
        {
            return Err(RepositoryError::Conflict(format!(
                "account {} already exists",
                account.email
            )));
        }

        let id = self.next_account_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = Account {
            id: AccountId::new(id),
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role,
            password_hash: account.password_hash.clone(),
            created_at: Utc::now(),
        };
        accounts.push(row.clone());
        Ok(row)
    }

    async fn select_certifications(&self) -> Result<Vec<Certification>, RepositoryError> {
        self.check_available()?;
        let mut rows = self.certifications.read().await.clone();
        rows.sort_by(|a, b| a.expires_on.cmp(&b.expires_on).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn update_certification_status(
        &self,
        id: CertificationId,
        status: CertificationStatus,
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut certifications = self.certifications.write().await;
        let row = certifications
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.status = status;
        Ok(())
    }

    async fn select_training_modules(&self) -> Result<Vec<TrainingModule>, RepositoryError> {
        self.check_available()?;
        Ok(self.training_modules.read().await.clone())
    }
}
