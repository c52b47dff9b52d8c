//! Pickup (service request) lifecycle.
//!
//! The persistence collaborator is the source of truth. [`PickupBoard`] keeps
//! a read-through copy of the last live listing, refreshed on every listing
//! and patched only after the collaborator confirms a status change.
//!
//! When the collaborator has no rows the board serves a fixed sample set.
//! Sample rows carry negative ids and the listing is tagged
//! [`ListingSource::Sample`]; live and sample rows are never mixed.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

use washline_core::{Email, EmailError, RequestId, RequestStatus, ServiceType};

use crate::db::{Persistence, RepositoryError};
use crate::models::{NewServiceRequest, ServiceRequest};
use crate::services::validation::FieldErrors;

/// Pickup windows offered on the scheduling form.
pub const TIME_SLOTS: [&str; 7] = [
    "09:00", "10:00", "11:00", "13:00", "14:00", "15:00", "16:00",
];

/// Errors from the pickup lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The scheduling form has invalid fields.
    #[error("invalid pickup: {0}")]
    Validation(FieldErrors),

    /// Sample rows are display-only.
    #[error("pickup {0} is a sample row")]
    SampleRow(RequestId),

    /// Another update for the same pickup has not finished yet.
    #[error("pickup {0} already has an update in flight")]
    InFlight(RequestId),

    /// The persistence collaborator failed.
    #[error("persistence error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Where a listing's rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
    Live,
    Sample,
}

/// Pickups ready for display.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Newest first.
    pub rows: Vec<ServiceRequest>,
    pub source: ListingSource,
    /// The collaborator failed; rows are the last known list.
    pub degraded: bool,
}

impl Listing {
    #[must_use]
    pub fn is_sample(&self) -> bool {
        self.source == ListingSource::Sample
    }

    /// Number of rows with `status`.
    #[must_use]
    pub fn count(&self, status: RequestStatus) -> usize {
        self.rows.iter().filter(|row| row.status == status).count()
    }
}

/// Scheduling form as submitted.
///
/// A `status` field may be present in hostile or stale submissions; it is
/// accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PickupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub pickup_date: String,
    #[serde(default)]
    pub time_slot: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl PickupForm {
    /// Check the form against `today` and build the record to insert.
    ///
    /// # Errors
    ///
    /// Returns every field that failed validation.
    pub fn validate(&self, today: NaiveDate) -> Result<NewServiceRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &self.name, "Name is required");
        let phone = required(&mut errors, "phone", &self.phone, "Phone is required");
        let address = required(&mut errors, "address", &self.address, "Address is required");

        let email = match Email::parse(self.email.trim()) {
            Ok(email) => Some(email),
            Err(EmailError::Empty) => {
                errors.add("email", "Email is required");
                None
            }
            Err(_) => {
                errors.add("email", "Email is invalid");
                None
            }
        };

        let service_type = match self.service_type.trim() {
            "" => ServiceType::default(),
            value => value.parse::<ServiceType>().unwrap_or_else(|_| {
                errors.add("service_type", "Service type is invalid");
                ServiceType::default()
            }),
        };

        let pickup_date = match self.pickup_date.trim() {
            "" => {
                errors.add("pickup_date", "Please select a pickup date");
                None
            }
            value => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                Ok(date) if date < today => {
                    errors.add("pickup_date", "Pickup date cannot be in the past");
                    None
                }
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("pickup_date", "Pickup date is invalid");
                    None
                }
            },
        };

        let time_slot = match self.time_slot.trim() {
            "" => {
                errors.add("time_slot", "Please select a pickup time");
                None
            }
            value if TIME_SLOTS.contains(&value) => Some(value.to_string()),
            _ => {
                errors.add("time_slot", "Time slot is invalid");
                None
            }
        };

        let notes = Some(self.notes.trim())
            .filter(|notes| !notes.is_empty())
            .map(String::from);

        match (email, pickup_date, time_slot) {
            (Some(email), Some(pickup_date), Some(time_slot)) if errors.is_empty() => {
                Ok(NewServiceRequest {
                    name,
                    phone,
                    email,
                    address,
                    service_type,
                    pickup_date,
                    time_slot,
                    notes,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, message);
    }
    value.to_string()
}

// =============================================================================
// Board
// =============================================================================

/// Pickup listing and updates shared by every request.
pub struct PickupBoard {
    persistence: Arc<dyn Persistence>,
    cache: RwLock<Vec<ServiceRequest>>,
    in_flight: Mutex<HashSet<RequestId>>,
    /// Bumped on every confirmed status update.
    generation: AtomicU64,
}

impl PickupBoard {
    #[must_use]
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            persistence,
            cache: RwLock::new(Vec::new()),
            in_flight: Mutex::new(HashSet::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Current pickups, newest first.
    ///
    /// Falls back to the sample set when the collaborator has no rows. When
    /// the collaborator fails, the last live listing is served instead (or
    /// the sample set if there is none) and the listing is marked degraded.
    pub async fn list_requests(&self, today: NaiveDate) -> Listing {
        let seen = self.generation.load(Ordering::Acquire);
        match self.persistence.select_pickups().await {
            Ok(rows) if rows.is_empty() => {
                self.refresh_cache(&rows, seen).await;
                sample_listing(today, false)
            }
            Ok(rows) => {
                self.refresh_cache(&rows, seen).await;
                Listing {
                    rows,
                    source: ListingSource::Live,
                    degraded: false,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load pickups");
                let cached = self.cache.read().await.clone();
                if cached.is_empty() {
                    sample_listing(today, true)
                } else {
                    Listing {
                        rows: cached,
                        source: ListingSource::Live,
                        degraded: true,
                    }
                }
            }
        }
    }

    /// Schedule a pickup. The stored row is always `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::Validation` without calling the collaborator
    /// when the form is invalid, or `LifecycleError::Repository` if the
    /// insert fails.
    pub async fn create_request(
        &self,
        form: &PickupForm,
        today: NaiveDate,
    ) -> Result<ServiceRequest, LifecycleError> {
        let pickup = form.validate(today).map_err(LifecycleError::Validation)?;

        if form.status.is_some() {
            tracing::debug!("Ignoring status supplied on scheduling form");
        }

        let created = self.persistence.insert_pickup(&pickup).await?;
        tracing::info!(pickup_id = %created.id, "Pickup scheduled");
        Ok(created)
    }

    /// Change a pickup's status.
    ///
    /// The collaborator is updated first; the cached listing is patched only
    /// once it confirms. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// - `LifecycleError::SampleRow` for negative ids (collaborator untouched)
    /// - `LifecycleError::InFlight` while another update on `id` is running
    /// - `LifecycleError::Repository` if the collaborator rejects the update
    pub async fn update_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<(), LifecycleError> {
        if id.is_sample() {
            return Err(LifecycleError::SampleRow(id));
        }

        let _guard = self.begin_update(id).ok_or(LifecycleError::InFlight(id))?;

        self.persistence.update_pickup_status(id, status).await?;

        let mut cache = self.cache.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(row) = cache.iter_mut().find(|row| row.id == id) {
            row.status = status;
        }
        drop(cache);

        tracing::info!(pickup_id = %id, status = %status, "Pickup status updated");
        Ok(())
    }

    /// The cached live rows, as of the last listing or confirmed update.
    pub async fn snapshot(&self) -> Vec<ServiceRequest> {
        self.cache.read().await.clone()
    }

    fn begin_update(&self, id: RequestId) -> Option<InFlightGuard<'_>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if in_flight.insert(id) {
            Some(InFlightGuard {
                in_flight: &self.in_flight,
                id,
            })
        } else {
            None
        }
    }

    /// Replace the cached listing unless a status update landed after
    /// `seen` was read.
    async fn refresh_cache(&self, rows: &[ServiceRequest], seen: u64) {
        let mut cache = self.cache.write().await;
        if self.generation.load(Ordering::Acquire) == seen {
            cache.clear();
            cache.extend_from_slice(rows);
        } else {
            tracing::debug!("Keeping cached pickups patched by a newer status update");
        }
    }
}

/// Marks one pickup as having an update in progress until dropped.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<RequestId>>,
    id: RequestId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

// =============================================================================
// Sample Data
// =============================================================================

fn sample_listing(today: NaiveDate, degraded: bool) -> Listing {
    Listing {
        rows: sample_requests(today, Utc::now()),
        source: ListingSource::Sample,
        degraded,
    }
}

/// The fixed sample set shown when there are no live pickups.
///
/// Ids are -1, -2, -3 and rows are ordered newest first.
#[must_use]
pub fn sample_requests(today: NaiveDate, now: DateTime<Utc>) -> Vec<ServiceRequest> {
    let tomorrow = today.succ_opt().unwrap_or(today);
    let row = |id: i64,
               name: &str,
               email: &str,
               address: &str,
               service_type: ServiceType,
               pickup_date: NaiveDate,
               time_slot: &str,
               notes: &str,
               status: RequestStatus| ServiceRequest {
        id: RequestId::new(id),
        name: name.to_string(),
        phone: "555-0100".to_string(),
        email: email.to_string(),
        address: address.to_string(),
        service_type,
        pickup_date,
        time_slot: time_slot.to_string(),
        notes: Some(notes.to_string()),
        status,
        created_at: now + Duration::minutes(id),
    };

    vec![
        row(
            -1,
            "John Doe",
            "john.doe@example.com",
            "123 Main St, Apt 4B, New York, NY 10001",
            ServiceType::WashFold,
            today,
            "14:00",
            "3 shirts, 2 pants",
            RequestStatus::Confirmed,
        ),
        row(
            -2,
            "Jane Smith",
            "jane.smith@example.com",
            "456 Park Ave, Suite 10, New York, NY 10022",
            ServiceType::Standard,
            tomorrow,
            "10:00",
            "1 comforter, 4 bed sheets",
            RequestStatus::Pending,
        ),
        row(
            -3,
            "Robert Brown",
            "robert.brown@example.com",
            "789 Broadway, New York, NY 10003",
            ServiceType::DryCleaning,
            today,
            "16:00",
            "5 shirts, 3 pants, 2 jackets",
            RequestStatus::Confirmed,
        ),
    ]
}
