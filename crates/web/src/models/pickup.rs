//! Pickup (service request) domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use washline_core::{Email, RequestId, RequestStatus, ServiceType};

/// A scheduled laundry pickup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRequest {
    pub id: RequestId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub service_type: ServiceType,
    pub pickup_date: NaiveDate,
    /// Start of the one-hour pickup window, e.g. "13:00".
    pub time_slot: String,
    pub notes: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// Whether this row comes from the built-in sample set.
    #[must_use]
    pub const fn is_sample(&self) -> bool {
        self.id.is_sample()
    }
}

/// A validated pickup waiting to be inserted.
///
/// There is deliberately no status field: every new pickup starts `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServiceRequest {
    pub name: String,
    pub phone: String,
    pub email: Email,
    pub address: String,
    pub service_type: ServiceType,
    pub pickup_date: NaiveDate,
    pub time_slot: String,
    pub notes: Option<String>,
}

impl NewServiceRequest {
    /// Materialize the stored row once the collaborator has assigned an id.
    #[must_use]
    pub fn into_request(self, id: RequestId, created_at: DateTime<Utc>) -> ServiceRequest {
        ServiceRequest {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email.into_inner(),
            address: self.address,
            service_type: self.service_type,
            pickup_date: self.pickup_date,
            time_slot: self.time_slot,
            notes: self.notes,
            status: RequestStatus::Pending,
            created_at,
        }
    }
}
