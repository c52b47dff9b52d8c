//! Staff reference data shown on the staff console.

use chrono::NaiveDate;
use serde::Serialize;

use washline_core::{CertificationId, CertificationStatus, StaffId, TrainingModuleId};

/// A staff certification with an expiry date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certification {
    pub id: CertificationId,
    pub staff_id: StaffId,
    pub title: String,
    /// Date the certification was issued.
    pub issued_on: NaiveDate,
    /// Date the certification lapses.
    pub expires_on: NaiveDate,
    pub status: CertificationStatus,
}

/// A training module and its aggregate completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingModule {
    pub id: TrainingModuleId,
    pub title: String,
    pub description: String,
    /// Free-form duration label, e.g. "45 min".
    pub duration: String,
    /// Completion percentage, 0-100.
    pub completion: i32,
}
