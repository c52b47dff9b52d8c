//! Status and category enums for pickups and staff records.

use serde::{Deserialize, Serialize};

/// Pickup (service request) status.
///
/// Any status may follow any other; operators use this as a manual override,
/// so no transition graph is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RequestStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl RequestStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Stable string form used in forms and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CSS class for the status badge in pickup tables.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Pending => "badge badge-yellow",
            Self::Confirmed => "badge badge-blue",
            Self::Completed => "badge badge-green",
            Self::Cancelled => "badge badge-red",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid request status: {s}"))
    }
}

/// Laundry service offered on a pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    WashFold,
    DryCleaning,
    Express,
    StainRemoval,
    Alterations,
    Ironing,
    #[default]
    Standard,
    Premium,
}

impl ServiceType {
    /// Every service type.
    pub const ALL: [Self; 8] = [
        Self::WashFold,
        Self::DryCleaning,
        Self::Express,
        Self::StainRemoval,
        Self::Alterations,
        Self::Ironing,
        Self::Standard,
        Self::Premium,
    ];

    /// Stable string form used in forms and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WashFold => "wash-fold",
            Self::DryCleaning => "dry-cleaning",
            Self::Express => "express",
            Self::StainRemoval => "stain-removal",
            Self::Alterations => "alterations",
            Self::Ironing => "ironing",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WashFold => "Wash & Fold",
            Self::DryCleaning => "Dry Cleaning",
            Self::Express => "Express",
            Self::StainRemoval => "Stain Removal",
            Self::Alterations => "Alterations",
            Self::Ironing => "Ironing",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| format!("invalid service type: {s}"))
    }
}

/// Staff certification status, derived from the expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificationStatus {
    Active,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    Expired,
}

impl CertificationStatus {
    /// Days before expiry at which a certification counts as expiring.
    pub const EXPIRING_WINDOW_DAYS: i64 = 30;

    /// Status for a certification that expires in `days_until_expiration` days.
    #[must_use]
    pub const fn from_days_remaining(days_until_expiration: i64) -> Self {
        if days_until_expiration < 0 {
            Self::Expired
        } else if days_until_expiration <= Self::EXPIRING_WINDOW_DAYS {
            Self::ExpiringSoon
        } else {
            Self::Active
        }
    }

    /// Stable string form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for CertificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CertificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Expiring Soon" => Ok(Self::ExpiringSoon),
            "Expired" => Ok(Self::Expired),
            _ => Err(format!("invalid certification status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_default_is_pending() {
        assert_eq!(RequestStatus::default(), RequestStatus::Pending);
    }

    #[test]
    fn test_request_status_parse() {
        for status in RequestStatus::ALL {
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), status);
        }
        assert!("pending".parse::<RequestStatus>().is_err());
        assert!("In Transit".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_service_type_parse() {
        for service in ServiceType::ALL {
            assert_eq!(service.as_str().parse::<ServiceType>().unwrap(), service);
        }
        assert!("bleach".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_service_type_serde_kebab_case() {
        let json = serde_json::to_string(&ServiceType::WashFold).unwrap();
        assert_eq!(json, "\"wash-fold\"");
    }

    #[test]
    fn test_certification_status_thresholds() {
        assert_eq!(
            CertificationStatus::from_days_remaining(-1),
            CertificationStatus::Expired
        );
        assert_eq!(
            CertificationStatus::from_days_remaining(0),
            CertificationStatus::ExpiringSoon
        );
        assert_eq!(
            CertificationStatus::from_days_remaining(30),
            CertificationStatus::ExpiringSoon
        );
        assert_eq!(
            CertificationStatus::from_days_remaining(31),
            CertificationStatus::Active
        );
    }

    #[test]
    fn test_certification_status_parse() {
        assert_eq!(
            "Expiring Soon".parse::<CertificationStatus>().unwrap(),
            CertificationStatus::ExpiringSoon
        );
        assert!("Lapsed".parse::<CertificationStatus>().is_err());
    }
}
