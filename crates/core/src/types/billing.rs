//! Subscription billing cycles.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How often a subscription renews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    /// Length of one billing term in days.
    #[must_use]
    pub const fn term_days(self) -> i64 {
        match self {
            Self::Monthly => 30,
            Self::Yearly => 365,
        }
    }

    /// When a term starting at `start` runs out.
    #[must_use]
    pub fn expiry_from(self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::days(self.term_days())
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_expiry() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(
            BillingCycle::Monthly.expiry_from(start),
            Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap()
        );
        assert_eq!(
            BillingCycle::Yearly.expiry_from(start),
            Utc.with_ymd_and_hms(2027, 1, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_serde() {
        let cycle: BillingCycle = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(cycle, BillingCycle::Yearly);
    }
}
