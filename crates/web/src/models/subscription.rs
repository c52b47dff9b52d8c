//! Customer subscription plan.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use washline_core::{BillingCycle, CurrencyCode, Price};

/// A subscription bought through the (simulated) payment flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub plan: String,
    pub price: Decimal,
    pub cycle: BillingCycle,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
}

impl Subscription {
    /// Start a subscription at `now`; the expiry follows from the cycle.
    #[must_use]
    pub fn start(plan: String, price: Decimal, cycle: BillingCycle, now: DateTime<Utc>) -> Self {
        Self {
            plan,
            price,
            cycle,
            start_date: now,
            expiry_date: cycle.expiry_from(now),
        }
    }

    /// Price formatted for display.
    #[must_use]
    pub fn price_display(&self) -> String {
        Price::new(self.price, CurrencyCode::USD).display()
    }

    /// Whole days left before renewal, never negative.
    #[must_use]
    pub fn days_until_renewal(&self, now: DateTime<Utc>) -> i64 {
        (self.expiry_date - now).num_days().max(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_monthly_expiry_is_thirty_days_out() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let sub = Subscription::start("Basic".into(), Decimal::new(499, 0), BillingCycle::Monthly, now);
        assert_eq!(sub.expiry_date, Utc.with_ymd_and_hms(2026, 3, 31, 9, 0, 0).unwrap());
        assert_eq!(sub.days_until_renewal(now), 30);
    }

    #[test]
    fn test_yearly_expiry_is_365_days_out() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let sub = Subscription::start("Family".into(), Decimal::new(9999, 0), BillingCycle::Yearly, now);
        assert_eq!(sub.expiry_date, Utc.with_ymd_and_hms(2027, 3, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_days_until_renewal_clamps_at_zero() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let sub = Subscription::start("Basic".into(), Decimal::new(499, 0), BillingCycle::Monthly, now);
        let later = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
        assert_eq!(sub.days_until_renewal(later), 0);
    }

    #[test]
    fn test_price_display() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let sub = Subscription::start("Basic".into(), Decimal::new(499, 0), BillingCycle::Monthly, now);
        assert_eq!(sub.price_display(), "$499.00");
    }
}
