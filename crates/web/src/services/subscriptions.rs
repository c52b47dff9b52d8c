//! Subscription plans and the simulated payment step.
//!
//! Prices come from the server-side catalogue; the form only names a plan
//! and a billing cycle.

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use washline_core::{BillingCycle, CurrencyCode, Price};

use crate::models::Subscription;

/// Errors from the subscription flow.
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("unknown plan: {0}")]
    UnknownPlan(String),
}

/// A subscription plan on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub slug: &'static str,
    pub title: &'static str,
    /// Whole-rupee rate when billed monthly.
    monthly: i64,
    /// Whole-rupee rate when billed yearly.
    yearly: i64,
}

impl Plan {
    /// Amount charged for one term of `cycle`.
    #[must_use]
    pub fn price(&self, cycle: BillingCycle) -> Decimal {
        Decimal::from(match cycle {
            BillingCycle::Monthly => self.monthly,
            BillingCycle::Yearly => self.yearly,
        })
    }

    /// Price formatted for display.
    #[must_use]
    pub fn price_display(&self, cycle: BillingCycle) -> String {
        Price::new(self.price(cycle), CurrencyCode::USD).display()
    }

    #[must_use]
    pub fn monthly_display(&self) -> String {
        self.price_display(BillingCycle::Monthly)
    }

    #[must_use]
    pub fn yearly_display(&self) -> String {
        self.price_display(BillingCycle::Yearly)
    }
}

/// Every plan, cheapest first.
pub const PLANS: [Plan; 3] = [
    Plan {
        slug: "basic",
        title: "Monthly Basic",
        monthly: 69,
        yearly: 59,
    },
    Plan {
        slug: "plus",
        title: "Monthly Plus",
        monthly: 119,
        yearly: 99,
    },
    Plan {
        slug: "family",
        title: "Family Plan",
        monthly: 179,
        yearly: 149,
    },
];

/// Look a plan up by slug.
#[must_use]
pub fn find_plan(slug: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|plan| plan.slug == slug)
}

/// Subscription form as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeForm {
    pub plan: String,
    pub cycle: BillingCycle,
}

/// Take payment (simulated by waiting `payment_delay`) and start the
/// subscription.
///
/// # Errors
///
/// Returns `SubscribeError::UnknownPlan` before any delay if the plan does not
/// exist.
pub async fn subscribe(
    form: &SubscribeForm,
    payment_delay: Duration,
) -> Result<Subscription, SubscribeError> {
    let plan = find_plan(&form.plan).ok_or_else(|| SubscribeError::UnknownPlan(form.plan.clone()))?;

    tracing::info!(plan = plan.slug, cycle = %form.cycle, "Processing subscription payment");
    tokio::time::sleep(payment_delay).await;

    Ok(Subscription::start(
        plan.title.to_string(),
        plan.price(form.cycle),
        form.cycle,
        Utc::now(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_find_plan() {
        assert_eq!(find_plan("plus").unwrap().title, "Monthly Plus");
        assert!(find_plan("platinum").is_none());
    }

    #[test]
    fn test_price_per_cycle() {
        let family = find_plan("family").unwrap();
        assert_eq!(family.price(BillingCycle::Monthly), Decimal::from(179));
        assert_eq!(family.price_display(BillingCycle::Yearly), "$149.00");
    }

    #[tokio::test]
    async fn test_subscribe_sets_term_from_cycle() {
        let form = SubscribeForm {
            plan: "basic".to_string(),
            cycle: BillingCycle::Yearly,
        };
        let subscription = subscribe(&form, Duration::ZERO).await.unwrap();

        assert_eq!(subscription.plan, "Monthly Basic");
        assert_eq!(subscription.price, Decimal::from(59));
        assert_eq!(
            (subscription.expiry_date - subscription.start_date).num_days(),
            365
        );
    }

    #[tokio::test]
    async fn test_unknown_plan_is_rejected() {
        let form = SubscribeForm {
            plan: "platinum".to_string(),
            cycle: BillingCycle::Monthly,
        };
        assert!(matches!(
            subscribe(&form, Duration::from_secs(60)).await,
            Err(SubscribeError::UnknownPlan(_))
        ));
    }
}
