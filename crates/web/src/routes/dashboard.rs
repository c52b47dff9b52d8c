//! Protected views: customer dashboard, admin console, staff console.
//!
//! Access is decided by the `RequireView` extractor before a handler runs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;

use washline_core::{BillingCycle, RequestStatus};

use crate::middleware::{AdminConsole, Dashboard, RequireView, StaffConsole};
use crate::models::{Certification, CurrentSession, Notice, NoticeQuery, Subscription, TrainingModule};
use crate::services::SessionStore;
use crate::services::certifications::refresh_statuses;
use crate::services::pickups::Listing;
use crate::services::subscriptions::{PLANS, Plan};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Customer dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub session: CurrentSession,
    pub notice: Option<Notice>,
    pub subscription: Option<Subscription>,
    pub renewal_days: i64,
    pub plans: [Plan; 3],
    pub cycles: [BillingCycle; 2],
}

/// Admin console template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub session: CurrentSession,
    pub notice: Option<Notice>,
    pub listing: Listing,
    pub statuses: [RequestStatus; 4],
}

impl AdminTemplate {
    /// Rows with `status`, for the summary cards.
    #[must_use]
    pub fn count(&self, status: &RequestStatus) -> usize {
        self.listing.count(*status)
    }
}

/// Staff console template.
#[derive(Template, WebTemplate)]
#[template(path = "staff.html")]
pub struct StaffTemplate {
    pub session: CurrentSession,
    pub notice: Option<Notice>,
    pub listing: Listing,
    pub statuses: [RequestStatus; 4],
    pub certifications: Vec<Certification>,
    pub training_modules: Vec<TrainingModule>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Customer dashboard.
pub async fn dashboard(
    guard: RequireView<Dashboard>,
    store: SessionStore,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    let subscription = store.subscription().await;
    let renewal_days = subscription
        .as_ref()
        .map_or(0, |sub| sub.days_until_renewal(Utc::now()));

    DashboardTemplate {
        session: guard.session,
        notice: query.notice(),
        subscription,
        renewal_days,
        plans: PLANS,
        cycles: [BillingCycle::Monthly, BillingCycle::Yearly],
    }
}

/// Admin console: every pickup with status controls.
pub async fn admin_console(
    guard: RequireView<AdminConsole>,
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    let listing = state.pickups().list_requests(Utc::now().date_naive()).await;
    let notice = query
        .notice()
        .or_else(|| listing.degraded.then_some(Notice::PickupsUnavailable));

    AdminTemplate {
        session: guard.session,
        notice,
        listing,
        statuses: RequestStatus::ALL,
    }
}

/// Staff console: pickups, certifications and training.
///
/// Certification statuses are refreshed on every load.
pub async fn staff_console(
    guard: RequireView<StaffConsole>,
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    let today = Utc::now().date_naive();
    let listing = state.pickups().list_requests(today).await;

    let certifications = refresh_statuses(state.persistence(), today)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load certifications");
            Vec::new()
        });
    let training_modules = state
        .persistence()
        .select_training_modules()
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load training modules");
            Vec::new()
        });

    let notice = query
        .notice()
        .or_else(|| listing.degraded.then_some(Notice::PickupsUnavailable));

    StaffTemplate {
        session: guard.session,
        notice,
        listing,
        statuses: RequestStatus::ALL,
        certifications,
        training_modules,
    }
}
