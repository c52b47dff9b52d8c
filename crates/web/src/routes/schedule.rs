//! Pickup scheduling route handlers (public).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDate, Utc};

use washline_core::ServiceType;

use crate::middleware::OptionalSession;
use crate::models::{CurrentSession, Notice, NoticeQuery};
use crate::services::FieldErrors;
use crate::services::pickups::{LifecycleError, PickupForm, TIME_SLOTS};
use crate::state::AppState;

/// Scheduling page template.
#[derive(Template, WebTemplate)]
#[template(path = "schedule.html")]
pub struct ScheduleTemplate {
    pub session: CurrentSession,
    pub notice: Option<Notice>,
    pub form: PickupForm,
    pub errors: FieldErrors,
    pub service_types: [ServiceType; 8],
    pub time_slots: [&'static str; 7],
    /// Earliest selectable pickup date (`YYYY-MM-DD`).
    pub min_date: String,
}

impl ScheduleTemplate {
    fn new(session: CurrentSession, today: NaiveDate) -> Self {
        Self {
            session,
            notice: None,
            form: PickupForm {
                service_type: ServiceType::default().as_str().to_string(),
                ..PickupForm::default()
            },
            errors: FieldErrors::new(),
            service_types: ServiceType::ALL,
            time_slots: TIME_SLOTS,
            min_date: today.format("%Y-%m-%d").to_string(),
        }
    }

    /// Whether `value` is the submitted service type.
    #[must_use]
    pub fn is_selected_service(&self, value: &str) -> bool {
        self.form.service_type == value
    }

    /// Whether `value` is the submitted time slot.
    #[must_use]
    pub fn is_selected_slot(&self, value: &str) -> bool {
        self.form.time_slot == value
    }
}

/// Display the scheduling form.
pub async fn page(
    OptionalSession(session): OptionalSession,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    ScheduleTemplate {
        notice: query.notice(),
        ..ScheduleTemplate::new(session, today())
    }
}

/// Handle the scheduling form.
///
/// Success redirects back to an empty form; failures re-render with the
/// submitted values.
pub async fn submit(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Form(form): Form<PickupForm>,
) -> Response {
    let today = today();

    match state.pickups().create_request(&form, today).await {
        Ok(_) => Redirect::to(&Notice::PickupScheduled.append_to("/schedule")).into_response(),
        Err(LifecycleError::Validation(errors)) => {
            let template = ScheduleTemplate {
                form,
                errors,
                ..ScheduleTemplate::new(session, today)
            };
            (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to schedule pickup");
            let template = ScheduleTemplate {
                form,
                notice: Some(Notice::ScheduleFailed),
                ..ScheduleTemplate::new(session, today)
            };
            (StatusCode::SERVICE_UNAVAILABLE, template).into_response()
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
