//! Pickup status updates (staff and admin).

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use washline_core::{RequestId, RequestStatus};

use crate::error::add_breadcrumb;
use crate::middleware::{RequireView, StaffConsole};
use crate::models::Notice;
use crate::services::auth::landing;
use crate::services::pickups::LifecycleError;
use crate::state::AppState;

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Change a pickup's status and return to the operator's console.
pub async fn update_status(
    guard: RequireView<StaffConsole>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Response {
    let back = landing(guard.session.role);
    let id = RequestId::new(id);

    let Ok(status) = form.status.parse::<RequestStatus>() else {
        tracing::warn!(pickup_id = %id, status = %form.status, "Unknown pickup status submitted");
        return Redirect::to(&Notice::StatusUpdateFailed.append_to(back)).into_response();
    };

    let notice = match state.pickups().update_status(id, status).await {
        Ok(()) => {
            let pickup_id = id.to_string();
            add_breadcrumb(
                "pickups",
                "Status updated",
                Some(&[("pickup_id", pickup_id.as_str()), ("status", status.as_str())]),
            );
            Notice::StatusUpdated
        }
        Err(LifecycleError::SampleRow(_)) => Notice::SampleRowReadOnly,
        Err(LifecycleError::InFlight(_)) => Notice::UpdateInFlight,
        Err(e) => {
            tracing::error!(pickup_id = %id, error = %e, "Failed to update pickup status");
            Notice::StatusUpdateFailed
        }
    };

    Redirect::to(&notice.append_to(back)).into_response()
}
