//! Subscription purchase.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use washline_core::View;

use crate::error::add_breadcrumb;
use crate::middleware::guard::login_redirect;
use crate::models::Notice;
use crate::services::SessionStore;
use crate::services::subscriptions::{SubscribeForm, subscribe as start_subscription};
use crate::state::AppState;

/// Take (simulated) payment and store the subscription in the session.
///
/// Guests are sent to login first.
pub async fn subscribe(
    State(state): State<AppState>,
    store: SessionStore,
    Form(form): Form<SubscribeForm>,
) -> Response {
    let session = store.current().await;
    if !session.is_authenticated() {
        return Redirect::to(&login_redirect(
            View::Dashboard,
            Notice::SubscribeLoginRequired,
        ))
        .into_response();
    }

    let subscription = match start_subscription(&form, state.config().payment_delay).await {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::warn!(error = %e, "Subscription rejected");
            return Redirect::to(&Notice::PaymentFailed.append_to("/dashboard")).into_response();
        }
    };

    if let Err(e) = store.set_subscription(&subscription).await {
        tracing::error!(error = %e, "Failed to store subscription");
        return Redirect::to(&Notice::PaymentFailed.append_to("/dashboard")).into_response();
    }

    add_breadcrumb(
        "billing",
        "Subscribed",
        Some(&[("plan", form.plan.as_str()), ("cycle", form.cycle.label())]),
    );
    tracing::info!(plan = %subscription.plan, cycle = %subscription.cycle, "Subscription started");

    Redirect::to(&Notice::Subscribed.append_to("/dashboard")).into_response()
}
