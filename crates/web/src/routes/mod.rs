//! HTTP route handlers for the web service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to /schedule
//! GET  /health                 - Liveness
//! GET  /health/ready           - Persistence readiness
//!
//! # Auth
//! GET  /login                  - Login page (return_to, notice)
//! POST /login                  - Login action
//! POST /logout                 - Logout action
//! GET  /signup                 - Signup page
//! POST /signup                 - Create a customer account and sign in
//!
//! # Scheduling (public)
//! GET  /schedule               - Scheduling form
//! POST /schedule               - Create pickup
//!
//! # Protected views
//! GET  /dashboard              - user, staff, admin
//! GET  /admin                  - admin
//! GET  /staff                  - staff, admin
//! POST /pickups/{id}/status    - staff, admin
//!
//! # Billing
//! POST /subscribe              - any signed-in role
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod pickups;
pub mod schedule;
pub mod subscriptions;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the web service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/schedule") }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        // Scheduling
        .route("/schedule", get(schedule::page).post(schedule::submit))
        // Protected views
        .route("/dashboard", get(dashboard::dashboard))
        .route("/admin", get(dashboard::admin_console))
        .route("/staff", get(dashboard::staff_console))
        .route("/pickups/{id}/status", post(pickups::update_status))
        // Billing
        .route("/subscribe", post(subscriptions::subscribe))
}
