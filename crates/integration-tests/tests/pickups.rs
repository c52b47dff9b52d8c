//! Integration tests for scheduling, listings and status updates.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};

use washline_core::{CertificationId, CertificationStatus, RequestStatus, StaffId, TrainingModuleId};
use washline_web::config::WebConfig;
use washline_web::db::{MemoryStore, Persistence};
use washline_web::models::{Certification, TrainingModule};
use washline_integration_tests::TestApp;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn date(days_from_today: i64) -> String {
    (today() + Duration::days(days_from_today))
        .format("%Y-%m-%d")
        .to_string()
}

async fn schedule(app: &mut TestApp, name: &str, pickup_date: &str) -> StatusCode {
    app.post_form(
        "/schedule",
        &[
            ("name", name),
            ("phone", "+91 98765 43210"),
            ("email", "customer@example.com"),
            ("address", "12 Lake Road"),
            ("service_type", "wash-fold"),
            ("pickup_date", pickup_date),
            ("time_slot", "10:00"),
            ("notes", ""),
        ],
    )
    .await
    .status
}

// ============================================================================
// Scheduling
// ============================================================================

#[tokio::test]
async fn test_schedule_today_is_pending_even_with_status_supplied() {
    let mut app = TestApp::new();
    let response = app
        .post_form(
            "/schedule",
            &[
                ("name", "Asha"),
                ("phone", "555-0100"),
                ("email", "asha@example.com"),
                ("address", "4 Hill Street"),
                ("service_type", "dry-cleaning"),
                ("pickup_date", &date(0)),
                ("time_slot", "13:00"),
                ("status", "Completed"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location.as_deref(),
        Some("/schedule?notice=pickup_scheduled")
    );

    let rows = app.store.select_pickups().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, RequestStatus::Pending);
    assert_eq!(rows[0].pickup_date, today());
    assert!(rows[0].notes.is_none());
}

#[tokio::test]
async fn test_schedule_rejects_past_date_and_keeps_values() {
    let mut app = TestApp::new();
    let response = app
        .post_form(
            "/schedule",
            &[
                ("name", "Asha"),
                ("phone", "555-0100"),
                ("email", "asha@example.com"),
                ("address", "4 Hill Street"),
                ("pickup_date", &date(-1)),
                ("time_slot", "13:00"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Pickup date cannot be in the past"));
    assert!(response.body.contains("value=\"Asha\""));
    assert!(app.store.select_pickups().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_schedule_reports_every_missing_field() {
    let mut app = TestApp::new();
    let response = app.post_form("/schedule", &[]).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    for message in [
        "Name is required",
        "Phone is required",
        "Email is required",
        "Address is required",
        "Please select a pickup date",
        "Please select a pickup time",
    ] {
        assert!(response.body.contains(message), "missing {message}");
    }
}

#[tokio::test]
async fn test_schedule_failure_keeps_form() {
    let mut app = TestApp::new();
    app.store.set_unavailable(true);

    let response = app
        .post_form(
            "/schedule",
            &[
                ("name", "Ravi"),
                ("phone", "555-0101"),
                ("email", "ravi@example.com"),
                ("address", "9 Market Lane"),
                ("pickup_date", &date(2)),
                ("time_slot", "15:00"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.body.contains("value=\"Ravi\""));
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_empty_store_lists_sample_rows() {
    let mut app = TestApp::new();
    app.login_as("admin").await;

    let console = app.get("/admin").await;
    assert_eq!(console.status, StatusCode::OK);
    for name in ["John Doe", "Jane Smith", "Robert Brown"] {
        assert!(console.body.contains(name), "missing {name}");
    }
    // Sample rows have no update control.
    assert!(!console.body.contains("/pickups/-1/status"));
}

#[tokio::test]
async fn test_live_rows_replace_samples() {
    let mut app = TestApp::new();
    assert_eq!(schedule(&mut app, "Meera", &date(1)).await, StatusCode::SEE_OTHER);

    app.login_as("staff").await;
    let console = app.get("/staff").await;

    assert!(console.body.contains("Meera"));
    assert!(!console.body.contains("John Doe"));
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let mut app = TestApp::new();
    schedule(&mut app, "First Customer", &date(1)).await;
    schedule(&mut app, "Second Customer", &date(1)).await;

    app.login_as("admin").await;
    let body = app.get("/admin").await.body;
    let first = body.find("First Customer").unwrap();
    let second = body.find("Second Customer").unwrap();
    assert!(second < first);
}

// ============================================================================
// Status Updates
// ============================================================================

#[tokio::test]
async fn test_update_status_lists_row_once_with_new_status() {
    let mut app = TestApp::new();
    schedule(&mut app, "Meera", &date(1)).await;
    app.login_as("admin").await;
    app.get("/admin").await;

    let response = app
        .post_form("/pickups/1/status", &[("status", "Confirmed")])
        .await;
    assert_eq!(
        response.location.as_deref(),
        Some("/admin?notice=status_updated")
    );

    let console = app.get("/admin").await;
    assert_eq!(console.body.matches("/pickups/1/status").count(), 1);

    let rows = app.store.select_pickups().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, RequestStatus::Confirmed);
}

/// Transitions are unconstrained, including `Completed` back to
/// `Pending`. Whether operators should be able to reopen finished pickups is
/// still undecided; change this test if a transition graph is introduced.
#[tokio::test]
async fn test_any_status_may_follow_any_other() {
    let mut app = TestApp::new();
    schedule(&mut app, "Meera", &date(1)).await;
    app.login_as("staff").await;

    for status in ["Completed", "Pending", "Cancelled", "Confirmed"] {
        let response = app
            .post_form("/pickups/1/status", &[("status", status)])
            .await;
        assert_eq!(
            response.location.as_deref(),
            Some("/staff?notice=status_updated"),
            "{status}"
        );
    }
    assert_eq!(app.store.status_update_count(), 4);
}

#[tokio::test]
async fn test_concurrent_updates_on_one_row_let_one_through() {
    let mut app = TestApp::new();
    schedule(&mut app, "Meera", &date(1)).await;
    app.login_as("admin").await;
    app.store.set_update_delay(std::time::Duration::from_millis(200));

    let (first, second) = app
        .post_form_concurrently("/pickups/1/status", &[("status", "Completed")])
        .await;

    let mut locations = [first.location.unwrap(), second.location.unwrap()];
    locations.sort();
    assert_eq!(
        locations,
        [
            "/admin?notice=status_updated".to_string(),
            "/admin?notice=update_in_flight".to_string(),
        ]
    );
    assert_eq!(app.store.status_update_count(), 1);

    app.store.set_update_delay(std::time::Duration::ZERO);
    let response = app
        .post_form("/pickups/1/status", &[("status", "Confirmed")])
        .await;
    assert_eq!(
        response.location.as_deref(),
        Some("/admin?notice=status_updated")
    );
}

#[tokio::test]
async fn test_sample_row_is_read_only() {
    let mut app = TestApp::new();
    app.login_as("admin").await;

    let response = app
        .post_form("/pickups/-2/status", &[("status", "Completed")])
        .await;
    assert_eq!(
        response.location.as_deref(),
        Some("/admin?notice=sample_row_read_only")
    );
    assert_eq!(app.store.status_update_count(), 0);
}

#[tokio::test]
async fn test_unknown_status_is_rejected() {
    let mut app = TestApp::new();
    schedule(&mut app, "Meera", &date(1)).await;
    app.login_as("admin").await;

    let response = app
        .post_form("/pickups/1/status", &[("status", "Shipped")])
        .await;
    assert_eq!(
        response.location.as_deref(),
        Some("/admin?notice=status_update_failed")
    );
    assert_eq!(app.store.status_update_count(), 0);
}

#[tokio::test]
async fn test_store_failure_keeps_last_known_listing() {
    let mut app = TestApp::new();
    schedule(&mut app, "Meera", &date(1)).await;
    app.login_as("admin").await;
    app.get("/admin").await;

    app.store.set_unavailable(true);

    let console = app.get("/admin").await;
    assert_eq!(console.status, StatusCode::OK);
    assert!(console.body.contains("Meera"));
    assert!(console.body.contains("Showing the last known list."));

    let response = app
        .post_form("/pickups/1/status", &[("status", "Completed")])
        .await;
    assert_eq!(
        response.location.as_deref(),
        Some("/admin?notice=status_update_failed")
    );

    app.store.set_unavailable(false);
    let rows = app.store.select_pickups().await.unwrap();
    assert_eq!(rows[0].status, RequestStatus::Pending);
}

// ============================================================================
// Staff Console
// ============================================================================

#[tokio::test]
async fn test_staff_console_refreshes_certifications() {
    let store = MemoryStore::new()
        .with_certifications(vec![Certification {
            id: CertificationId::new(1),
            staff_id: StaffId::new(7),
            title: "Solvent Handling".to_string(),
            issued_on: today() - Duration::days(300),
            expires_on: today() + Duration::days(10),
            status: CertificationStatus::Active,
        }])
        .with_training_modules(vec![TrainingModule {
            id: TrainingModuleId::new(1),
            title: "Fabric Care Basics".to_string(),
            description: "Sorting and stain treatment.".to_string(),
            duration: "45 min".to_string(),
            completion: 80,
        }]);
    let mut app = TestApp::with(WebConfig::for_tests(), store);
    app.login_as("staff").await;

    let console = app.get("/staff").await;
    assert_eq!(console.status, StatusCode::OK);
    assert!(console.body.contains("Solvent Handling"));
    assert!(console.body.contains("Expiring Soon"));
    assert!(console.body.contains("Fabric Care Basics"));

    let stored = app.store.select_certifications().await.unwrap();
    assert_eq!(stored[0].status, CertificationStatus::ExpiringSoon);
}
