//! Integration tests for the health endpoints.

use axum::http::StatusCode;

use washline_integration_tests::TestApp;

#[tokio::test]
async fn test_liveness() {
    let mut app = TestApp::new();
    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_readiness_follows_store() {
    let mut app = TestApp::new();
    let ready = app.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body, "ready");

    app.store.set_unavailable(true);
    let unready = app.get("/health/ready").await;
    assert_eq!(unready.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(!unready.body.contains("switched off"));

    // Liveness does not depend on the store.
    assert_eq!(app.get("/health").await.status, StatusCode::OK);
}
