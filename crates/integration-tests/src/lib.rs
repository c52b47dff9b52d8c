//! Integration tests for Washline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p washline-integration-tests
//! ```
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`
//! against the in-memory persistence and session stores. No database or
//! running server is needed.
//!
//! # Test Categories
//!
//! - `auth_flow` - Signup, login, landing views, logout
//! - `route_guard` - Protected views per role
//! - `pickups` - Scheduling, listings, status updates
//! - `subscriptions` - Plan purchase
//! - `health` - Liveness and readiness

#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use washline_web::config::WebConfig;
use washline_web::db::{MemoryStore, Persistence};
use washline_web::state::AppState;

/// A response with its body read into a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// `Location` header, if any.
    pub location: Option<String>,
    pub body: String,
}

/// The application wired to in-memory stores, with a one-cookie jar.
pub struct TestApp {
    router: Router,
    /// The persistence collaborator behind the app.
    pub store: Arc<MemoryStore>,
    cookie: Option<String>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Default test configuration over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with(WebConfig::for_tests(), MemoryStore::new())
    }

    /// Build the app from `config` over `store`.
    #[must_use]
    pub fn with(config: WebConfig, store: MemoryStore) -> Self {
        let store = Arc::new(store);
        let persistence: Arc<dyn Persistence> = store.clone();
        let state = AppState::new(config, persistence);
        let router = washline_web::app(state, tower_sessions::MemoryStore::default());

        Self {
            router,
            store,
            cookie: None,
        }
    }

    /// Whether the jar currently holds a session cookie.
    #[must_use]
    pub const fn has_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    /// Replace the jar's cookie with a raw `name=value` pair.
    pub fn set_cookie(&mut self, cookie: &str) {
        self.cookie = Some(cookie.to_string());
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self
            .request("GET", path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = self.form_request(path, fields);
        self.send(request).await
    }

    /// Submit the same form twice at once with the current cookie.
    ///
    /// Cookies set by either response are not kept.
    pub async fn post_form_concurrently(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> (TestResponse, TestResponse) {
        let (first, second) = tokio::join!(
            self.router.clone().oneshot(self.form_request(path, fields)),
            self.router.clone().oneshot(self.form_request(path, fields)),
        );
        (
            read_response(first.expect("Router is infallible")).await,
            read_response(second.expect("Router is infallible")).await,
        )
    }

    /// Submit the login form.
    pub async fn login(&mut self, email: &str, password: &str, role: &str) -> TestResponse {
        self.post_form(
            "/login",
            &[("email", email), ("password", password), ("role", role)],
        )
        .await
    }

    /// Log in with the demo selector as `role` and assert it succeeded.
    pub async fn login_as(&mut self, role: &str) -> TestResponse {
        let email = format!("{role}@washline.test");
        let response = self.login(&email, "secret123", role).await;
        assert_eq!(
            response.status,
            StatusCode::SEE_OTHER,
            "login as {role} failed: {}",
            response.body
        );
        response
    }

    fn form_request(&self, path: &str, fields: &[(&str, &str)]) -> Request<Body> {
        let body = fields
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");

        self.request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("Failed to build request")
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
        {
            self.store_cookie(set_cookie);
        }

        read_response(response).await
    }

    fn store_cookie(&mut self, set_cookie: &str) {
        let pair = set_cookie.split(';').next().unwrap_or_default().trim();
        let removed = set_cookie.contains("Max-Age=0")
            || pair.split_once('=').is_none_or(|(_, value)| value.is_empty());

        self.cookie = if removed {
            None
        } else {
            Some(pair.to_string())
        };
    }
}

async fn read_response(response: axum::response::Response) -> TestResponse {
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    TestResponse {
        status,
        location,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}
