//! Session middleware configuration.
//!
//! Sessions live in `PostgreSQL` when a database is configured and in process
//! memory otherwise. Both use the same cookie settings.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "washline_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over `store`.
///
/// # Arguments
///
/// * `store` - `PostgresStore` or `MemoryStore`
/// * `config` - Web configuration (for the secure-cookie flag)
#[must_use]
pub fn create_session_layer<S>(store: S, config: &WebConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
