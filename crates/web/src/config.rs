//! Web service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `WASHLINE_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; when neither is set the service runs on the in-process
//!   store and every listing shows sample data)
//! - `WASHLINE_HOST` - Bind address (default: 127.0.0.1)
//! - `WASHLINE_PORT` - Listen port (default: 3000)
//! - `WASHLINE_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `WASHLINE_DEMO_ROLE_SELECTOR` - Trust the role picked on the login form (default: true)
//! - `WASHLINE_RESUME_AFTER_LOGIN` - Land on the originally requested view after login (default: false)
//! - `WASHLINE_PAYMENT_DELAY_MS` - Simulated payment latency (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web service configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Login behaviour
    pub auth: AuthConfig,
    /// Simulated latency of the payment step when subscribing
    pub payment_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Login behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthConfig {
    /// Trust the role chosen on the login form instead of resolving it from
    /// the account directory. Demo affordance only.
    pub demo_role_selector: bool,
    /// After login, go back to the protected view that triggered the
    /// redirect (when the new role may see it) instead of the role's
    /// landing view.
    pub resume_after_login: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            demo_role_selector: true,
            resume_after_login: false,
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("WASHLINE_DATABASE_URL");
        let host = get_env_or_default("WASHLINE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WASHLINE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("WASHLINE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WASHLINE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("WASHLINE_BASE_URL", "http://localhost:3000");

        let defaults = AuthConfig::default();
        let auth = AuthConfig {
            demo_role_selector: get_bool_env(
                "WASHLINE_DEMO_ROLE_SELECTOR",
                defaults.demo_role_selector,
            )?,
            resume_after_login: get_bool_env(
                "WASHLINE_RESUME_AFTER_LOGIN",
                defaults.resume_after_login,
            )?,
        };

        let payment_delay_ms = get_env_or_default("WASHLINE_PAYMENT_DELAY_MS", "2000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("WASHLINE_PAYMENT_DELAY_MS".to_string(), e.to_string())
            })?;

        let sentry_sample_rate = get_env_or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string()))?;
        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            auth,
            payment_delay: Duration::from_millis(payment_delay_ms),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The database URL, for tools that cannot run without one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no database URL is configured.
    pub fn require_database_url(&self) -> Result<&SecretString, ConfigError> {
        self.database_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("WASHLINE_DATABASE_URL".to_string()))
    }

    /// Whether session cookies must be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Configuration suitable for tests: in-process store, no payment delay.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            auth: AuthConfig::default(),
            payment_delay: Duration::ZERO,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a boolean environment variable with a default value.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    std::env::var(key).map_or(Ok(default), |value| parse_bool(key, &value))
}

/// Parse the usual spellings of a boolean flag.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
