//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::db::Persistence;
use crate::services::auth::{CredentialVerifier, DemoVerifier, DirectoryVerifier};
use crate::services::pickups::PickupBoard;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the persistence collaborator and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    persistence: Arc<dyn Persistence>,
    pickups: PickupBoard,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The credential verifier follows `config.auth.demo_role_selector`.
    #[must_use]
    pub fn new(config: WebConfig, persistence: Arc<dyn Persistence>) -> Self {
        let verifier: Arc<dyn CredentialVerifier> = if config.auth.demo_role_selector {
            Arc::new(DemoVerifier)
        } else {
            Arc::new(DirectoryVerifier::new(Arc::clone(&persistence)))
        };

        Self::with_verifier(config, persistence, verifier)
    }

    /// Create application state with an explicit credential verifier.
    #[must_use]
    pub fn with_verifier(
        config: WebConfig,
        persistence: Arc<dyn Persistence>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let pickups = PickupBoard::new(Arc::clone(&persistence));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                persistence,
                pickups,
                verifier,
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the persistence collaborator.
    #[must_use]
    pub fn persistence(&self) -> &dyn Persistence {
        self.inner.persistence.as_ref()
    }

    /// Get a reference to the pickup board.
    #[must_use]
    pub fn pickups(&self) -> &PickupBoard {
        &self.inner.pickups
    }

    /// Get a reference to the credential verifier.
    #[must_use]
    pub fn verifier(&self) -> &dyn CredentialVerifier {
        self.inner.verifier.as_ref()
    }
}
