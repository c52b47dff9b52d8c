//! Session store: who the current visitor is.
//!
//! Wraps the tower-sessions [`Session`] so handlers and the route guard read
//! and write identity through one place. Reads never fail: anything missing or
//! undecodable comes back as a guest.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use washline_core::Role;

use crate::models::{CurrentSession, Subscription, session_keys};

/// Session-backed identity for one client.
#[derive(Clone)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    /// Wrap a request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The stored identity, or a guest if none can be read.
    pub async fn current(&self) -> CurrentSession {
        match self
            .session
            .get::<CurrentSession>(session_keys::CURRENT_SESSION)
            .await
        {
            Ok(Some(current)) if current.is_authenticated() => current,
            Ok(_) => CurrentSession::guest(),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable session, treating visitor as guest");
                CurrentSession::guest()
            }
        }
    }

    /// The stored role, `Guest` if none can be read.
    pub async fn get_role(&self) -> Role {
        self.current().await.role
    }

    /// Establish a session after a completed login.
    ///
    /// Role and display name are written as one value. The session id is
    /// rotated so an id issued before login cannot be reused after it.
    /// Setting `Guest` clears the session instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_session(
        &self,
        role: Role,
        display_name: &str,
    ) -> Result<(), tower_sessions::session::Error> {
        if !role.is_authenticated() {
            return self.clear_session().await;
        }

        self.session.cycle_id().await?;
        self.session
            .insert(
                session_keys::CURRENT_SESSION,
                CurrentSession {
                    role,
                    display_name: display_name.to_string(),
                },
            )
            .await
    }

    /// Forget the identity and any subscription (sign-out).
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear_session(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.flush().await
    }

    /// The subscription bought in this session, if any.
    pub async fn subscription(&self) -> Option<Subscription> {
        self.session
            .get::<Subscription>(session_keys::SUBSCRIPTION)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Unreadable subscription in session");
                None
            })
    }

    /// Store a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<(), tower_sessions::session::Error> {
        self.session
            .insert(session_keys::SUBSCRIPTION, subscription)
            .await
    }
}

impl<S> FromRequestParts<S> for SessionStore
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Self::new)
    }
}
