//! Route guard for protected views.
//!
//! Every request to a protected route reads the session and consults the
//! role policy. The decision is synchronous once the session is loaded and
//! never writes to the session.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn admin_console(guard: RequireView<AdminConsole>) -> impl IntoResponse {
//!     format!("Hello, {}!", guard.session.display_name)
//! }
//! ```

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use washline_core::{View, is_allowed};

use crate::error::add_breadcrumb;
use crate::models::{CurrentSession, Notice};
use crate::services::SessionStore;

/// Outcome of checking a session against a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the view.
    Render,
    /// Send the visitor to login, remembering where they were going.
    RedirectToLogin { view: View, notice: Notice },
}

/// Decide whether `session` may see `view`.
///
/// Redirects when the visitor is not signed in or their role is not listed
/// for the view.
#[must_use]
pub fn evaluate(view: View, session: &CurrentSession) -> GuardDecision {
    if !session.is_authenticated() {
        return GuardDecision::RedirectToLogin {
            view,
            notice: Notice::LoginRequired,
        };
    }

    if !is_allowed(view, session.role) {
        return GuardDecision::RedirectToLogin {
            view,
            notice: Notice::AccessDenied,
        };
    }

    GuardDecision::Render
}

/// Login URL carrying the originally requested view.
#[must_use]
pub fn login_redirect(view: View, notice: Notice) -> String {
    notice.append_to(&format!(
        "/login?return_to={}",
        urlencoding::encode(view.path())
    ))
}

// =============================================================================
// Extractors
// =============================================================================

/// A view the guard can protect.
pub trait ProtectedView: Send + Sync + 'static {
    const VIEW: View;
}

/// Customer dashboard.
pub struct Dashboard;

/// Admin console.
pub struct AdminConsole;

/// Staff console.
pub struct StaffConsole;

impl ProtectedView for Dashboard {
    const VIEW: View = View::Dashboard;
}

impl ProtectedView for AdminConsole {
    const VIEW: View = View::AdminConsole;
}

impl ProtectedView for StaffConsole {
    const VIEW: View = View::StaffConsole;
}

/// Extractor that only succeeds when the session may see `V`.
pub struct RequireView<V: ProtectedView> {
    pub session: CurrentSession,
    view: PhantomData<V>,
}

/// Redirect issued when the guard denies a request.
#[derive(Debug)]
pub struct GuardRejection {
    view: View,
    notice: Notice,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        Redirect::to(&login_redirect(self.view, self.notice)).into_response()
    }
}

impl<S, V> FromRequestParts<S> for RequireView<V>
where
    S: Send + Sync,
    V: ProtectedView,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // No session layer means no identity: treat as guest.
        let session = match SessionStore::from_request_parts(parts, state).await {
            Ok(store) => store.current().await,
            Err(_) => CurrentSession::guest(),
        };

        match evaluate(V::VIEW, &session) {
            GuardDecision::Render => Ok(Self {
                session,
                view: PhantomData,
            }),
            GuardDecision::RedirectToLogin { view, notice } => {
                tracing::info!(
                    view = %view,
                    role = %session.role,
                    path = %parts.uri.path(),
                    "Navigation denied, redirecting to login"
                );
                add_breadcrumb(
                    "navigation",
                    "Redirected to login",
                    Some(&[("view", view.path()), ("role", session.role.as_str())]),
                );
                Err(GuardRejection { view, notice })
            }
        }
    }
}

/// Extractor for the current visitor, guest if not signed in.
///
/// Never rejects.
pub struct OptionalSession(pub CurrentSession);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = match SessionStore::from_request_parts(parts, state).await {
            Ok(store) => store.current().await,
            Err(_) => CurrentSession::guest(),
        };
        Ok(Self(session))
    }
}

#[cfg(test)]
mod tests {
    use washline_core::Role;

    use super::*;

    fn session(role: Role) -> CurrentSession {
        CurrentSession {
            role,
            display_name: role.to_string(),
        }
    }

    #[test]
    fn test_guest_redirected_everywhere() {
        for view in View::ALL {
            assert_eq!(
                evaluate(view, &CurrentSession::guest()),
                GuardDecision::RedirectToLogin {
                    view,
                    notice: Notice::LoginRequired
                }
            );
        }
    }

    #[test]
    fn test_decision_follows_policy() {
        for view in View::ALL {
            for role in [Role::User, Role::Staff, Role::Admin] {
                let rendered = evaluate(view, &session(role)) == GuardDecision::Render;
                assert_eq!(rendered, is_allowed(view, role), "{view} / {role}");
            }
        }
    }

    #[test]
    fn test_wrong_role_gets_access_denied_notice() {
        assert_eq!(
            evaluate(View::AdminConsole, &session(Role::Staff)),
            GuardDecision::RedirectToLogin {
                view: View::AdminConsole,
                notice: Notice::AccessDenied
            }
        );
    }

    #[test]
    fn test_login_redirect_carries_return_to() {
        assert_eq!(
            login_redirect(View::AdminConsole, Notice::LoginRequired),
            "/login?return_to=%2Fadmin&notice=login_required"
        );
    }

    #[test]
    fn test_marker_views() {
        assert_eq!(Dashboard::VIEW, View::Dashboard);
        assert_eq!(AdminConsole::VIEW, View::AdminConsole);
        assert_eq!(StaffConsole::VIEW, View::StaffConsole);
    }
}
