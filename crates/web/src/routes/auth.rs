//! Authentication route handlers.
//!
//! Handles signup, login and logout. Validation failures re-render the form
//! with per-field messages; a successful login writes the session and
//! redirects to the role's landing view. Signup always creates a customer
//! account and signs it in.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;

use washline_core::Role;

use crate::error::{AppError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::OptionalSession;
use crate::models::{CurrentSession, Notice};
use crate::services::auth::{
    AuthError, AuthService, destination, landing, register_account, validate_signup,
    welcome_notice,
};
use crate::services::{FieldErrors, SessionStore};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Role picked on the form; only honoured by the demo verifier.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Signup form data. Any role field is ignored.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub return_to: Option<String>,
    pub notice: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub session: CurrentSession,
    pub notice: Option<Notice>,
    pub errors: FieldErrors,
    pub email: String,
    pub role: String,
    pub return_to: String,
    pub demo_role_selector: bool,
    pub roles: [Role; 3],
}

impl LoginTemplate {
    fn new(state: &AppState, session: CurrentSession) -> Self {
        Self {
            session,
            notice: None,
            errors: FieldErrors::new(),
            email: String::new(),
            role: Role::User.as_str().to_string(),
            return_to: String::new(),
            demo_role_selector: state.config().auth.demo_role_selector,
            roles: [Role::User, Role::Staff, Role::Admin],
        }
    }
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub session: CurrentSession,
    pub notice: Option<Notice>,
    pub errors: FieldErrors,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        notice: query.notice.as_deref().and_then(Notice::from_code),
        return_to: query.return_to.unwrap_or_default(),
        ..LoginTemplate::new(&state, session)
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    store: SessionStore,
    Form(form): Form<LoginForm>,
) -> Response {
    let selected_role = form
        .role
        .as_deref()
        .and_then(|role| role.parse::<Role>().ok());
    let password = SecretString::from(form.password);
    let return_to = form.return_to.filter(|path| !path.is_empty());

    let rerender = |status: StatusCode, notice: Option<Notice>, errors: FieldErrors| {
        let template = LoginTemplate {
            notice,
            errors,
            email: form.email.clone(),
            role: selected_role.unwrap_or(Role::User).as_str().to_string(),
            return_to: return_to.clone().unwrap_or_default(),
            ..LoginTemplate::new(&state, CurrentSession::guest())
        };
        (status, template).into_response()
    };

    let identity = match AuthService::new(state.verifier())
        .login(&form.email, &password, selected_role)
        .await
    {
        Ok(identity) => identity,
        Err(AuthError::Validation(errors)) => {
            return rerender(StatusCode::UNPROCESSABLE_ENTITY, None, errors);
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login rejected: invalid credentials");
            return rerender(
                StatusCode::UNAUTHORIZED,
                Some(Notice::LoginFailed),
                FieldErrors::new(),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            return rerender(
                StatusCode::SERVICE_UNAVAILABLE,
                Some(Notice::LoginFailed),
                FieldErrors::new(),
            );
        }
    };

    if let Err(e) = store
        .set_session(identity.role, &identity.display_name)
        .await
    {
        return AppError::Session(e).into_response();
    }

    set_sentry_user(&identity.display_name, identity.role.as_str());
    add_breadcrumb("auth", "Logged in", Some(&[("role", identity.role.as_str())]));
    tracing::info!(role = %identity.role, "Login succeeded");

    let target = destination(
        identity.role,
        return_to.as_deref(),
        state.config().auth.resume_after_login,
    );
    Redirect::to(&welcome_notice(identity.role).append_to(target)).into_response()
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(OptionalSession(session): OptionalSession) -> impl IntoResponse {
    SignupTemplate {
        session,
        notice: None,
        errors: FieldErrors::new(),
        name: String::new(),
        email: String::new(),
    }
}

/// Handle signup form submission.
pub async fn signup(
    State(state): State<AppState>,
    store: SessionStore,
    Form(form): Form<SignupForm>,
) -> Response {
    let password = SecretString::from(form.password);
    let password_confirm = SecretString::from(form.password_confirm);
    let name = form.name.trim().to_string();

    let rerender = |status: StatusCode, errors: FieldErrors| {
        let template = SignupTemplate {
            session: CurrentSession::guest(),
            notice: None,
            errors,
            name: name.clone(),
            email: form.email.clone(),
        };
        (status, template).into_response()
    };

    if let Err(errors) = validate_signup(&name, &form.email, &password, &password_confirm) {
        return rerender(StatusCode::UNPROCESSABLE_ENTITY, errors);
    }

    let account = match register_account(
        state.persistence(),
        &form.email,
        &name,
        Role::User,
        &password,
    )
    .await
    {
        Ok(account) => account,
        Err(AuthError::Validation(errors)) => {
            return rerender(StatusCode::UNPROCESSABLE_ENTITY, errors);
        }
        Err(AuthError::AccountAlreadyExists) => {
            tracing::info!("Signup rejected: email already registered");
            let mut errors = FieldErrors::new();
            errors.add("email", "An account with this email already exists");
            return rerender(StatusCode::CONFLICT, errors);
        }
        Err(e) => return AppError::Auth(e).into_response(),
    };

    if let Err(e) = store.set_session(account.role, &account.name).await {
        return AppError::Session(e).into_response();
    }

    set_sentry_user(&account.name, account.role.as_str());
    add_breadcrumb("auth", "Signed up", Some(&[("role", account.role.as_str())]));
    tracing::info!(account_id = %account.id, "Account created");

    Redirect::to(&Notice::AccountCreated.append_to(landing(account.role))).into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
pub async fn logout(store: SessionStore) -> Result<Redirect, AppError> {
    store.clear_session().await?;

    clear_sentry_user();
    add_breadcrumb("auth", "Logged out", None);

    Ok(Redirect::to(&Notice::SignedOut.append_to("/login")))
}
