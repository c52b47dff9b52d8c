//! Authentication service.
//!
//! Validates the login form, resolves a role through a [`CredentialVerifier`]
//! and decides where a freshly signed-in visitor lands. Writing the session
//! is left to the caller so this module stays free of request types.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use washline_core::{Email, EmailError, Role, View, is_allowed};

use crate::db::{NewAccount, Persistence, RepositoryError};
use crate::models::{Account, Notice};
use crate::services::validation::FieldErrors;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Built-in owner login accepted by the demo verifier.
pub const DEMO_ADMIN_EMAIL: &str = "admin@example.com";
const DEMO_ADMIN_PASSWORD: &str = "admin123";

/// Who a successful login resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: Role,
    pub display_name: String,
}

/// Resolves submitted credentials to an identity.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify `email`/`password`, optionally honouring the role picked on the
    /// form.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the credentials are
    /// rejected, or `AuthError::Repository` when the directory is unreachable.
    async fn verify(
        &self,
        email: &Email,
        password: &SecretString,
        selected_role: Option<Role>,
    ) -> Result<Identity, AuthError>;
}

// =============================================================================
// Verifiers
// =============================================================================

/// Trusts the role picked on the login form.
///
/// Any well-formed credentials are accepted. Only enabled when the demo role
/// selector is switched on.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoVerifier;

#[async_trait]
impl CredentialVerifier for DemoVerifier {
    async fn verify(
        &self,
        email: &Email,
        password: &SecretString,
        selected_role: Option<Role>,
    ) -> Result<Identity, AuthError> {
        let is_demo_admin = email.as_str() == DEMO_ADMIN_EMAIL
            && password.expose_secret() == DEMO_ADMIN_PASSWORD;

        let identity = match selected_role {
            Some(Role::Admin) => operator(Role::Admin),
            _ if is_demo_admin => operator(Role::Admin),
            Some(Role::Staff) => operator(Role::Staff),
            _ => Identity {
                role: Role::User,
                display_name: display_name_from_email(email),
            },
        };

        Ok(identity)
    }
}

fn operator(role: Role) -> Identity {
    let display_name = match role {
        Role::Admin => "Admin",
        _ => "Staff",
    };
    Identity {
        role,
        display_name: display_name.to_string(),
    }
}

/// Resolves roles from the `accounts` directory and checks Argon2 hashes.
///
/// The role picked on the form is ignored.
#[derive(Clone)]
pub struct DirectoryVerifier {
    persistence: Arc<dyn Persistence>,
}

impl DirectoryVerifier {
    #[must_use]
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl CredentialVerifier for DirectoryVerifier {
    async fn verify(
        &self,
        email: &Email,
        password: &SecretString,
        _selected_role: Option<Role>,
    ) -> Result<Identity, AuthError> {
        let account = self
            .persistence
            .find_account(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.expose_secret(), &account.password_hash)?;

        if !account.role.is_authenticated() {
            return Err(AuthError::InvalidCredentials);
        }

        let display_name = if account.role.is_operator() {
            account.name.clone()
        } else {
            display_name_from_email(&account.email)
        };

        Ok(Identity {
            role: account.role,
            display_name,
        })
    }
}

// =============================================================================
// Service
// =============================================================================

/// Login orchestration over a credential verifier.
pub struct AuthService<'a> {
    verifier: &'a dyn CredentialVerifier,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(verifier: &'a dyn CredentialVerifier) -> Self {
        Self { verifier }
    }

    /// Validate the form and resolve the visitor's identity.
    ///
    /// The verifier is not called while any field is invalid.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` with per-field messages, or whatever
    /// the verifier reports.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
        selected_role: Option<Role>,
    ) -> Result<Identity, AuthError> {
        let email = validate_credentials(email, password).map_err(AuthError::Validation)?;
        self.verifier.verify(&email, password, selected_role).await
    }
}

/// Check the login form fields.
///
/// # Errors
///
/// Returns the collected field errors when the email is missing or
/// malformed, or the password is missing or too short.
pub fn validate_credentials(email: &str, password: &SecretString) -> Result<Email, FieldErrors> {
    let mut errors = FieldErrors::new();

    let parsed = match Email::parse(email) {
        Ok(email) => Some(email),
        Err(EmailError::Empty) => {
            errors.add("email", "Email is required");
            None
        }
        Err(_) => {
            errors.add("email", "Email is invalid");
            None
        }
    };

    let password = password.expose_secret();
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }

    match parsed {
        Some(email) => errors.into_result(email),
        None => Err(errors),
    }
}

/// Greeting name for a customer: the email's local part with its first
/// character upper-cased and the rest left alone.
#[must_use]
pub fn display_name_from_email(email: &Email) -> String {
    let mut chars = email.local_part().chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

// =============================================================================
// Landing
// =============================================================================

/// Default view for a freshly signed-in role.
#[must_use]
pub const fn landing(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::Staff => "/staff",
        Role::User => "/schedule",
        Role::Guest => "/login",
    }
}

/// Notice shown on arrival after login.
#[must_use]
pub const fn welcome_notice(role: Role) -> Notice {
    match role {
        Role::Admin => Notice::WelcomeAdmin,
        Role::Staff => Notice::WelcomeStaff,
        Role::User | Role::Guest => Notice::LoggedIn,
    }
}

/// Where to send `role` after login.
///
/// With `resume` on, a `return_to` naming a protected view the role may see
/// wins over the landing view. Anything else in `return_to` is ignored, so
/// only known in-app paths are ever redirected to.
#[must_use]
pub fn destination(role: Role, return_to: Option<&str>, resume: bool) -> &'static str {
    return_to
        .and_then(View::from_path)
        .filter(|view| resume && is_allowed(*view, role))
        .map_or_else(|| landing(role), View::path)
}

// =============================================================================
// Directory Accounts
// =============================================================================

/// Check the signup form fields.
///
/// # Errors
///
/// Returns every failing field: the login checks on email and password,
/// plus a missing name or a confirmation that does not match.
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &SecretString,
    password_confirm: &SecretString,
) -> Result<(), FieldErrors> {
    let mut errors = validate_credentials(email, password)
        .err()
        .unwrap_or_default();

    if name.trim().is_empty() {
        errors.add("name", "Name is required");
    }
    if password.expose_secret() != password_confirm.expose_secret() {
        errors.add("password_confirm", "Passwords do not match");
    }

    errors.into_result(())
}

/// Create a directory account with an Argon2 password hash.
///
/// # Errors
///
/// Returns `AuthError::Validation` for a malformed email or short password,
/// `AuthError::InvalidRole` for a guest role, `AuthError::AccountAlreadyExists`
/// if the email is taken.
pub async fn register_account(
    persistence: &dyn Persistence,
    email: &str,
    name: &str,
    role: Role,
    password: &SecretString,
) -> Result<Account, AuthError> {
    let email = validate_credentials(email, password).map_err(AuthError::Validation)?;
    if !role.is_authenticated() {
        return Err(AuthError::InvalidRole(role));
    }

    let password_hash = hash_password(password.expose_secret())?;
    let account = NewAccount {
        email,
        name: name.to_string(),
        role,
        password_hash,
    };

    persistence
        .insert_account(&account)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::AccountAlreadyExists,
            other => AuthError::Repository(other),
        })
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::db::MemoryStore;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    /// Counts calls and always answers with a customer identity.
    #[derive(Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CredentialVerifier for CountingVerifier {
        async fn verify(
            &self,
            _email: &Email,
            _password: &SecretString,
            _selected_role: Option<Role>,
        ) -> Result<Identity, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Identity {
                role: Role::User,
                display_name: "x".to_string(),
            })
        }
    }

    #[test]
    fn test_display_name_from_email() {
        let email = Email::parse("john.smith@example.com").unwrap();
        assert_eq!(display_name_from_email(&email), "John.smith");

        let email = Email::parse("élodie@example.fr").unwrap();
        assert_eq!(display_name_from_email(&email), "Élodie");
    }

    #[test]
    fn test_validate_reports_both_fields() {
        let errors = validate_credentials("not-an-email", &secret("12345")).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_validate_required_messages() {
        let errors = validate_credentials("", &secret("")).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn test_validate_accepts_six_characters() {
        let email = validate_credentials("a@b.co", &secret("123456")).unwrap();
        assert_eq!(email.as_str(), "a@b.co");
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_verifier() {
        let verifier = CountingVerifier::default();
        let service = AuthService::new(&verifier);

        let err = service
            .login("not-an-email", &secret("12345"), Some(Role::User))
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_demo_verifier_role_paths() {
        let service = AuthService::new(&DemoVerifier);

        let admin = service
            .login("anyone@example.com", &secret("secret1"), Some(Role::Admin))
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.display_name, "Admin");

        let staff = service
            .login("anyone@example.com", &secret("secret1"), Some(Role::Staff))
            .await
            .unwrap();
        assert_eq!(staff.role, Role::Staff);
        assert_eq!(staff.display_name, "Staff");

        let user = service
            .login("john.smith@example.com", &secret("secret1"), Some(Role::User))
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.display_name, "John.smith");
    }

    #[tokio::test]
    async fn test_demo_admin_credentials_win_over_selected_role() {
        let service = AuthService::new(&DemoVerifier);
        let identity = service
            .login(DEMO_ADMIN_EMAIL, &secret("admin123"), Some(Role::User))
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_directory_verifier_resolves_role_server_side() {
        let store = Arc::new(MemoryStore::new());
        register_account(
            store.as_ref(),
            "pat@washline.test",
            "Pat Operator",
            Role::Staff,
            &secret("correct-horse"),
        )
        .await
        .unwrap();

        let verifier = DirectoryVerifier::new(store);
        let service = AuthService::new(&verifier);

        let identity = service
            .login("pat@washline.test", &secret("correct-horse"), Some(Role::Admin))
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Staff);
        assert_eq!(identity.display_name, "Pat Operator");

        let err = service
            .login("pat@washline.test", &secret("wrong-horse"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = service
            .login("nobody@washline.test", &secret("correct-horse"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_directory_outage_is_repository_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_unavailable(true);
        let verifier = DirectoryVerifier::new(store);

        let err = AuthService::new(&verifier)
            .login("pat@washline.test", &secret("correct-horse"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Repository(_)));
    }

    #[tokio::test]
    async fn test_register_duplicate_account() {
        let store = MemoryStore::new();
        let password = secret("correct-horse");
        register_account(&store, "pat@washline.test", "Pat", Role::Admin, &password)
            .await
            .unwrap();
        let err = register_account(&store, "pat@washline.test", "Pat", Role::Admin, &password)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountAlreadyExists));
    }

    #[test]
    fn test_validate_signup_collects_every_field() {
        let errors =
            validate_signup("  ", "not-an-email", &secret("12345"), &secret("54321")).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert!(errors.has("password"));
        assert_eq!(errors.get("password_confirm"), Some("Passwords do not match"));

        assert!(
            validate_signup("Ada", "ada@example.com", &secret("secret1"), &secret("secret1"))
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_register_guest_account_is_invalid_role() {
        let store = MemoryStore::new();
        let err = register_account(
            &store,
            "pat@washline.test",
            "Pat",
            Role::Guest,
            &secret("correct-horse"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidRole(Role::Guest)));
        let email = Email::parse("pat@washline.test").unwrap();
        assert!(store.find_account(&email).await.unwrap().is_none());
    }

    #[test]
    fn test_landing_per_role() {
        assert_eq!(landing(Role::Admin), "/admin");
        assert_eq!(landing(Role::Staff), "/staff");
        assert_eq!(landing(Role::User), "/schedule");
    }

    #[test]
    fn test_destination_ignores_return_to_unless_resuming() {
        assert_eq!(destination(Role::Admin, Some("/dashboard"), false), "/admin");
        assert_eq!(destination(Role::Admin, Some("/dashboard"), true), "/dashboard");
    }

    #[test]
    fn test_destination_rejects_disallowed_or_unknown_paths() {
        assert_eq!(destination(Role::Staff, Some("/admin"), true), "/staff");
        assert_eq!(destination(Role::User, Some("https://evil.test"), true), "/schedule");
        assert_eq!(destination(Role::User, None, true), "/schedule");
    }
}
