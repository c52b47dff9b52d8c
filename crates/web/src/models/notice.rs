//! One-shot notices shown after a redirect.
//!
//! A notice travels as `?notice=<code>` on the redirect target and is
//! rendered once by the page that receives it. Unknown codes are ignored.

use serde::Deserialize;

/// Severity of a notice, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    /// CSS class for the notice banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notice notice-success",
            Self::Info => "notice notice-info",
            Self::Error => "notice notice-error",
        }
    }
}

/// A user-facing outcome message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    WelcomeAdmin,
    WelcomeStaff,
    LoggedIn,
    LoginFailed,
    LoginRequired,
    AccessDenied,
    SubscribeLoginRequired,
    SignedOut,
    AccountCreated,
    PickupScheduled,
    ScheduleFailed,
    PickupsUnavailable,
    StatusUpdated,
    StatusUpdateFailed,
    UpdateInFlight,
    SampleRowReadOnly,
    Subscribed,
    PaymentFailed,
}

impl Notice {
    const ALL: [Self; 18] = [
        Self::WelcomeAdmin,
        Self::WelcomeStaff,
        Self::LoggedIn,
        Self::LoginFailed,
        Self::LoginRequired,
        Self::AccessDenied,
        Self::SubscribeLoginRequired,
        Self::SignedOut,
        Self::AccountCreated,
        Self::PickupScheduled,
        Self::ScheduleFailed,
        Self::PickupsUnavailable,
        Self::StatusUpdated,
        Self::StatusUpdateFailed,
        Self::UpdateInFlight,
        Self::SampleRowReadOnly,
        Self::Subscribed,
        Self::PaymentFailed,
    ];

    /// Query-string code for this notice.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::WelcomeAdmin => "welcome_admin",
            Self::WelcomeStaff => "welcome_staff",
            Self::LoggedIn => "logged_in",
            Self::LoginFailed => "login_failed",
            Self::LoginRequired => "login_required",
            Self::AccessDenied => "access_denied",
            Self::SubscribeLoginRequired => "subscribe_login_required",
            Self::SignedOut => "signed_out",
            Self::AccountCreated => "account_created",
            Self::PickupScheduled => "pickup_scheduled",
            Self::ScheduleFailed => "schedule_failed",
            Self::PickupsUnavailable => "pickups_unavailable",
            Self::StatusUpdated => "status_updated",
            Self::StatusUpdateFailed => "status_update_failed",
            Self::UpdateInFlight => "update_in_flight",
            Self::SampleRowReadOnly => "sample_row_read_only",
            Self::Subscribed => "subscribed",
            Self::PaymentFailed => "payment_failed",
        }
    }

    /// Look a notice up by its query-string code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|notice| notice.code() == code)
    }

    /// Severity of this notice.
    #[must_use]
    pub const fn level(self) -> NoticeLevel {
        match self {
            Self::WelcomeAdmin
            | Self::WelcomeStaff
            | Self::LoggedIn
            | Self::SignedOut
            | Self::AccountCreated
            | Self::PickupScheduled
            | Self::StatusUpdated
            | Self::Subscribed => NoticeLevel::Success,
            Self::LoginRequired
            | Self::AccessDenied
            | Self::SubscribeLoginRequired
            | Self::SampleRowReadOnly
            | Self::UpdateInFlight => NoticeLevel::Info,
            Self::LoginFailed
            | Self::ScheduleFailed
            | Self::PickupsUnavailable
            | Self::StatusUpdateFailed
            | Self::PaymentFailed => NoticeLevel::Error,
        }
    }

    /// Text shown to the user.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::WelcomeAdmin => "Welcome back, Admin!",
            Self::WelcomeStaff => "Welcome back, Staff member!",
            Self::LoggedIn => "Successfully logged in!",
            Self::LoginFailed => "We couldn't sign you in. Please check your details and try again.",
            Self::LoginRequired => "Please login to continue.",
            Self::AccessDenied => "Please sign in with an account that can open that page.",
            Self::SubscribeLoginRequired => "Please login to subscribe to a plan.",
            Self::SignedOut => "You have been signed out.",
            Self::AccountCreated => "Your account is ready. Welcome to Washline!",
            Self::PickupScheduled => "Your service has been scheduled!",
            Self::ScheduleFailed => "We couldn't schedule your pickup. Please try again.",
            Self::PickupsUnavailable => "Pickups could not be loaded. Showing the last known list.",
            Self::StatusUpdated => "Pickup status updated.",
            Self::StatusUpdateFailed => "Failed to update pickup status.",
            Self::UpdateInFlight => "That pickup is already being updated.",
            Self::SampleRowReadOnly => "Sample pickups cannot be updated.",
            Self::Subscribed => "Subscription activated!",
            Self::PaymentFailed => "Payment failed. Please try again.",
        }
    }

    /// CSS class for the banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        self.level().css_class()
    }

    /// Append this notice to a redirect target.
    #[must_use]
    pub fn append_to(self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}notice={}", self.code())
    }
}

/// Query parameter carrying a notice code.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

impl NoticeQuery {
    /// The notice named by the query, if it is a known code.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.notice.as_deref().and_then(Notice::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for notice in Notice::ALL {
            assert_eq!(Notice::from_code(notice.code()), Some(notice));
        }
    }

    #[test]
    fn test_unknown_code_is_ignored() {
        assert_eq!(Notice::from_code("<script>"), None);
        let query = NoticeQuery {
            notice: Some("nope".into()),
        };
        assert_eq!(query.notice(), None);
    }

    #[test]
    fn test_append_to() {
        assert_eq!(
            Notice::LoggedIn.append_to("/schedule"),
            "/schedule?notice=logged_in"
        );
        assert_eq!(
            Notice::LoginRequired.append_to("/login?return_to=%2Fadmin"),
            "/login?return_to=%2Fadmin&notice=login_required"
        );
    }

    #[test]
    fn test_levels() {
        assert_eq!(Notice::WelcomeAdmin.level(), NoticeLevel::Success);
        assert_eq!(Notice::StatusUpdateFailed.level(), NoticeLevel::Error);
        assert_eq!(Notice::LoginRequired.level(), NoticeLevel::Info);
    }
}
