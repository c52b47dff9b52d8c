//! Protected views.

use serde::{Deserialize, Serialize};

/// A navigable page that requires a signed-in role.
///
/// Public pages (scheduling form, login) are not listed here; only views the
/// route guard protects are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Customer dashboard.
    Dashboard,
    /// Admin console.
    AdminConsole,
    /// Staff console.
    StaffConsole,
}

impl View {
    /// Every protected view.
    pub const ALL: [Self; 3] = [Self::Dashboard, Self::AdminConsole, Self::StaffConsole];

    /// Request path that renders this view.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::AdminConsole => "/admin",
            Self::StaffConsole => "/staff",
        }
    }

    /// Resolve a request path back to a protected view.
    ///
    /// Returns `None` for anything that is not exactly a protected view path,
    /// including absolute URLs, so callers can never be steered off-site.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.path() == path)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Dashboard => "dashboard",
            Self::AdminConsole => "admin_console",
            Self::StaffConsole => "staff_console",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_roundtrip() {
        for view in View::ALL {
            assert_eq!(View::from_path(view.path()), Some(view));
        }
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(View::from_path("/"), None);
        assert_eq!(View::from_path("/admin/users"), None);
        assert_eq!(View::from_path("https://evil.example.com/admin"), None);
        assert_eq!(View::from_path("//evil.example.com"), None);
    }
}
