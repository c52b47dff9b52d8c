//! Route permission table.
//!
//! Each protected view lists every role allowed to see it. Nothing is
//! inferred from a role hierarchy: when a role is added, every entry below has
//! to be revisited by hand. The tests at the bottom pin the table and the
//! invariants the route guard relies on.

use crate::types::{Role, View};

/// Roles allowed to view `view`.
///
/// The match is exhaustive, so a new [`View`] variant fails to compile until
/// it is given an entry here.
#[must_use]
pub const fn allowed_roles(view: View) -> &'static [Role] {
    match view {
        View::Dashboard => &[Role::User, Role::Staff, Role::Admin],
        View::AdminConsole => &[Role::Admin],
        View::StaffConsole => &[Role::Staff, Role::Admin],
    }
}

/// Whether `role` may view `view`.
#[must_use]
pub fn is_allowed(view: View, role: Role) -> bool {
    allowed_roles(view).contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_membership() {
        assert!(!is_allowed(View::Dashboard, Role::Guest));
        assert!(is_allowed(View::Dashboard, Role::User));
        assert!(is_allowed(View::Dashboard, Role::Staff));
        assert!(is_allowed(View::Dashboard, Role::Admin));
    }

    #[test]
    fn test_admin_console_membership() {
        assert!(!is_allowed(View::AdminConsole, Role::Guest));
        assert!(!is_allowed(View::AdminConsole, Role::User));
        assert!(!is_allowed(View::AdminConsole, Role::Staff));
        assert!(is_allowed(View::AdminConsole, Role::Admin));
    }

    #[test]
    fn test_staff_console_membership() {
        assert!(!is_allowed(View::StaffConsole, Role::Guest));
        assert!(!is_allowed(View::StaffConsole, Role::User));
        assert!(is_allowed(View::StaffConsole, Role::Staff));
        assert!(is_allowed(View::StaffConsole, Role::Admin));
    }

    #[test]
    fn test_is_allowed_matches_table() {
        for view in View::ALL {
            for role in Role::ALL {
                assert_eq!(
                    is_allowed(view, role),
                    allowed_roles(view).contains(&role),
                    "{view} / {role}"
                );
            }
        }
    }

    #[test]
    fn test_every_view_has_roles() {
        for view in View::ALL {
            assert!(!allowed_roles(view).is_empty(), "{view} has no roles");
        }
    }

    #[test]
    fn test_guest_never_allowed() {
        for view in View::ALL {
            assert!(!is_allowed(view, Role::Guest), "guest allowed on {view}");
        }
    }

    #[test]
    fn test_admin_allowed_wherever_staff_is() {
        for view in View::ALL {
            if is_allowed(view, Role::Staff) {
                assert!(is_allowed(view, Role::Admin), "admin missing on {view}");
            }
        }
    }
}
