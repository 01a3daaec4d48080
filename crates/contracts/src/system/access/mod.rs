//! Role permissions, back-office page access and route guard decisions.

use crate::system::auth::Role;

/// Operation a role may perform on back-office records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    View,
    Create,
    Edit,
    Delete,
    Confirm,
    Cancel,
    CheckIn,
    CheckOut,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::View,
        Permission::Create,
        Permission::Edit,
        Permission::Delete,
        Permission::Confirm,
        Permission::Cancel,
        Permission::CheckIn,
        Permission::CheckOut,
    ];
}

pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => &Permission::ALL,
        Role::Employee => &[
            Permission::View,
            Permission::Confirm,
            Permission::CheckIn,
            Permission::CheckOut,
        ],
        Role::User | Role::Guest => &[],
    }
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// Back-office pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Bookings,
    Rooms,
    Reviews,
    Discounts,
    Users,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Bookings,
        Page::Rooms,
        Page::Reviews,
        Page::Discounts,
        Page::Users,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/admin/dashboard",
            Page::Bookings => "/admin/bookings",
            Page::Rooms => "/admin/rooms",
            Page::Reviews => "/admin/reviews",
            Page::Discounts => "/admin/discounts",
            Page::Users => "/admin/users",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Bookings => "Bookings",
            Page::Rooms => "Rooms",
            Page::Reviews => "Reviews",
            Page::Discounts => "Discounts",
            Page::Users => "Users",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Page::Dashboard => "home",
            Page::Bookings => "calendar",
            Page::Rooms => "bed",
            Page::Reviews => "star",
            Page::Discounts => "tag",
            Page::Users => "users",
        }
    }
}

pub fn can_access_page(role: Role, page: Page) -> bool {
    match page {
        Page::Users | Page::Discounts => role == Role::Admin,
        Page::Dashboard | Page::Bookings | Page::Rooms | Page::Reviews => role.is_staff(),
    }
}

/// Entry of the back-office sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub page: Page,
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
}

/// Sidebar entries visible to `role`.
pub fn admin_menu(role: Role) -> Vec<MenuEntry> {
    Page::ALL
        .iter()
        .filter(|page| can_access_page(role, **page))
        .map(|page| MenuEntry {
            page: *page,
            label: page.title(),
            path: page.path(),
            icon: page.icon(),
        })
        .collect()
}

// ============================================================================
// Route guards
// ============================================================================

pub const ADMIN_LOGIN_PATH: &str = "/auth/login";
pub const ACCESS_DENIED_PATH: &str = "/auth/access";
pub const ADMIN_HOME_PATH: &str = "/admin/dashboard";

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// Only without a staff session (the admin login page).
    GuestOnly,
    /// Needs a client session.
    Customer,
    /// Needs a staff session allowed to see the page.
    Staff(Page),
}

/// Session facts a guard decides on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessState {
    /// Role of the back-office session, if any.
    pub staff_role: Option<Role>,
    pub has_client_session: bool,
}

impl AccessState {
    pub fn has_staff_session(&self) -> bool {
        self.staff_role.map(|r| r.is_staff()).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

pub fn guard(access: RouteAccess, state: &AccessState, path: &str) -> GuardDecision {
    let redirect = urlencoding::encode(path);
    match access {
        RouteAccess::Public => GuardDecision::Allow,
        RouteAccess::GuestOnly => {
            if state.has_staff_session() {
                GuardDecision::Redirect(ADMIN_HOME_PATH.to_string())
            } else {
                GuardDecision::Allow
            }
        }
        RouteAccess::Customer => {
            if state.has_client_session {
                GuardDecision::Allow
            } else {
                GuardDecision::Redirect(format!("/?redirect={}&login=1", redirect))
            }
        }
        RouteAccess::Staff(page) => match state.staff_role {
            Some(role) if role.is_staff() => {
                if can_access_page(role, page) {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Redirect(ACCESS_DENIED_PATH.to_string())
                }
            }
            _ => GuardDecision::Redirect(format!("{}?redirect={}", ADMIN_LOGIN_PATH, redirect)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_table() {
        assert!(Permission::ALL
            .iter()
            .all(|p| has_permission(Role::Admin, *p)));
        assert!(has_permission(Role::Employee, Permission::CheckIn));
        assert!(has_permission(Role::Employee, Permission::Confirm));
        assert!(!has_permission(Role::Employee, Permission::Cancel));
        assert!(!has_permission(Role::Employee, Permission::Delete));
        assert!(!has_permission(Role::User, Permission::View));
        assert!(permissions_for(Role::Guest).is_empty());
    }

    #[test]
    fn test_page_access() {
        assert!(can_access_page(Role::Admin, Page::Users));
        assert!(!can_access_page(Role::Employee, Page::Users));
        assert!(!can_access_page(Role::Employee, Page::Discounts));
        assert!(can_access_page(Role::Employee, Page::Bookings));
        assert!(!can_access_page(Role::User, Page::Dashboard));
    }

    #[test]
    fn test_admin_menu() {
        assert_eq!(admin_menu(Role::Admin).len(), 6);
        let employee: Vec<Page> = admin_menu(Role::Employee).iter().map(|e| e.page).collect();
        assert_eq!(
            employee,
            vec![Page::Dashboard, Page::Bookings, Page::Rooms, Page::Reviews]
        );
        assert!(admin_menu(Role::Guest).is_empty());
    }

    #[test]
    fn test_staff_guard() {
        let anonymous = AccessState::default();
        assert_eq!(
            guard(RouteAccess::Staff(Page::Bookings), &anonymous, "/admin/bookings"),
            GuardDecision::Redirect("/auth/login?redirect=%2Fadmin%2Fbookings".into())
        );

        let employee = AccessState {
            staff_role: Some(Role::Employee),
            has_client_session: false,
        };
        assert_eq!(
            guard(RouteAccess::Staff(Page::Bookings), &employee, "/admin/bookings"),
            GuardDecision::Allow
        );
        assert_eq!(
            guard(RouteAccess::Staff(Page::Users), &employee, "/admin/users"),
            GuardDecision::Redirect("/auth/access".into())
        );

        // a customer role stored in the admin slot is not a staff session
        let customer_in_admin = AccessState {
            staff_role: Some(Role::User),
            has_client_session: false,
        };
        assert!(matches!(
            guard(RouteAccess::Staff(Page::Dashboard), &customer_in_admin, "/admin"),
            GuardDecision::Redirect(path) if path.starts_with("/auth/login")
        ));
    }

    #[test]
    fn test_customer_and_guest_guards() {
        let state = AccessState::default();
        assert_eq!(
            guard(RouteAccess::Customer, &state, "/my-bookings"),
            GuardDecision::Redirect("/?redirect=%2Fmy-bookings&login=1".into())
        );
        assert_eq!(guard(RouteAccess::GuestOnly, &state, "/auth/login"), GuardDecision::Allow);
        assert_eq!(guard(RouteAccess::Public, &state, "/rooms"), GuardDecision::Allow);

        let admin = AccessState {
            staff_role: Some(Role::Admin),
            has_client_session: true,
        };
        assert_eq!(
            guard(RouteAccess::GuestOnly, &admin, "/auth/login"),
            GuardDecision::Redirect("/admin/dashboard".into())
        );
        assert_eq!(guard(RouteAccess::Customer, &admin, "/my-bookings"), GuardDecision::Allow);
    }
}
