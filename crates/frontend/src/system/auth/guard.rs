use contracts::system::access::{guard, GuardDecision, Page, RouteAccess};
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;

use super::context::use_auth;

/// Renders `children` only while the current sessions satisfy `access`,
/// otherwise navigates to the redirect the access rules name.
#[component]
pub fn RequireAccess(access: RouteAccess, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| {
        let path = location.pathname.get();
        guard(access, &auth.access_state(), &path)
    });

    Effect::new(move |_| {
        if let GuardDecision::Redirect(target) = decision.get() {
            log::debug!("guard redirect to {}", target);
            navigate(
                &target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    view! {
        <Show when=move || decision.get() == GuardDecision::Allow>
            {children()}
        </Show>
    }
}

/// Back-office page, gated by the role's page access.
#[component]
pub fn RequireStaff(page: Page, children: ChildrenFn) -> impl IntoView {
    view! {
        <RequireAccess access=RouteAccess::Staff(page)>{children()}</RequireAccess>
    }
}

/// Customer-only page such as "my bookings".
#[component]
pub fn RequireCustomer(children: ChildrenFn) -> impl IntoView {
    view! {
        <RequireAccess access=RouteAccess::Customer>{children()}</RequireAccess>
    }
}

/// Pages for visitors without a staff session (the admin login).
#[component]
pub fn GuestOnly(children: ChildrenFn) -> impl IntoView {
    view! {
        <RequireAccess access=RouteAccess::GuestOnly>{children()}</RequireAccess>
    }
}
