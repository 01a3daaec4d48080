//! Back-office navigation, filtered by the signed-in role.

use contracts::system::access::admin_menu;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;

#[component]
pub fn Sidebar() -> impl IntoView {
    let auth = use_auth();
    let location = use_location();

    let entries = move || {
        auth.staff_role()
            .map(admin_menu)
            .unwrap_or_default()
    };

    view! {
        <nav class="sidebar">
            <div class="sidebar__brand">"Hotel Admin"</div>
            <ul class="sidebar__menu">
                <For
                    each=entries
                    key=|entry| entry.path
                    children=move |entry| {
                        let path = entry.path;
                        let is_active = move || location.pathname.get().starts_with(path);
                        view! {
                            <li class="sidebar__item" class:sidebar__item--active=is_active>
                                <A href=path>
                                    {icon(entry.icon)}
                                    <span class="sidebar__label">{entry.label}</span>
                                </A>
                            </li>
                        }
                    }
                />
            </ul>
        </nav>
    }
}
