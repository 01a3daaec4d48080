//! Back-office top bar: sidebar toggle, signed-in user and logout.

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::system::auth::context::{logout_admin, use_auth};
use contracts::system::access::ADMIN_LOGIN_PATH;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

#[component]
pub fn TopHeader() -> impl IntoView {
    let layout = expect_context::<AppGlobalContext>();
    let auth = use_auth();
    let navigate = use_navigate();

    let logout = move |_| {
        logout_admin(auth);
        navigate(ADMIN_LOGIN_PATH, Default::default());
    };

    let user_line = move || {
        let name = auth.staff_username().unwrap_or_default();
        let role = auth.staff_role().map(|r| r.label()).unwrap_or("");
        format!("{} ({})", name, role)
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| layout.toggle_left()
                    title="Toggle navigation"
                >
                    {icon("home")}
                </button>
                <span class="top-header__title">"Hotel Management"</span>
            </div>
            <div class="top-header__actions">
                <span class="top-header__user">{icon("user")} {user_line}</span>
                <button class="top-header__icon-btn" on:click=logout title="Log out">
                    {icon("log-out")}
                </button>
            </div>
        </div>
    }
}
