use contracts::system::access::ADMIN_HOME_PATH;
use leptos::prelude::*;
use leptos_router::components::A;

use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;

#[component]
pub fn AccessDeniedPage() -> impl IntoView {
    let auth = use_auth();
    let role = move || {
        auth.staff_role()
            .map(|r| r.label().to_string())
            .unwrap_or_else(|| "Guest".to_string())
    };

    view! {
        <div class="login-container">
            <div class="login-box access-denied">
                {icon("lock")}
                <h1>"Access denied"</h1>
                <p>{move || format!("Your role ({}) cannot open this page.", role())}</p>
                <A href=ADMIN_HOME_PATH>"Back to dashboard"</A>
            </div>
        </div>
    }
}
