use contracts::system::access::ADMIN_HOME_PATH;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_query_map};
use thaw::*;

use crate::system::auth::context::{login_admin, use_auth};
use crate::system::auth::guard::GuestOnly;
use crate::system::auth::storage;

/// Only same-site paths are followed after login; anything else lands on the
/// dashboard.
pub fn safe_redirect(target: Option<String>, fallback: &str) -> String {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/auth/") => path,
        _ => fallback.to_string(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <GuestOnly>
            <LoginForm />
        </GuestOnly>
    }
}

#[component]
fn LoginForm() -> impl IntoView {
    let auth = use_auth();
    let query = use_query_map();
    let navigate = use_navigate();

    let remembered = storage::remembered_username();
    let remember = RwSignal::new(remembered.is_some());
    let username = RwSignal::new(remembered.unwrap_or_default());
    let password = RwSignal::new(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get_untracked();
        let password_val = password.get_untracked();
        if username_val.trim().is_empty() || password_val.is_empty() {
            set_error_message.set(Some("Enter username and password".into()));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);

        let target = safe_redirect(query.with_untracked(|q| q.get("redirect")), ADMIN_HOME_PATH);
        let navigate = navigate.clone();
        spawn_local(async move {
            match login_admin(auth, username_val, password_val, remember.get_untracked()).await {
                Ok(_) => navigate(&target, Default::default()),
                Err(e) => {
                    log::warn!("admin login failed: {}", e);
                    set_error_message.set(Some(format!("Login failed: {}", e)));
                    set_is_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Hotel Administration"</h1>
                <h2>"Sign in"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="alert alert--error">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form__group">
                        <Label>"Username"</Label>
                        <Input value=username disabled=Signal::derive(move || is_loading.get()) />
                    </div>
                    <div class="form__group">
                        <Label>"Password"</Label>
                        <Input
                            value=password
                            input_type=InputType::Password
                            disabled=Signal::derive(move || is_loading.get())
                        />
                    </div>
                    <Checkbox checked=remember label="Remember me" />

                    <button type="submit" class="btn btn-primary login-submit" disabled=move || is_loading.get()>
                        {move || if is_loading.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::safe_redirect;

    #[test]
    fn test_safe_redirect() {
        let home = "/admin/dashboard";
        assert_eq!(safe_redirect(Some("/admin/bookings".into()), home), "/admin/bookings");
        assert_eq!(safe_redirect(Some("//evil.example".into()), home), home);
        assert_eq!(safe_redirect(Some("https://evil.example".into()), home), home);
        assert_eq!(safe_redirect(Some("/auth/login".into()), home), home);
        assert_eq!(safe_redirect(None, home), home);
    }
}
