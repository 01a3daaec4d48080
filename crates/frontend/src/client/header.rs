//! Customer site header with the sign-in and sign-up dialogs.

use contracts::system::auth::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_query_map};
use thaw::*;

use crate::shared::components::dialog::Dialog;
use crate::shared::icons::icon;
use crate::shared::toast::use_toast;
use crate::system::auth::context::{login_client, logout_client, register_client, use_auth};
use crate::system::pages::login::safe_redirect;

#[derive(Clone, Copy, Debug, PartialEq)]
enum AuthDialog {
    None,
    Login,
    Register,
}

#[component]
pub fn SiteHeader() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let query = use_query_map();
    let navigate = use_navigate();
    let dialog = RwSignal::new(AuthDialog::None);

    // Guarded pages send visitors here with `?login=1`.
    Effect::new(move |_| {
        let wants_login = query.with(|q| q.get("login").as_deref() == Some("1"));
        if wants_login && auth.client.with_untracked(|s| s.is_none()) {
            dialog.set(AuthDialog::Login);
        }
    });

    let redirect_to = RwSignal::new(None::<String>);
    Effect::new(move |_| {
        if let Some(target) = redirect_to.get() {
            navigate(&target, Default::default());
        }
    });

    let on_logged_in = Callback::new(move |username: String| {
        dialog.set(AuthDialog::None);
        toast.success("Welcome back", username);
        if let Some(target) = query.with_untracked(|q| q.get("redirect")) {
            redirect_to.set(Some(safe_redirect(Some(target), "/")));
        }
    });

    // Customer pages guard themselves, so signing out needs no navigation.
    let on_logout = move |_| {
        logout_client(auth);
        toast.info("Signed out", "See you soon");
    };

    view! {
        <header class="site-header">
            <A href="/" attr:class="site-header__brand">"Luxury Hotel"</A>
            <nav class="site-header__nav">
                <A href="/">"Home"</A>
                <A href="/rooms">"Rooms"</A>
                <Show when=move || auth.client.with(|s| s.is_some())>
                    <A href="/bookings">"My bookings"</A>
                </Show>
            </nav>
            <div class="site-header__account">
                <Show
                    when=move || auth.client.with(|s| s.is_some())
                    fallback=move || view! {
                        <Button appearance=ButtonAppearance::Subtle on_click=move |_| dialog.set(AuthDialog::Login)>
                            {icon("log-in")}
                            " Sign in"
                        </Button>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| dialog.set(AuthDialog::Register)>
                            "Register"
                        </Button>
                    }
                >
                    <span class="site-header__user">
                        {icon("user")}
                        {move || auth.client.with(|s| s.as_ref().map(|s| s.username.clone()).unwrap_or_default())}
                    </span>
                    <Button appearance=ButtonAppearance::Subtle on_click=on_logout>
                        {icon("log-out")}
                    </Button>
                </Show>
            </div>
        </header>

        {move || match dialog.get() {
            AuthDialog::None => ().into_any(),
            AuthDialog::Login => view! {
                <LoginDialog
                    on_success=on_logged_in
                    on_register=Callback::new(move |_| dialog.set(AuthDialog::Register))
                    on_close=Callback::new(move |_| dialog.set(AuthDialog::None))
                />
            }.into_any(),
            AuthDialog::Register => view! {
                <RegisterDialog
                    on_registered=Callback::new(move |_| {
                        toast.success("Account created", "You can sign in now");
                        dialog.set(AuthDialog::Login);
                    })
                    on_close=Callback::new(move |_| dialog.set(AuthDialog::None))
                />
            }.into_any(),
        }}
    }
}

#[component]
fn LoginDialog(
    on_success: Callback<String>,
    on_register: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let name = username.get_untracked();
        let secret = password.get_untracked();
        if name.trim().is_empty() || secret.is_empty() {
            set_error.set(Some("Enter username and password".into()));
            return;
        }
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            match login_client(auth, name, secret).await {
                Ok(session) => on_success.run(session.username),
                Err(e) => {
                    set_error.set(Some(format!("Login failed: {}", e)));
                    set_busy.set(false);
                }
            }
        });
    };

    view! {
        <Dialog title="Sign in" on_close=on_close width="420px">
            <form on:submit=on_submit>
                <div class="modal-body">
                    {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    <div class="form__group">
                        <Label>"Username or email"</Label>
                        <Input value=username />
                    </div>
                    <div class="form__group">
                        <Label>"Password"</Label>
                        <Input value=password input_type=InputType::Password />
                    </div>
                    <p class="form__hint">
                        "No account yet? "
                        <a href="#" on:click=move |ev| {
                            ev.prevent_default();
                            on_register.run(());
                        }>"Register"</a>
                    </p>
                </div>
                <div class="modal-footer">
                    <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </div>
            </form>
        </Dialog>
    }
}

#[component]
fn RegisterDialog(on_registered: Callback<()>, on_close: Callback<()>) -> impl IntoView {
    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if password.get_untracked() != confirm.get_untracked() {
            set_error.set(Some("Passwords do not match".into()));
            return;
        }
        let request = RegisterRequest::new(
            &username.get_untracked(),
            &password.get_untracked(),
            &email.get_untracked(),
            &phone.get_untracked(),
            &full_name.get_untracked(),
        );
        if let Err(e) = request.validate() {
            set_error.set(Some(e.to_string()));
            return;
        }
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            match register_client(request).await {
                Ok(()) => on_registered.run(()),
                Err(e) => {
                    set_error.set(Some(format!("Registration failed: {}", e)));
                    set_busy.set(false);
                }
            }
        });
    };

    view! {
        <Dialog title="Create an account" on_close=on_close width="480px">
            <form on:submit=on_submit>
                <div class="modal-body">
                    {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    <div class="form__group">
                        <Label>"Full name *"</Label>
                        <Input value=full_name />
                    </div>
                    <div class="form__group">
                        <Label>"Email *"</Label>
                        <Input value=email />
                    </div>
                    <div class="form__group">
                        <Label>"Phone *"</Label>
                        <Input value=phone />
                    </div>
                    <div class="form__group">
                        <Label>"Username"</Label>
                        <Input value=username placeholder="Defaults to your email" />
                    </div>
                    <div class="form__group">
                        <Label>"Password *"</Label>
                        <Input value=password input_type=InputType::Password />
                    </div>
                    <div class="form__group">
                        <Label>"Repeat password *"</Label>
                        <Input value=confirm input_type=InputType::Password />
                    </div>
                </div>
                <div class="modal-footer">
                    <button type="button" class="btn btn-secondary" on:click=move |_| on_close.run(())>
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating..." } else { "Register" }}
                    </button>
                </div>
            </form>
        </Dialog>
    }
}
