use contracts::system::auth::Role;
use contracts::system::users::{CreateUserDto, UpdateUserDto, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::components::dialog::Dialog;
use crate::system::users::api;

/// Roles an administrator can hand out.
const ASSIGNABLE_ROLES: [Role; 3] = [Role::Admin, Role::Employee, Role::User];

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.trim().to_string())
    }
}

#[component]
fn RoleSelect(role: RwSignal<Role>, #[prop(optional)] disabled: Signal<bool>) -> impl IntoView {
    view! {
        <select
            prop:value=move || role.get().code()
            on:change=move |ev| role.set(Role::from(event_target_value(&ev)))
            disabled=move || disabled.get()
        >
            {ASSIGNABLE_ROLES.iter().map(|r| view! {
                <option value=r.code()>{r.label()}</option>
            }).collect_view()}
        </select>
    }
}

#[component]
pub fn CreateUserForm(on_close: Callback<()>, on_created: Callback<User>) -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let role = RwSignal::new(Role::User);
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_saving, set_is_saving) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let dto = CreateUserDto {
            username: username.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            email: email.get_untracked().trim().to_string(),
            full_name: non_blank(full_name.get_untracked()),
            phone: non_blank(phone.get_untracked()),
            role: role.get_untracked(),
        };
        if let Err(e) = dto.validate() {
            set_error_message.set(Some(e.to_string()));
            return;
        }

        set_is_saving.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::create_user(&dto).await {
                Ok(user) => on_created.run(user),
                Err(e) => {
                    set_error_message.set(Some(format!("Failed to create user: {}", e)));
                    set_is_saving.set(false);
                }
            }
        });
    };

    view! {
        <Dialog title="New user" on_close=on_close>
            <form on:submit=on_submit>
                <div class="modal-body">
                    {move || error_message.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    <div class="form__group">
                        <Label>"Username *"</Label>
                        <Input value=username disabled=Signal::derive(move || is_saving.get()) />
                    </div>
                    <div class="form__group">
                        <Label>"Password *"</Label>
                        <Input
                            value=password
                            input_type=InputType::Password
                            disabled=Signal::derive(move || is_saving.get())
                        />
                    </div>
                    <div class="form__group">
                        <Label>"Email *"</Label>
                        <Input value=email disabled=Signal::derive(move || is_saving.get()) />
                    </div>
                    <div class="form__group">
                        <Label>"Full name"</Label>
                        <Input value=full_name disabled=Signal::derive(move || is_saving.get()) />
                    </div>
                    <div class="form__group">
                        <Label>"Phone"</Label>
                        <Input value=phone disabled=Signal::derive(move || is_saving.get()) />
                    </div>
                    <div class="form__group">
                        <Label>"Role"</Label>
                        <RoleSelect role=role disabled=Signal::derive(move || is_saving.get()) />
                    </div>
                </div>
                <div class="modal-footer">
                    <button type="button" class="btn btn-secondary" on:click=move |_| on_close.run(())>
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-primary" disabled=move || is_saving.get()>
                        {move || if is_saving.get() { "Creating..." } else { "Create" }}
                    </button>
                </div>
            </form>
        </Dialog>
    }
}

#[component]
pub fn EditUserForm(user: User, on_close: Callback<()>, on_saved: Callback<User>) -> impl IntoView {
    let original = UpdateUserDto::from_user(&user);
    let email = RwSignal::new(original.email.clone());
    let full_name = RwSignal::new(original.full_name.clone().unwrap_or_default());
    let phone = RwSignal::new(original.phone.clone().unwrap_or_default());
    let role = RwSignal::new(original.role);
    let active = RwSignal::new(original.active);
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let on_save = move |_| {
        let dto = UpdateUserDto {
            id: original.id,
            email: email.get_untracked().trim().to_string(),
            full_name: non_blank(full_name.get_untracked()),
            phone: non_blank(phone.get_untracked()),
            role: role.get_untracked(),
            active: active.get_untracked(),
        };
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::update_user(&dto).await {
                Ok(saved) => on_saved.run(saved),
                Err(e) => {
                    set_error.set(Some(format!("Save failed: {}", e)));
                    set_saving.set(false);
                }
            }
        });
    };

    view! {
        <Dialog title=format!("Edit user: {}", user.username) on_close=on_close>
            <div class="modal-body">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <div class="form__group">
                    <Label>"Email"</Label>
                    <Input value=email />
                </div>
                <div class="form__group">
                    <Label>"Full name"</Label>
                    <Input value=full_name />
                </div>
                <div class="form__group">
                    <Label>"Phone"</Label>
                    <Input value=phone />
                </div>
                <div class="form__group">
                    <Label>"Role"</Label>
                    <RoleSelect role=role />
                </div>
                <Checkbox checked=active label="Active" />
            </div>
            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_save
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </Button>
            </div>
        </Dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::non_blank;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  ".into()), None);
        assert_eq!(non_blank(" Ana ".into()), Some("Ana".to_string()));
    }
}
