mod state;

use contracts::shared::format::format_date;
use contracts::system::access::Page;
use contracts::system::auth::Role;
use contracts::system::users::User;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::components::dialog::ConfirmDialog;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::sort_header::{next_sort, SortHeader};
use crate::shared::icons::icon;
use crate::shared::list_utils::{page_slice, sort_list, total_pages};
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireStaff;
use crate::system::users::api;
use state::{create_state, UsersListState};

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequireStaff page=Page::Users>
            <UsersList />
        </RequireStaff>
    }
}

fn recalc_pagination(state: &mut UsersListState) {
    state.total_pages = total_pages(state.total_count, state.page_size);
    if state.page >= state.total_pages {
        state.page = state.total_pages.saturating_sub(1);
    }
}

fn role_badge_class(role: Role) -> &'static str {
    match role {
        Role::Admin => "badge badge--warning",
        Role::Employee => "badge badge--info",
        Role::User => "badge badge--neutral",
        Role::Guest => "badge",
    }
}

#[component]
fn UsersList() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let state = create_state();
    let all_users: RwSignal<Vec<User>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let (show_create_form, set_show_create_form) = signal(false);
    let editing_user: RwSignal<Option<User>> = RwSignal::new(None);
    let deleting_user: RwSignal<Option<User>> = RwSignal::new(None);
    let deleting = RwSignal::new(false);

    let refresh_view = move || {
        let mut data = all_users.get_untracked();
        state.update(|s| {
            sort_list(&mut data, &s.sort_field, s.sort_ascending);
            s.total_count = data.len();
            recalc_pagination(s);
            s.items = page_slice(&data, s.page, s.page_size).1;
        });
    };

    let load_data = move || {
        let keyword = state.with_untracked(|s| s.search_query.clone());
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::search_users(&keyword).await {
                Ok(data) => {
                    all_users.set(data);
                    state.update(|s| {
                        s.page = 0;
                        s.is_loaded = true;
                    });
                    refresh_view();
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    set_error.set(Some(format!("Failed to load users: {}", e)));
                }
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            load_data();
        }
    });

    let search_signal = RwSignal::new(String::new());

    let apply_search = move || {
        state.update(|s| s.search_query = search_signal.get_untracked());
        load_data();
    };

    let on_sort = Callback::new(move |field: &'static str| {
        state.update(|s| {
            let (sort_field, ascending) = next_sort(&s.sort_field, s.sort_ascending, field);
            s.sort_field = sort_field;
            s.sort_ascending = ascending;
        });
        refresh_view();
    });
    let sort_field = Signal::derive(move || state.with(|s| s.sort_field.clone()));
    let sort_ascending = Signal::derive(move || state.with(|s| s.sort_ascending));

    let go_to_page = move |page: usize| {
        state.update(|s| s.page = page);
        refresh_view();
    };

    let change_page_size = move |size: usize| {
        state.update(|s| {
            s.page_size = size;
            s.page = 0;
        });
        refresh_view();
    };

    let confirm_delete = move |user: User| {
        deleting.set(true);
        spawn_local(async move {
            let result = api::delete_user(user.id).await;
            deleting.set(false);
            deleting_user.set(None);
            match result {
                Ok(()) => {
                    toast.success("User deleted", user.username.clone());
                    load_data();
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    toast.api_error("Delete failed", &e);
                }
            }
        });
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Users"</h1>
                    <Badge>{move || state.get().total_count.to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| set_show_create_form.set(true)
                    >
                        {icon("plus")}
                        " New"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Loading..." } else { " Refresh" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <span class="filter-panel__title">"Search"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || state.get().page)
                                total_pages=Signal::derive(move || state.get().total_pages)
                                total_count=Signal::derive(move || state.get().total_count)
                                page_size=Signal::derive(move || state.get().page_size)
                                on_page_change=Callback::new(go_to_page)
                                on_page_size_change=Callback::new(change_page_size)
                            />
                        </div>
                    </div>

                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 320px;">
                                <Input value=search_signal placeholder="Username, name or email..." />
                            </div>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| apply_search()
                                disabled=Signal::derive(move || loading.get())
                            >
                                "Search"
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| {
                                    search_signal.set(String::new());
                                    apply_search();
                                }
                            >
                                "Reset"
                            </Button>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <SortHeader label="Username" field="username" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=140.0 />
                                <SortHeader label="Full name" field="full_name" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=160.0 />
                                <SortHeader label="Email" field="email" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=160.0 />
                                <TableHeaderCell min_width=110.0>"Phone"</TableHeaderCell>
                                <SortHeader label="Role" field="role" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <TableHeaderCell min_width=80.0>"Status"</TableHeaderCell>
                                <SortHeader label="Created" field="created_at" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <TableHeaderCell min_width=90.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || state.get().items
                                key=|u| (u.id, u.role, u.active, u.email.clone())
                                children=move |user| {
                                    let user_for_edit = user.clone();
                                    let user_for_delete = user.clone();
                                    let is_self = auth.staff_username().as_deref() == Some(user.username.as_str());
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span style="font-weight: 500;">{user.username.clone()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {user.full_name.clone().unwrap_or_default()}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{user.email.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{user.phone.clone().unwrap_or_default()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <span class=role_badge_class(user.role)>{user.role.label()}</span>
                                            </TableCell>
                                            <TableCell>
                                                {if user.active {
                                                    view! { <span class="badge badge--success">"Active"</span> }.into_any()
                                                } else {
                                                    view! { <span class="badge badge--error">"Blocked"</span> }.into_any()
                                                }}
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {user.created_at.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <div class="row-actions">
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| editing_user.set(Some(user_for_edit.clone()))
                                                        attr:title="Edit"
                                                    >
                                                        {icon("edit")}
                                                    </Button>
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Subtle
                                                        disabled=is_self
                                                        on_click=move |_| deleting_user.set(Some(user_for_delete.clone()))
                                                        attr:title="Delete"
                                                    >
                                                        {icon("trash")}
                                                    </Button>
                                                </div>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                {move || show_create_form.get().then(|| view! {
                    <super::details::CreateUserForm
                        on_close=Callback::new(move |_| set_show_create_form.set(false))
                        on_created=Callback::new(move |user: User| {
                            set_show_create_form.set(false);
                            toast.success("User created", user.username);
                            load_data();
                        })
                    />
                })}

                {move || editing_user.get().map(|user| view! {
                    <super::details::EditUserForm
                        user=user
                        on_close=Callback::new(move |_| editing_user.set(None))
                        on_saved=Callback::new(move |saved: User| {
                            editing_user.set(None);
                            toast.success("User saved", saved.username);
                            load_data();
                        })
                    />
                })}

                {move || deleting_user.get().map(|user| {
                    let message = format!("Delete user {}? This cannot be undone.", user.username);
                    view! {
                        <ConfirmDialog
                            title="Delete user"
                            message=message
                            confirm_label="Delete"
                            busy=deleting
                            on_confirm=Callback::new(move |_| confirm_delete(user.clone()))
                            on_cancel=Callback::new(move |_| deleting_user.set(None))
                        />
                    }
                })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recalc_pagination_clamps_page() {
        let mut state = UsersListState {
            page: 7,
            page_size: 10,
            total_count: 25,
            ..UsersListState::default()
        };
        recalc_pagination(&mut state);
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.page, 2);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let mut state = UsersListState {
            total_count: 0,
            ..UsersListState::default()
        };
        recalc_pagination(&mut state);
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.page, 0);
    }
}
