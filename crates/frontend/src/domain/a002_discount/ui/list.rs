use chrono::Local;
use contracts::domain::a002_discount::{Discount, DiscountApplication};
use contracts::shared::format::{format_currency, format_naive_date};
use contracts::system::access::Page;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::{DiscountDetails, GenerateDiscounts};
use crate::domain::a002_discount::api;
use crate::shared::api_utils::{config, ApiClient};
use crate::shared::components::dialog::ConfirmDialog;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::sort_header::{next_sort, SortHeader};
use crate::shared::components::status_badge::SeverityBadge;
use crate::shared::icons::icon;
use crate::shared::list_utils::{filter_list, page_slice, sort_list, total_pages};
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireStaff;

#[derive(Clone, Debug)]
struct DiscountsListState {
    all: Vec<Discount>,
    active_only: bool,
    sort_field: String,
    sort_ascending: bool,
    page: usize,
    page_size: usize,
    is_loaded: bool,
}

impl Default for DiscountsListState {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            active_only: false,
            sort_field: "valid_to".to_string(),
            sort_ascending: true,
            page: 0,
            page_size: config().ui.page_size,
            is_loaded: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum ListDialog {
    None,
    Edit(Option<Discount>),
    Generate,
    Delete(Discount),
}

#[component]
pub fn DiscountsListPage() -> impl IntoView {
    view! {
        <RequireStaff page=Page::Discounts>
            <DiscountsList />
        </RequireStaff>
    }
}

#[component]
fn DiscountsList() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let state = RwSignal::new(DiscountsListState::default());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let deleting = RwSignal::new(false);
    let dialog = RwSignal::new(ListDialog::None);
    let search = RwSignal::new(String::new());
    let active_only = RwSignal::new(false);
    let today = Local::now().date_naive();

    let load_data = move || {
        let only_active = state.with_untracked(|s| s.active_only);
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = if only_active {
                api::fetch_active().await
            } else {
                api::fetch_all().await
            };
            match result {
                Ok(discounts) => state.update(|s| {
                    s.all = discounts;
                    s.is_loaded = true;
                }),
                Err(e) => {
                    auth.on_api_error(&e);
                    set_error.set(Some(format!("Failed to load discounts: {}", e)));
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

    // The active-only switch picks the endpoint.
    Effect::new(move |prev: Option<bool>| {
        let only = active_only.get();
        if prev.is_some_and(|p| p != only) {
            state.update(|s| {
                s.active_only = only;
                s.page = 0;
            });
            load_data();
        }
        only
    });

    let filtered = Memo::new(move |_| {
        let needle = search.get();
        state.with(|s| {
            let mut rows = filter_list(&s.all, &needle);
            sort_list(&mut rows, &s.sort_field, s.sort_ascending);
            rows
        })
    });
    let visible = Memo::new(move |_| {
        let (page, size) = state.with(|s| (s.page, s.page_size));
        filtered.with(|rows| page_slice(rows, page, size))
    });

    let on_sort = Callback::new(move |field: &'static str| {
        state.update(|s| {
            let (sort_field, ascending) = next_sort(&s.sort_field, s.sort_ascending, field);
            s.sort_field = sort_field;
            s.sort_ascending = ascending;
        });
    });
    let sort_field = Signal::derive(move || state.with(|s| s.sort_field.clone()));
    let sort_ascending = Signal::derive(move || state.with(|s| s.sort_ascending));

    let delete_discount = move |discount: Discount| {
        deleting.set(true);
        spawn_local(async move {
            let result = api::delete(discount.id).await;
            deleting.set(false);
            dialog.set(ListDialog::None);
            match result {
                Ok(()) => {
                    toast.success("Discount deleted", discount.code.clone());
                    load_data();
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    toast.api_error("Delete failed", &e);
                }
            }
        });
    };

    let close_dialog = Callback::new(move |_| dialog.set(ListDialog::None));
    let on_saved = Callback::new(move |saved: Discount| {
        dialog.set(ListDialog::None);
        toast.success("Discount saved", saved.code);
        load_data();
    });
    let on_generated = Callback::new(move |count: usize| {
        dialog.set(ListDialog::None);
        toast.success("Codes generated", format!("{} new discount code(s)", count));
        load_data();
    });

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Discounts"</h1>
                    <Badge>{move || filtered.with(|rows| rows.len()).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| dialog.set(ListDialog::Edit(None))
                    >
                        {icon("plus")}
                        " New"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| dialog.set(ListDialog::Generate)
                    >
                        {icon("tag")}
                        " Generate"
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
                            <span class="filter-panel__title">"Filter"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || visible.with(|(page, _)| *page))
                                total_pages=Signal::derive(move || {
                                    let size = state.with(|s| s.page_size);
                                    filtered.with(|rows| total_pages(rows.len(), size))
                                })
                                total_count=Signal::derive(move || filtered.with(|rows| rows.len()))
                                page_size=Signal::derive(move || state.with(|s| s.page_size))
                                on_page_change=Callback::new(move |page| state.update(|s| s.page = page))
                                on_page_size_change=Callback::new(move |size| state.update(|s| {
                                    s.page_size = size;
                                    s.page = 0;
                                }))
                            />
                        </div>
                    </div>
                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::Center>
                            <div style="flex: 1; max-width: 280px;">
                                <Input value=search placeholder="Code..." />
                            </div>
                            <Checkbox checked=active_only label="Active only" />
                        </Flex>
                    </div>
                </div>

                <CodeTester />

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <SortHeader label="Code" field="code" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=140.0 />
                                <SortHeader label="Value" field="discount_value" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <SortHeader label="From" field="valid_from" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <SortHeader label="To" field="valid_to" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <SortHeader label="Usage" field="used_count" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=160.0 />
                                <TableHeaderCell min_width=100.0>"Status"</TableHeaderCell>
                                <TableHeaderCell min_width=90.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || visible.get().1
                                key=|d| (d.id, d.used_count, d.valid, d.valid_to)
                                children=move |discount| {
                                    let status = discount.status_on(today);
                                    let usage = discount.usage_percentage().min(100.0);
                                    let days_left = discount.days_remaining(today);
                                    let for_edit = discount.clone();
                                    let for_delete = discount.clone();
                                    let code = discount.code.clone();
                                    let value = discount.format_value();
                                    let valid_from = format_naive_date(discount.valid_from);
                                    let valid_to = format_naive_date(discount.valid_to);
                                    let used = format!("{} / {}", discount.used_count, discount.max_uses);
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span style="font-weight: 500; font-family: monospace;">{code}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{value}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{valid_from}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <div class="cell-stack">
                                                        <span>{valid_to}</span>
                                                        <span class="cell-stack__secondary">
                                                            {format!("{} day(s) left", days_left)}
                                                        </span>
                                                    </div>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <div class="usage-bar" title=format!("{:.0}%", usage)>
                                                    <div class="usage-bar__fill" style=format!("width: {:.0}%;", usage)></div>
                                                </div>
                                                <span class="usage-bar__label">
                                                    {used}
                                                </span>
                                            </TableCell>
                                            <TableCell>
                                                <SeverityBadge label=status.label() severity=status.severity() />
                                            </TableCell>
                                            <TableCell>
                                                <div class="row-actions">
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| dialog.set(ListDialog::Edit(Some(for_edit.clone())))
                                                        attr:title="Edit"
                                                    >
                                                        {icon("edit")}
                                                    </Button>
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| dialog.set(ListDialog::Delete(for_delete.clone()))
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
                    <Show when=move || state.with(|s| s.is_loaded) && filtered.with(|rows| rows.is_empty())>
                        <div class="table__empty">"No discounts"</div>
                    </Show>
                </div>

                {move || match dialog.get() {
                    ListDialog::None => None,
                    ListDialog::Edit(discount) => Some(view! {
                        <DiscountDetails discount=discount on_saved=on_saved on_cancel=close_dialog />
                    }.into_any()),
                    ListDialog::Generate => Some(view! {
                        <GenerateDiscounts on_generated=on_generated on_cancel=close_dialog />
                    }.into_any()),
                    ListDialog::Delete(discount) => {
                        let message = format!(
                            "Delete discount {}? It has been used {} time(s).",
                            discount.code, discount.used_count
                        );
                        Some(view! {
                            <ConfirmDialog
                                title="Delete discount"
                                message=message
                                confirm_label="Delete"
                                busy=deleting
                                on_confirm=Callback::new(move |_| delete_discount(discount.clone()))
                                on_cancel=close_dialog
                            />
                        }.into_any())
                    }
                }}
            </div>
        </div>
    }
}

/// Checks a code against an amount through the backend, as checkout would.
#[component]
fn CodeTester() -> impl IntoView {
    let toast = use_toast();
    let code = RwSignal::new(String::new());
    let amount = RwSignal::new(String::new());
    let result = RwSignal::new(None::<DiscountApplication>);
    let found = RwSignal::new(None::<Discount>);
    let (checking, set_checking) = signal(false);

    let look_up = move || {
        let code_value = code.get_untracked();
        if code_value.trim().is_empty() {
            return;
        }
        set_checking.set(true);
        result.set(None);
        spawn_local(async move {
            match api::fetch_by_code(&code_value).await {
                Ok(discount) => found.set(Some(discount)),
                Err(e) => {
                    found.set(None);
                    toast.api_error("Code not found", &e);
                }
            }
            set_checking.set(false);
        });
    };

    let check = move || {
        let raw_amount = amount.get_untracked();
        let Ok(value) = raw_amount.trim().parse::<f64>() else {
            toast.warn("Invalid amount", "Enter the booking total to test against");
            return;
        };
        let code_value = code.get_untracked();
        set_checking.set(true);
        result.set(None);
        found.set(None);
        spawn_local(async move {
            match api::apply(ApiClient::admin(), &code_value, value).await {
                Ok(application) => result.set(Some(application)),
                Err(e) => toast.api_error("Code not applicable", &e),
            }
            set_checking.set(false);
        });
    };

    view! {
        <div class="code-tester">
            <Flex gap=FlexGap::Small align=FlexAlign::Center>
                <span class="code-tester__title">"Try a code"</span>
                <div style="max-width: 180px;">
                    <Input value=code placeholder="Code" />
                </div>
                <div style="max-width: 180px;">
                    <Input value=amount placeholder="Amount" />
                </div>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| check()
                    disabled=Signal::derive(move || checking.get())
                >
                    "Apply"
                </Button>
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| look_up()
                    disabled=Signal::derive(move || checking.get())
                >
                    "Look up"
                </Button>
                {move || found.get().map(|d| {
                    let status = d.status_on(Local::now().date_naive());
                    view! {
                        <span class="code-tester__result">
                            {format!("{} \u{b7} {} \u{b7} {}/{} used ", d.code, d.format_value(), d.used_count, d.max_uses)}
                            <SeverityBadge label=status.label() severity=status.severity() />
                        </span>
                    }
                })}
                {move || result.get().map(|r| view! {
                    <span class="code-tester__result">
                        {format!(
                            "{} - {} = {}",
                            format_currency(r.original_amount),
                            format_currency(r.discount_amount),
                            format_currency(r.discounted_amount),
                        )}
                    </span>
                })}
            </Flex>
        </div>
    }
}
