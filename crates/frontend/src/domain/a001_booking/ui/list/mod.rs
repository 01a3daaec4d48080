mod state;

use std::collections::HashSet;

use contracts::domain::a001_booking::{
    cancellable_ids, Booking, BookingAction, BookingDateRange, BookingSearch, BookingStats,
    BookingStatus,
};
use contracts::shared::dates::parse_iso_date;
use contracts::shared::export::ExportFormat;
use contracts::shared::format::{format_currency, format_naive_date, format_phone};
use contracts::system::access::{Page, Permission};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_booking::api;
use crate::domain::a001_booking::ui::details::BookingDetails;
use crate::shared::api_utils::ApiClient;
use crate::shared::components::dialog::ConfirmDialog;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::sort_header::{next_sort, SortHeader};
use crate::shared::components::stat_card::StatCard;
use crate::shared::components::status_badge::SeverityBadge;
use crate::shared::components::table_checkbox::{HeaderCheckbox, TableCheckbox};
use crate::shared::export::export_rows;
use crate::shared::icons::icon;
use crate::shared::list_utils::{page_slice, sort_list, total_pages};
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireStaff;
use state::{create_state, BookingFilter};

const ROW_ACTIONS: [BookingAction; 4] = [
    BookingAction::Confirm,
    BookingAction::CheckIn,
    BookingAction::CheckOut,
    BookingAction::Cancel,
];

#[component]
pub fn BookingsListPage() -> impl IntoView {
    view! {
        <RequireStaff page=Page::Bookings>
            <BookingsList />
        </RequireStaff>
    }
}

/// Dialog currently open on top of the list.
#[derive(Clone, Debug, PartialEq)]
enum ListDialog {
    None,
    /// Create (`None`) or edit a booking
    Details(Option<i64>),
    CancelOne(Booking),
    CancelSelected,
}

#[component]
fn BookingsList() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let state = create_state();
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let busy = RwSignal::new(false);
    let dialog = RwSignal::new(ListDialog::None);
    let selected: RwSignal<HashSet<i64>> = RwSignal::new(HashSet::new());

    let status_input = RwSignal::new(String::new());
    let start_input = RwSignal::new(String::new());
    let end_input = RwSignal::new(String::new());
    let user_input = RwSignal::new(String::new());
    let search_input = RwSignal::new(String::new());

    let load_data = move || {
        let filter = state.with_untracked(|s| s.filter.clone());
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = match &filter {
                BookingFilter::All => api::fetch_all().await,
                BookingFilter::Status(status) => api::fetch_by_status(status).await,
                BookingFilter::DateRange(range) => api::fetch_by_date_range(range).await,
                BookingFilter::User(id) => api::fetch_by_user(ApiClient::admin(), *id).await,
                BookingFilter::Search(search) => api::search(search).await,
            };
            match result {
                Ok(bookings) => {
                    log::debug!("{}: {} bookings", filter.describe(), bookings.len());
                    state.update(|s| {
                        s.all = bookings;
                        s.is_loaded = true;
                    });
                    selected.set(HashSet::new());
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    set_error.set(Some(format!("Failed to load bookings: {}", e)));
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

    let set_filter = move |filter: BookingFilter| {
        state.update(|s| {
            s.filter = filter;
            s.page = 0;
        });
        load_data();
    };

    let apply_status = move || {
        let raw = status_input.get_untracked();
        if raw.is_empty() {
            set_filter(BookingFilter::All);
        } else {
            set_filter(BookingFilter::Status(BookingStatus::from(raw)));
        }
    };

    let apply_dates = move || {
        let start = parse_iso_date(&start_input.get_untracked());
        let end = parse_iso_date(&end_input.get_untracked());
        match (start, end) {
            (Some(start_date), Some(end_date)) => {
                let range = BookingDateRange {
                    start_date,
                    end_date,
                };
                match range.validate() {
                    Ok(()) => set_filter(BookingFilter::DateRange(range)),
                    Err(e) => toast.api_error("Invalid date range", &e),
                }
            }
            _ => toast.warn("Invalid date range", "Pick both a start and an end date"),
        }
    };

    let apply_user = move || match user_input.get_untracked().trim().parse::<i64>() {
        Ok(id) if id > 0 => set_filter(BookingFilter::User(id)),
        _ => toast.warn("Invalid customer id", "Enter a positive number"),
    };

    let apply_search = move || match BookingSearch::detect(&search_input.get_untracked()) {
        Some(search) => set_filter(BookingFilter::Search(search)),
        None => set_filter(BookingFilter::All),
    };

    let reset_filters = move || {
        status_input.set(String::new());
        start_input.set(String::new());
        end_input.set(String::new());
        user_input.set(String::new());
        search_input.set(String::new());
        set_filter(BookingFilter::All);
    };

    // Sorted rows of the current filter.
    let sorted = Memo::new(move |_| {
        state.with(|s| {
            let mut rows = s.all.clone();
            sort_list(&mut rows, &s.sort_field, s.sort_ascending);
            rows
        })
    });
    let visible = Memo::new(move |_| {
        let (page, size) = state.with(|s| (s.page, s.page_size));
        sorted.with(|rows| page_slice(rows, page, size))
    });
    let stats = Memo::new(move |_| state.with(|s| BookingStats::from_bookings(&s.all)));

    let on_sort = Callback::new(move |field: &'static str| {
        state.update(|s| {
            let (sort_field, ascending) = next_sort(&s.sort_field, s.sort_ascending, field);
            s.sort_field = sort_field;
            s.sort_ascending = ascending;
        });
    });
    let sort_field = Signal::derive(move || state.with(|s| s.sort_field.clone()));
    let sort_ascending = Signal::derive(move || state.with(|s| s.sort_ascending));

    let go_to_page = move |page: usize| state.update(|s| s.page = page);
    let change_page_size = move |size: usize| {
        state.update(|s| {
            s.page_size = size;
            s.page = 0;
        })
    };

    let toggle_selection = move |id: i64, checked: bool| {
        selected.update(|s| {
            if checked {
                s.insert(id);
            } else {
                s.remove(&id);
            }
        });
    };
    let all_checked = Signal::derive(move || {
        let rows = visible.with(|(_, rows)| rows.iter().map(|b| b.id).collect::<Vec<_>>());
        !rows.is_empty() && selected.with(|s| rows.iter().all(|id| s.contains(id)))
    });
    let toggle_all = move |check: bool| {
        let ids: Vec<i64> = visible.with_untracked(|(_, rows)| rows.iter().map(|b| b.id).collect());
        selected.update(|s| {
            for id in ids {
                if check {
                    s.insert(id);
                } else {
                    s.remove(&id);
                }
            }
        });
    };

    let run_action = move |booking: Booking, action: BookingAction| {
        if action == BookingAction::Cancel {
            dialog.set(ListDialog::CancelOne(booking));
            return;
        }
        busy.set(true);
        spawn_local(async move {
            let result = match action {
                BookingAction::Confirm => api::confirm(booking.id).await,
                other => api::update_status(booking.id, other.target_status()).await,
            };
            busy.set(false);
            match result {
                Ok(()) => {
                    toast.success(
                        format!("{} done", action.label()),
                        format!("Booking #{} is now {}", booking.id, action.target_status().label()),
                    );
                    load_data();
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    toast.api_error(&format!("{} failed", action.label()), &e);
                }
            }
        });
    };

    let cancel_one = move |booking: Booking| {
        busy.set(true);
        spawn_local(async move {
            let result = api::cancel(ApiClient::admin(), booking.id).await;
            busy.set(false);
            dialog.set(ListDialog::None);
            match result {
                Ok(()) => {
                    toast.success("Booking cancelled", format!("Booking #{}", booking.id));
                    load_data();
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    toast.api_error("Cancel failed", &e);
                }
            }
        });
    };

    let cancel_selected = move || {
        let chosen: Vec<i64> = selected.get_untracked().into_iter().collect();
        let (ids, skipped) = state.with_untracked(|s| cancellable_ids(&s.all, &chosen));
        if ids.is_empty() {
            dialog.set(ListDialog::None);
            if skipped > 0 {
                toast.warn("Nothing to cancel", format!("{} booking(s) can no longer be cancelled", skipped));
            }
            return;
        }
        busy.set(true);
        spawn_local(async move {
            let outcome = api::cancel_many(ids).await;
            busy.set(false);
            dialog.set(ListDialog::None);
            let mut detail = format!("{} cancelled, {} failed", outcome.succeeded, outcome.failed);
            if skipped > 0 {
                detail.push_str(&format!(", {} skipped", skipped));
            }
            if outcome.failed == 0 {
                toast.success("Bookings cancelled", detail);
            } else if outcome.succeeded == 0 {
                toast.error("Bulk cancel failed", detail);
            } else {
                toast.warn("Bulk cancel partly failed", detail);
            }
            load_data();
        });
    };

    let export = move |format: ExportFormat| {
        let rows = sorted.get_untracked();
        if rows.is_empty() {
            toast.info("Nothing to export", "The list is empty");
            return;
        }
        match export_rows(&rows, format, "bookings", "Bookings") {
            Ok(filename) => toast.success("Export ready", filename),
            Err(e) => toast.error("Export failed", e),
        }
    };

    let on_saved = Callback::new(move |message: String| {
        dialog.set(ListDialog::None);
        toast.success("Saved", message);
        load_data();
    });
    let close_dialog = Callback::new(move |_| dialog.set(ListDialog::None));

    let count_card = move |label: &'static str, icon_name: &'static str, pick: fn(&BookingStats) -> usize| {
        view! {
            <StatCard
                label=label
                icon_name=icon_name
                value=Signal::derive(move || Some(stats.with(|s| pick(s)).to_string()))
            />
        }
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Bookings"</h1>
                    <Badge>{move || state.with(|s| s.all.len()).to_string()}</Badge>
                    <span class="page__subtitle">{move || state.with(|s| s.filter.describe())}</span>
                </div>
                <div class="page__header-right">
                    <Show when=move || auth.can(Permission::Create)>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| dialog.set(ListDialog::Details(None))
                        >
                            {icon("plus")}
                            " New"
                        </Button>
                    </Show>
                    <Show when=move || auth.can(Permission::Cancel)>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| dialog.set(ListDialog::CancelSelected)
                            disabled=Signal::derive(move || selected.with(|s| s.is_empty()) || busy.get())
                        >
                            {icon("ban")}
                            {move || format!(" Cancel selected ({})", selected.with(|s| s.len()))}
                        </Button>
                    </Show>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| export(ExportFormat::Csv)
                    >
                        {icon("download")}
                        " CSV"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| export(ExportFormat::Xlsx)
                    >
                        {icon("download")}
                        " Excel"
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

                <div class="stat-grid">
                    {count_card("Total", "calendar", |s| s.total)}
                    {count_card("Pending", "calendar", |s| s.pending)}
                    {count_card("Confirmed", "check", |s| s.confirmed)}
                    {count_card("Checked in", "log-in", |s| s.checked_in)}
                    {count_card("Checked out", "log-out", |s| s.checked_out)}
                    {count_card("Cancelled", "ban", |s| s.cancelled)}
                    <StatCard
                        label="Revenue"
                        icon_name="cash"
                        value=Signal::derive(move || Some(format_currency(stats.with(|s| s.total_revenue))))
                        subtitle=Signal::derive(|| Some("Checked out and paid".to_string()))
                    />
                </div>

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <span class="filter-panel__title">"Filters"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || visible.with(|(page, _)| *page))
                                total_pages=Signal::derive(move || state.with(|s| total_pages(s.all.len(), s.page_size)))
                                total_count=Signal::derive(move || state.with(|s| s.all.len()))
                                page_size=Signal::derive(move || state.with(|s| s.page_size))
                                on_page_change=Callback::new(go_to_page)
                                on_page_size_change=Callback::new(change_page_size)
                            />
                        </div>
                    </div>

                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div class="form__group">
                                <Label>"Status"</Label>
                                <select
                                    prop:value=move || status_input.get()
                                    on:change=move |ev| {
                                        status_input.set(event_target_value(&ev));
                                        apply_status();
                                    }
                                >
                                    <option value="">"All"</option>
                                    {BookingStatus::ALL.iter().map(|status| {
                                        view! { <option value=status.code().to_string()>{status.label().to_string()}</option> }
                                    }).collect_view()}
                                </select>
                            </div>
                            <div class="form__group">
                                <Label>"From"</Label>
                                <input type="date" prop:value=move || start_input.get()
                                    on:input=move |ev| start_input.set(event_target_value(&ev)) />
                            </div>
                            <div class="form__group">
                                <Label>"To"</Label>
                                <input type="date" prop:value=move || end_input.get()
                                    on:input=move |ev| end_input.set(event_target_value(&ev)) />
                            </div>
                            <Button appearance=ButtonAppearance::Secondary on_click=move |_| apply_dates()>
                                "Apply dates"
                            </Button>
                            <div class="form__group" style="max-width: 120px;">
                                <Label>"Customer id"</Label>
                                <Input value=user_input placeholder="e.g. 12" />
                            </div>
                            <Button appearance=ButtonAppearance::Secondary on_click=move |_| apply_user()>
                                "By customer"
                            </Button>
                            <div class="form__group" style="flex: 1; max-width: 280px;">
                                <Label>"Search"</Label>
                                <Input value=search_input placeholder="Guest name or phone..." />
                            </div>
                            <Button appearance=ButtonAppearance::Primary on_click=move |_| apply_search()>
                                {icon("search")}
                                " Search"
                            </Button>
                            <Button appearance=ButtonAppearance::Secondary on_click=move |_| reset_filters()>
                                "Reset"
                            </Button>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <HeaderCheckbox all_checked=all_checked on_change=Callback::new(toggle_all) />
                                <SortHeader label="#" field="id" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=60.0 />
                                <SortHeader label="Guest" field="full_name" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=180.0 />
                                <TableHeaderCell min_width=110.0>"Phone"</TableHeaderCell>
                                <TableHeaderCell min_width=160.0>"Rooms"</TableHeaderCell>
                                <SortHeader label="Check-in" field="check_in_date" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <SortHeader label="Check-out" field="check_out_date" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <SortHeader label="Status" field="status" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <SortHeader label="Total" field="final_price" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=120.0 />
                                <TableHeaderCell min_width=100.0>"Payment"</TableHeaderCell>
                                <TableHeaderCell min_width=220.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || visible.get().1
                                key=|b| (b.id, b.status.code().to_string(), b.payment_status.code().to_string())
                                children=move |booking| {
                                    let id = booking.id;
                                    let actions: Vec<BookingAction> = ROW_ACTIONS
                                        .into_iter()
                                        .filter(|a| a.is_allowed_from(&booking.status))
                                        .collect();
                                    let row = booking.clone();
                                    let full_name = booking.full_name.clone();
                                    let email = booking.email.clone();
                                    let phone = format_phone(&booking.phone);
                                    let rooms = booking.rooms_display();
                                    let check_in = format_naive_date(booking.check_in_date);
                                    let check_out = format!(
                                        "{} ({}n)",
                                        format_naive_date(booking.check_out_date),
                                        booking.nights()
                                    );
                                    let status_label = booking.status.label().to_string();
                                    let status_severity = booking.status.severity();
                                    let total = format_currency(booking.final_price);
                                    let payment_label = booking.payment_status.label().to_string();
                                    let payment_severity = booking.payment_status.severity();
                                    view! {
                                        <TableRow>
                                            <TableCheckbox
                                                checked=Signal::derive(move || selected.with(|s| s.contains(&id)))
                                                on_change=Callback::new(move |checked| toggle_selection(id, checked))
                                            />
                                            <TableCell>
                                                <TableCellLayout>{format!("#{}", id)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <div class="cell-stack">
                                                        <span style="font-weight: 500;">{full_name}</span>
                                                        <span class="cell-stack__secondary">{email}</span>
                                                    </div>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{phone}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{rooms}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{check_in}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {check_out}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <SeverityBadge
                                                    label=status_label
                                                    severity=status_severity
                                                />
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{total}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <SeverityBadge
                                                    label=payment_label
                                                    severity=payment_severity
                                                />
                                            </TableCell>
                                            <TableCell>
                                                <div class="row-actions">
                                                    {actions.into_iter().map(|action| {
                                                        let target = row.clone();
                                                        view! {
                                                            <Show when=move || auth.can(action.required_permission())>
                                                                {
                                                                    let target = target.clone();
                                                                    view! {
                                                                        <Button
                                                                            size=ButtonSize::Small
                                                                            appearance=ButtonAppearance::Subtle
                                                                            disabled=Signal::derive(move || busy.get())
                                                                            on_click=move |_| run_action(target.clone(), action)
                                                                        >
                                                                            {action.label()}
                                                                        </Button>
                                                                    }
                                                                }
                                                            </Show>
                                                        }
                                                    }).collect_view()}
                                                    <Show when=move || auth.can(Permission::Edit)>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click=move |_| dialog.set(ListDialog::Details(Some(id)))
                                                            attr:title="Edit"
                                                        >
                                                            {icon("edit")}
                                                        </Button>
                                                    </Show>
                                                </div>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || state.with(|s| s.is_loaded && s.all.is_empty())>
                        <div class="table__empty">"No bookings match the current filter"</div>
                    </Show>
                </div>

                {move || match dialog.get() {
                    ListDialog::None => None,
                    ListDialog::Details(id) => Some(view! {
                        <BookingDetails id=id on_saved=on_saved on_cancel=close_dialog />
                    }.into_any()),
                    ListDialog::CancelOne(booking) => {
                        let message = format!(
                            "Cancel booking #{} for {}? This cannot be undone.",
                            booking.id, booking.full_name
                        );
                        Some(view! {
                            <ConfirmDialog
                                title="Cancel booking"
                                message=message
                                confirm_label="Cancel booking"
                                busy=busy
                                on_confirm=Callback::new(move |_| cancel_one(booking.clone()))
                                on_cancel=close_dialog
                            />
                        }.into_any())
                    }
                    ListDialog::CancelSelected => {
                        let message = format!(
                            "Cancel {} selected booking(s)? Bookings past check-in or already cancelled are skipped.",
                            selected.with_untracked(|s| s.len())
                        );
                        Some(view! {
                            <ConfirmDialog
                                title="Cancel selected bookings"
                                message=message
                                confirm_label="Cancel all"
                                busy=busy
                                on_confirm=Callback::new(move |_| cancel_selected())
                                on_cancel=close_dialog
                            />
                        }.into_any())
                    }
                }}
            </div>
        </div>
    }
}
