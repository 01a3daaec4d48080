use std::collections::HashSet;

use contracts::domain::a003_review::{rating_severity, Review, ReviewStatistics, ReviewSummary};
use contracts::shared::format::{format_date, truncate_text};
use contracts::system::access::{Page, Permission};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::{ReplyDialog, ReviewDetails};
use crate::domain::a003_review::api;
use crate::shared::api_utils::config;
use crate::shared::components::dialog::ConfirmDialog;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::sort_header::{next_sort, SortHeader};
use crate::shared::components::stat_card::StatCard;
use crate::shared::components::status_badge::SeverityBadge;
use crate::shared::components::table_checkbox::{HeaderCheckbox, TableCheckbox};
use crate::shared::icons::icon;
use crate::shared::list_utils::{filter_list, page_slice, sort_list, total_pages};
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireStaff;

#[derive(Clone, Debug, PartialEq)]
enum ListDialog {
    None,
    Edit(Option<Review>),
    Reply(Review),
    Delete(Review),
    DeleteSelected,
}

#[component]
pub fn ReviewsListPage() -> impl IntoView {
    view! {
        <RequireStaff page=Page::Reviews>
            <ReviewsList />
        </RequireStaff>
    }
}

#[component]
fn ReviewsList() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let all: RwSignal<Vec<Review>> = RwSignal::new(Vec::new());
    let statistics: RwSignal<Option<ReviewStatistics>> = RwSignal::new(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let is_loaded = RwSignal::new(false);
    let busy = RwSignal::new(false);
    let dialog = RwSignal::new(ListDialog::None);
    let selected: RwSignal<HashSet<i64>> = RwSignal::new(HashSet::new());
    let search = RwSignal::new(String::new());
    let sort_field = RwSignal::new("created_at".to_string());
    let sort_ascending = RwSignal::new(false);
    let page = RwSignal::new(0usize);
    let page_size = RwSignal::new(config().ui.page_size);

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_all().await {
                Ok(reviews) => {
                    all.set(reviews);
                    selected.set(HashSet::new());
                    is_loaded.set(true);
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    set_error.set(Some(format!("Failed to load reviews: {}", e)));
                }
            }
            set_loading.set(false);
            // The average card falls back to the local summary without it.
            match api::fetch_statistics().await {
                Ok(stats) => statistics.set(Some(stats)),
                Err(e) => log::warn!("review statistics unavailable: {}", e),
            }
        });
    };

    Effect::new(move |_| {
        if !is_loaded.get_untracked() {
            load_data();
        }
    });

    let filtered = Memo::new(move |_| {
        let needle = search.get();
        let mut rows = all.with(|reviews| filter_list(reviews, &needle));
        sort_list(&mut rows, &sort_field.get(), sort_ascending.get());
        rows
    });
    let visible = Memo::new(move |_| filtered.with(|rows| page_slice(rows, page.get(), page_size.get())));
    let summary = Memo::new(move |_| all.with(|reviews| ReviewSummary::from_reviews(reviews)));

    Effect::new(move |_| {
        search.track();
        page.set(0);
    });

    let on_sort = Callback::new(move |field: &'static str| {
        let (next_field, ascending) = next_sort(&sort_field.get_untracked(), sort_ascending.get_untracked(), field);
        sort_field.set(next_field);
        sort_ascending.set(ascending);
    });

    let all_checked = Signal::derive(move || {
        visible.with(|(_, rows)| !rows.is_empty() && selected.with(|s| rows.iter().all(|r| s.contains(&r.id))))
    });
    let toggle_all = move |check: bool| {
        let ids: Vec<i64> = visible.with_untracked(|(_, rows)| rows.iter().map(|r| r.id).collect());
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

    let delete_one = move |review: Review| {
        busy.set(true);
        spawn_local(async move {
            let result = api::delete(review.id).await;
            busy.set(false);
            dialog.set(ListDialog::None);
            match result {
                Ok(()) => {
                    toast.success("Review deleted", format!("Review #{}", review.id));
                    load_data();
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    toast.api_error("Delete failed", &e);
                }
            }
        });
    };

    let delete_selected = move || {
        let ids: Vec<i64> = selected.get_untracked().into_iter().collect();
        busy.set(true);
        spawn_local(async move {
            let outcome = api::delete_many(ids).await;
            busy.set(false);
            dialog.set(ListDialog::None);
            let detail = format!("{} deleted, {} failed", outcome.succeeded, outcome.failed);
            if outcome.failed == 0 {
                toast.success("Reviews deleted", detail);
            } else {
                toast.warn("Some reviews were not deleted", detail);
            }
            load_data();
        });
    };

    let close_dialog = Callback::new(move |_| dialog.set(ListDialog::None));
    let on_saved = Callback::new(move |message: String| {
        dialog.set(ListDialog::None);
        toast.success("Saved", message);
        load_data();
    });

    let average = Signal::derive(move || {
        let server = statistics.with(|s| s.as_ref().map(|s| s.average_rating).filter(|a| *a > 0.0));
        let local = summary.with(|s| s.average_rating);
        server.unwrap_or(local)
    });

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Reviews"</h1>
                    <Badge>{move || filtered.with(|rows| rows.len()).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || auth.can(Permission::Create)>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| dialog.set(ListDialog::Edit(None))
                        >
                            {icon("plus")}
                            " New"
                        </Button>
                    </Show>
                    <Show when=move || auth.can(Permission::Delete)>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| dialog.set(ListDialog::DeleteSelected)
                            disabled=Signal::derive(move || selected.with(|s| s.is_empty()) || busy.get())
                        >
                            {icon("trash")}
                            {move || format!(" Delete selected ({})", selected.with(|s| s.len()))}
                        </Button>
                    </Show>
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
                    <StatCard
                        label="Reviews"
                        icon_name="star"
                        value=Signal::derive(move || Some(summary.with(|s| s.count).to_string()))
                    />
                    <StatCard
                        label="Average rating"
                        icon_name="star"
                        value=Signal::derive(move || Some(format!("{:.1} / 5", average.get())))
                    />
                    <StatCard
                        label="Replied"
                        icon_name="reply"
                        value=Signal::derive(move || Some(summary.with(|s| s.replied).to_string()))
                    />
                    <StatCard
                        label="Awaiting reply"
                        icon_name="calendar"
                        value=Signal::derive(move || Some(summary.with(|s| s.pending).to_string()))
                    />
                    <StatCard
                        label="Hidden"
                        icon_name="eye"
                        value=Signal::derive(move || Some(summary.with(|s| s.hidden).to_string()))
                    />
                </div>

                <div class="rating-bars">
                    {(1..=5usize).rev().map(|star| view! {
                        <div class="rating-bars__row">
                            <span class="rating-bars__label">{format!("{} \u{2605}", star)}</span>
                            <div class="usage-bar">
                                <div
                                    class="usage-bar__fill"
                                    style=move || format!("width: {:.0}%;", summary.with(|s| s.star_share(star)))
                                ></div>
                            </div>
                            <span class="rating-bars__count">{move || summary.with(|s| s.stars[star - 1])}</span>
                        </div>
                    }).collect_view()}
                </div>

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <span class="filter-panel__title">"Filter"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || visible.with(|(p, _)| *p))
                                total_pages=Signal::derive(move || filtered.with(|rows| total_pages(rows.len(), page_size.get())))
                                total_count=Signal::derive(move || filtered.with(|rows| rows.len()))
                                page_size=page_size
                                on_page_change=Callback::new(move |p| page.set(p))
                                on_page_size_change=Callback::new(move |size| {
                                    page_size.set(size);
                                    page.set(0);
                                })
                            />
                        </div>
                    </div>
                    <div class="filter-panel-content">
                        <div style="max-width: 360px;">
                            <Input value=search placeholder="Guest, room, booking or comment..." />
                        </div>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <HeaderCheckbox all_checked=all_checked on_change=Callback::new(toggle_all) />
                                <SortHeader label="Guest" field="guest_name" sort_field=sort_field ascending=sort_ascending on_sort=on_sort min_width=160.0 />
                                <TableHeaderCell min_width=120.0>"Room"</TableHeaderCell>
                                <SortHeader label="Rating" field="rating" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <TableHeaderCell min_width=260.0>"Comment"</TableHeaderCell>
                                <SortHeader label="Status" field="status" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <SortHeader label="Date" field="created_at" sort_field=sort_field ascending=sort_ascending on_sort=on_sort />
                                <TableHeaderCell min_width=130.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || visible.get().1
                                key=|r| (r.id, r.status.code().to_string(), r.reply_comment.clone())
                                children=move |review| {
                                    let id = review.id;
                                    let for_edit = review.clone();
                                    let for_reply = review.clone();
                                    let for_delete = review.clone();
                                    let room = if review.room_number.is_empty() {
                                        "-".to_string()
                                    } else {
                                        format!("{} ({})", review.room_number, review.room_type)
                                    };
                                    let guest = review.guest_display_name();
                                    let booking_ref = review.booking_id.map(|b| format!("Booking #{}", b)).unwrap_or_default();
                                    let rating = review.rating;
                                    let comment = review.comment.clone();
                                    let comment_short = truncate_text(&review.comment, 80);
                                    let reply = review.has_reply().then(|| review.reply_comment.clone().unwrap_or_default());
                                    let status_label = review.status.label().to_string();
                                    let status_severity = review.status.severity();
                                    let created = review.created_at.as_deref().map(format_date).unwrap_or_default();
                                    view! {
                                        <TableRow>
                                            <TableCheckbox
                                                checked=Signal::derive(move || selected.with(|s| s.contains(&id)))
                                                on_change=Callback::new(move |checked| selected.update(|s| {
                                                    if checked {
                                                        s.insert(id);
                                                    } else {
                                                        s.remove(&id);
                                                    }
                                                }))
                                            />
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <div class="cell-stack">
                                                        <span style="font-weight: 500;">{guest}</span>
                                                        <span class="cell-stack__secondary">
                                                            {booking_ref}
                                                        </span>
                                                    </div>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{room}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <SeverityBadge
                                                    label=format!("{:.1} \u{2605}", rating)
                                                    severity=rating_severity(rating)
                                                />
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span title=comment>{comment_short}</span>
                                                    {reply.map(|reply| view! {
                                                        <span class="review-replied" title=reply>
                                                            {icon("reply")}
                                                        </span>
                                                    })}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <SeverityBadge label=status_label severity=status_severity />
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {created}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <div class="row-actions">
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| dialog.set(ListDialog::Reply(for_reply.clone()))
                                                        attr:title="Reply"
                                                    >
                                                        {icon("reply")}
                                                    </Button>
                                                    <Show when=move || auth.can(Permission::Edit)>
                                                        {
                                                            let for_edit = for_edit.clone();
                                                            view! {
                                                                <Button
                                                                    size=ButtonSize::Small
                                                                    appearance=ButtonAppearance::Subtle
                                                                    on_click=move |_| dialog.set(ListDialog::Edit(Some(for_edit.clone())))
                                                                    attr:title="Edit"
                                                                >
                                                                    {icon("edit")}
                                                                </Button>
                                                            }
                                                        }
                                                    </Show>
                                                    <Show when=move || auth.can(Permission::Delete)>
                                                        {
                                                            let for_delete = for_delete.clone();
                                                            view! {
                                                                <Button
                                                                    size=ButtonSize::Small
                                                                    appearance=ButtonAppearance::Subtle
                                                                    on_click=move |_| dialog.set(ListDialog::Delete(for_delete.clone()))
                                                                    attr:title="Delete"
                                                                >
                                                                    {icon("trash")}
                                                                </Button>
                                                            }
                                                        }
                                                    </Show>
                                                </div>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || is_loaded.get() && filtered.with(|rows| rows.is_empty())>
                        <div class="table__empty">"No reviews"</div>
                    </Show>
                </div>

                {move || match dialog.get() {
                    ListDialog::None => None,
                    ListDialog::Edit(review) => Some(view! {
                        <ReviewDetails review=review on_saved=on_saved on_cancel=close_dialog />
                    }.into_any()),
                    ListDialog::Reply(review) => Some(view! {
                        <ReplyDialog review=review on_saved=on_saved on_cancel=close_dialog />
                    }.into_any()),
                    ListDialog::Delete(review) => {
                        let message = format!("Delete the review by {}?", review.guest_display_name());
                        Some(view! {
                            <ConfirmDialog
                                title="Delete review"
                                message=message
                                confirm_label="Delete"
                                busy=busy
                                on_confirm=Callback::new(move |_| delete_one(review.clone()))
                                on_cancel=close_dialog
                            />
                        }.into_any())
                    }
                    ListDialog::DeleteSelected => {
                        let message = format!(
                            "Delete {} selected review(s)?",
                            selected.with_untracked(|s| s.len())
                        );
                        Some(view! {
                            <ConfirmDialog
                                title="Delete reviews"
                                message=message
                                confirm_label="Delete all"
                                busy=busy
                                on_confirm=Callback::new(move |_| delete_selected())
                                on_cancel=close_dialog
                            />
                        }.into_any())
                    }
                }}
            </div>
        </div>
    }
}
