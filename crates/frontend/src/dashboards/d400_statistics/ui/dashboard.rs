use chrono::{Datelike, Utc};
use contracts::dashboards::d400_statistics::{
    CountInfo, DailyPoint, DateRangeStats, MostBookedRoom, RatingCount, RecentBooking,
    RevenueComparison, StatusCount,
};
use contracts::shared::dates::{parse_iso_date, to_iso};
use contracts::shared::error::ApiError;
use contracts::shared::format::{format_currency, format_date, format_thousands};
use contracts::shared::severity::Severity;
use contracts::system::access::Page;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d400_statistics::api;
use crate::shared::components::stat_card::StatCard;
use crate::shared::components::status_badge::SeverityBadge;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireStaff;

const RECENT_DAYS: u32 = 7;
const TOP_ROOMS: u32 = 5;
/// Days shown in the per-day charts
const CHART_DAYS: usize = 14;

/// Bar length in percent of the largest value.
pub fn bar_percent(value: f64, max: f64) -> f64 {
    if max <= 0.0 || value <= 0.0 {
        0.0
    } else {
        (value / max * 100.0).min(100.0)
    }
}

/// The most recent `n` points of a date-ordered series.
pub fn last_points(points: &[DailyPoint], n: usize) -> Vec<DailyPoint> {
    points[points.len().saturating_sub(n)..].to_vec()
}

fn series_max(points: &[DailyPoint]) -> f64 {
    points.iter().map(|p| p.value).fold(0.0, f64::max)
}

#[component]
pub fn StatisticsDashboard() -> impl IntoView {
    view! {
        <RequireStaff page=Page::Dashboard>
            <Dashboard />
        </RequireStaff>
    }
}

#[component]
fn Dashboard() -> impl IntoView {
    let auth = use_auth();
    let count_info = RwSignal::new(None::<CountInfo>);
    let comparison = RwSignal::new(None::<RevenueComparison>);
    let statuses = RwSignal::new(Vec::<StatusCount>::new());
    let top_rooms = RwSignal::new(Vec::<MostBookedRoom>::new());
    let recent = RwSignal::new(Vec::<RecentBooking>::new());
    let ratings = RwSignal::new(Vec::<RatingCount>::new());
    let revenue_by_day = RwSignal::new(Vec::<DailyPoint>::new());
    let bookings_by_day = RwSignal::new(Vec::<DailyPoint>::new());
    let (error, set_error) = signal(None::<String>);
    let (loading, set_loading) = signal(false);

    let today = Utc::now().date_naive();
    let month_start = today.with_day(1).unwrap_or(today);
    let range_start = RwSignal::new(to_iso(month_start));
    let range_end = RwSignal::new(to_iso(today));
    let range_stats = RwSignal::new(None::<DateRangeStats>);
    let (range_error, set_range_error) = signal(None::<String>);

    // Each section loads on its own; one failing endpoint leaves the rest usable.
    let load_all = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let (info, cmp, status, rooms, latest, by_rating, revenue, bookings) = futures_util::join!(
                api::get_count_info(),
                api::get_revenue_comparison(),
                api::get_booking_status(),
                api::get_most_booked_rooms(TOP_ROOMS),
                api::get_recent_bookings(RECENT_DAYS),
                api::get_reviews_by_rating(),
                api::get_revenue_by_day(),
                api::get_bookings_by_day(),
            );

            let mut failures = Vec::new();
            let mut note = |section: &str, err: &ApiError| {
                auth.on_api_error(err);
                log::error!("dashboard section {} failed: {}", section, err);
                failures.push(section.to_string());
            };

            match info {
                Ok(v) => count_info.set(Some(v)),
                Err(e) => note("totals", &e),
            }
            match cmp {
                Ok(v) => comparison.set(Some(v)),
                Err(e) => note("revenue comparison", &e),
            }
            match status {
                Ok(v) => statuses.set(v),
                Err(e) => note("booking status", &e),
            }
            match rooms {
                Ok(v) => top_rooms.set(v),
                Err(e) => note("most booked rooms", &e),
            }
            match latest {
                Ok(v) => recent.set(v),
                Err(e) => note("recent bookings", &e),
            }
            match by_rating {
                Ok(v) => ratings.set(v),
                Err(e) => note("ratings", &e),
            }
            match revenue {
                Ok(v) => revenue_by_day.set(last_points(&v, CHART_DAYS)),
                Err(e) => note("revenue by day", &e),
            }
            match bookings {
                Ok(v) => bookings_by_day.set(last_points(&v, CHART_DAYS)),
                Err(e) => note("bookings by day", &e),
            }

            if !failures.is_empty() {
                set_error.set(Some(format!("Could not load: {}", failures.join(", "))));
            }
            set_loading.set(false);
        });
    };

    let load_range = move || {
        let (Some(start), Some(end)) = (
            parse_iso_date(&range_start.get_untracked()),
            parse_iso_date(&range_end.get_untracked()),
        ) else {
            set_range_error.set(Some("Pick both dates".into()));
            return;
        };
        set_range_error.set(None);
        spawn_local(async move {
            match api::get_date_range(start, end).await {
                Ok(stats) => range_stats.set(Some(stats)),
                Err(e) => {
                    auth.on_api_error(&e);
                    set_range_error.set(Some(e.to_string()));
                }
            }
        });
    };

    Effect::new(move |_| {
        load_all();
        load_range();
    });

    let total = move |f: fn(&CountInfo) -> String| Signal::derive(move || count_info.with(|c| c.as_ref().map(f)));

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Dashboard"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_all()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Loading..." } else { " Refresh" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--warning">{e}</div> })}

                <div class="stat-grid">
                    <StatCard
                        label="Bookings"
                        icon_name="calendar"
                        value=total(|c| format_thousands(c.total_bookings as f64))
                    />
                    <StatCard
                        label="Customers"
                        icon_name="users"
                        value=total(|c| format_thousands(c.total_customers as f64))
                    />
                    <StatCard
                        label="Reviews"
                        icon_name="star"
                        value=total(|c| format_thousands(c.total_rates as f64))
                    />
                    <StatCard
                        label="Total revenue"
                        icon_name="cash"
                        severity=Severity::Success
                        value=total(|c| format_currency(c.total_revenue))
                    />
                    <StatCard
                        label="Revenue this month"
                        icon_name="trending-up"
                        value=Signal::derive(move || comparison.with(|c| c.as_ref().map(|c| format_currency(c.current_month))))
                        change_percent=Signal::derive(move || comparison.with(|c| c.as_ref().map(|c| c.change_percent())))
                        subtitle=Signal::derive(move || comparison.with(|c| c.as_ref().map(|c| {
                            format!("Last month: {}", format_currency(c.previous_month))
                        })))
                    />
                </div>

                <div class="dashboard-grid">
                    <section class="dashboard-card">
                        <h2 class="section__title">"Period totals"</h2>
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <input type="date" prop:value=move || range_start.get() on:change=move |ev| range_start.set(event_target_value(&ev)) />
                            <input type="date" prop:value=move || range_end.get() on:change=move |ev| range_end.set(event_target_value(&ev)) />
                            <Button size=ButtonSize::Small on_click=move |_| load_range()>"Apply"</Button>
                        </Flex>
                        {move || range_error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                        {move || range_stats.get().map(|s| view! {
                            <dl class="kv-list">
                                <dt>"Period"</dt>
                                <dd>{format!("{} - {}", format_date(&s.start_date), format_date(&s.end_date))}</dd>
                                <dt>"Bookings"</dt>
                                <dd>{s.total_bookings}</dd>
                                <dt>"Customers"</dt>
                                <dd>{s.total_customers}</dd>
                                <dt>"Revenue"</dt>
                                <dd>{format_currency(s.total_revenue)}</dd>
                            </dl>
                        })}
                    </section>

                    <section class="dashboard-card">
                        <h2 class="section__title">"Bookings by status"</h2>
                        {move || {
                            let rows = statuses.get();
                            let max = rows.iter().map(|r| r.count).max().unwrap_or(0) as f64;
                            rows.into_iter().map(|row| {
                                let width = bar_percent(row.count as f64, max);
                                view! {
                                    <div class="bar-row">
                                        <SeverityBadge label=row.status.label().to_string() severity=row.status.severity() />
                                        <div class="bar-row__track">
                                            <div class="bar-row__fill" style=format!("width: {:.0}%", width)></div>
                                        </div>
                                        <span class="bar-row__value">{row.count}</span>
                                    </div>
                                }
                            }).collect_view()
                        }}
                    </section>

                    <section class="dashboard-card">
                        <h2 class="section__title">"Reviews by rating"</h2>
                        {move || {
                            let mut rows = ratings.get();
                            rows.sort_by(|a, b| b.rating.cmp(&a.rating));
                            let max = rows.iter().map(|r| r.count).max().unwrap_or(0) as f64;
                            rows.into_iter().map(|row| view! {
                                <div class="bar-row">
                                    <span class="bar-row__label">{"\u{2605}".repeat(row.rating as usize)}</span>
                                    <div class="bar-row__track">
                                        <div class="bar-row__fill" style=format!("width: {:.0}%", bar_percent(row.count as f64, max))></div>
                                    </div>
                                    <span class="bar-row__value">{row.count}</span>
                                </div>
                            }).collect_view()
                        }}
                    </section>

                    <DailyChart title="Revenue by day" points=revenue_by_day money=true />
                    <DailyChart title="Bookings by day" points=bookings_by_day money=false />

                    <section class="dashboard-card">
                        <h2 class="section__title">{format!("Most booked rooms (top {})", TOP_ROOMS)}</h2>
                        <Table>
                            <TableHeader>
                                <TableRow>
                                    <TableHeaderCell>"Room"</TableHeaderCell>
                                    <TableHeaderCell>"Type"</TableHeaderCell>
                                    <TableHeaderCell>"Bookings"</TableHeaderCell>
                                    <TableHeaderCell>"Revenue"</TableHeaderCell>
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                <For
                                    each=move || top_rooms.get()
                                    key=|r| (r.room_number.clone(), r.booking_count)
                                    children=|room| view! {
                                        <TableRow>
                                            <TableCell>{room.room_number.clone()}</TableCell>
                                            <TableCell>{room.room_type.clone()}</TableCell>
                                            <TableCell>{room.booking_count}</TableCell>
                                            <TableCell>{format_currency(room.revenue)}</TableCell>
                                        </TableRow>
                                    }
                                />
                            </TableBody>
                        </Table>
                    </section>
                </div>

                <section class="dashboard-card">
                    <h2 class="section__title">{format!("Bookings of the last {} days", RECENT_DAYS)}</h2>
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"#"</TableHeaderCell>
                                <TableHeaderCell>"Guest"</TableHeaderCell>
                                <TableHeaderCell>"Stay"</TableHeaderCell>
                                <TableHeaderCell>"Status"</TableHeaderCell>
                                <TableHeaderCell>"Total"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || recent.get()
                                key=|b| b.id
                                children=|booking| view! {
                                    <TableRow>
                                        <TableCell>{booking.id}</TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{booking.full_name.clone()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            {format!(
                                                "{} - {}",
                                                format_date(&booking.check_in_date),
                                                format_date(&booking.check_out_date)
                                            )}
                                        </TableCell>
                                        <TableCell>
                                            <SeverityBadge label=booking.status.label().to_string() severity=booking.status.severity() />
                                        </TableCell>
                                        <TableCell>{format_currency(booking.final_price)}</TableCell>
                                    </TableRow>
                                }
                            />
                        </TableBody>
                    </Table>
                </section>
            </div>
        </div>
    }
}

#[component]
fn DailyChart(
    title: &'static str,
    #[prop(into)] points: Signal<Vec<DailyPoint>>,
    money: bool,
) -> impl IntoView {
    let label = move |value: f64| {
        if money {
            format_currency(value)
        } else {
            format_thousands(value)
        }
    };

    view! {
        <section class="dashboard-card">
            <h2 class="section__title">{title}</h2>
            <div class="column-chart">
                {move || {
                    let data = points.get();
                    if data.is_empty() {
                        return view! { <p class="empty-state">"No data"</p> }.into_any();
                    }
                    let max = series_max(&data);
                    data.into_iter().map(|point| {
                        let height = bar_percent(point.value, max);
                        let day = parse_iso_date(&point.date)
                            .map(|d| d.format("%d/%m").to_string())
                            .unwrap_or_else(|| point.date.clone());
                        view! {
                            <div class="column-chart__item" title=label(point.value)>
                                <div class="column-chart__bar" style=format!("height: {:.0}%", height)></div>
                                <span class="column-chart__label">{day}</span>
                            </div>
                        }
                    }).collect_view().into_any()
                }}
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, value: f64) -> DailyPoint {
        DailyPoint {
            date: date.to_string(),
            value,
        }
    }

    #[test]
    fn test_bar_percent() {
        assert_eq!(bar_percent(5.0, 10.0), 50.0);
        assert_eq!(bar_percent(3.0, 0.0), 0.0);
        assert_eq!(bar_percent(-1.0, 10.0), 0.0);
        assert_eq!(bar_percent(12.0, 10.0), 100.0);
    }

    #[test]
    fn test_last_points() {
        let series = vec![point("2024-03-01", 1.0), point("2024-03-02", 2.0), point("2024-03-03", 3.0)];
        let tail = last_points(&series, 2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].date, "2024-03-02");
        assert_eq!(last_points(&series, 10).len(), 3);
    }

    #[test]
    fn test_series_max() {
        assert_eq!(series_max(&[]), 0.0);
        assert_eq!(series_max(&[point("a", 2.0), point("b", 7.5)]), 7.5);
    }
}
