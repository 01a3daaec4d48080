use chrono::{NaiveDate, Utc};
use contracts::domain::a001_booking::{Booking, BookingStatus};
use contracts::shared::format::{format_currency, format_naive_date};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::domain::a001_booking::api;
use crate::shared::api_utils::ApiClient;
use crate::shared::components::dialog::ConfirmDialog;
use crate::shared::components::status_badge::SeverityBadge;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireCustomer;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Tab {
    Upcoming,
    Past,
    All,
}

/// Not finished and not yet over.
fn is_upcoming(booking: &Booking, today: NaiveDate) -> bool {
    !booking.status.is_terminal() && booking.check_out_date >= today
}

/// Guests may withdraw a booking until they have checked in.
fn can_cancel(booking: &Booking) -> bool {
    booking.status.can_transition_to(&BookingStatus::Cancelled)
}

fn bookings_for_tab(all: &[Booking], tab: Tab, today: NaiveDate) -> Vec<Booking> {
    let mut list: Vec<Booking> = all
        .iter()
        .filter(|b| match tab {
            Tab::Upcoming => is_upcoming(b, today),
            Tab::Past => !is_upcoming(b, today),
            Tab::All => true,
        })
        .cloned()
        .collect();
    match tab {
        Tab::Upcoming => list.sort_by_key(|b| b.check_in_date),
        _ => list.sort_by(|a, b| b.check_in_date.cmp(&a.check_in_date)),
    }
    list
}

#[component]
pub fn MyBookingsPage() -> impl IntoView {
    view! {
        <RequireCustomer>
            <MyBookings />
        </RequireCustomer>
    }
}

#[component]
fn MyBookings() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let today = Utc::now().date_naive();
    let bookings: RwSignal<Vec<Booking>> = RwSignal::new(Vec::new());
    let tab = RwSignal::new(Tab::Upcoming);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let cancelling = RwSignal::new(None::<Booking>);
    let busy = RwSignal::new(false);

    let load = move || {
        let Some(user_id) = auth.client_session().map(|s| s.id).filter(|id| *id > 0) else {
            set_error.set(Some("Your session has no customer id; sign in again".into()));
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_by_user(ApiClient::client(), user_id).await {
                Ok(list) => {
                    set_error.set(None);
                    bookings.set(list);
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    set_error.set(Some(format!("Could not load your bookings: {}", e)));
                }
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load());

    let confirm_cancel = move |booking: Booking| {
        busy.set(true);
        spawn_local(async move {
            let result = api::cancel(ApiClient::client(), booking.id).await;
            busy.set(false);
            cancelling.set(None);
            match result {
                Ok(()) => {
                    toast.success("Booking cancelled", format!("Booking #{}", booking.id));
                    load();
                }
                Err(e) => {
                    auth.on_api_error(&e);
                    toast.api_error("Cancel failed", &e);
                }
            }
        });
    };

    let visible = Memo::new(move |_| bookings.with(|all| bookings_for_tab(all, tab.get(), today)));

    let tab_button = move |label: &'static str, value: Tab| {
        view! {
            <button
                class=move || if tab.get() == value { "tab tab--active" } else { "tab" }
                on:click=move |_| tab.set(value)
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="my-bookings">
            <h1>"My bookings"</h1>
            <div class="tabs">
                {tab_button("Upcoming", Tab::Upcoming)}
                {tab_button("Past", Tab::Past)}
                {tab_button("All", Tab::All)}
            </div>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <Show when=move || loading.get()>
                <p class="loading">"Loading..."</p>
            </Show>
            <Show
                when=move || loading.get() || visible.with(|v| !v.is_empty())
                fallback=|| view! {
                    <div class="empty-state">
                        <p>"No bookings here yet."</p>
                        <A href="/">"Find a room"</A>
                    </div>
                }
            >
                <For
                    each=move || visible.get()
                    key=|b| (b.id, b.status.code().to_string())
                    children=move |booking| {
                        let for_cancel = booking.clone();
                        let cancellable = can_cancel(&booking);
                        view! {
                            <article class="booking-card">
                                <header class="booking-card__header">
                                    <strong>{format!("Booking #{}", booking.id)}</strong>
                                    <SeverityBadge label=booking.status.label().to_string() severity=booking.status.severity() />
                                    <SeverityBadge label=booking.payment_status.label().to_string() severity=booking.payment_status.severity() />
                                </header>
                                <div class="booking-card__body">
                                    <div>{booking.rooms_display()}</div>
                                    <div>
                                        {format!(
                                            "{} - {} ({} night(s))",
                                            format_naive_date(booking.check_in_date),
                                            format_naive_date(booking.check_out_date),
                                            booking.nights()
                                        )}
                                    </div>
                                    {booking.discount_code.clone().map(|code| view! {
                                        <div class="booking-card__discount">{format!("Discount: {}", code)}</div>
                                    })}
                                    <div class="booking-card__price">{format_currency(booking.final_price)}</div>
                                </div>
                                <Show when=move || cancellable>
                                    <button
                                        class="btn btn-danger"
                                        on:click={
                                            let booking = for_cancel.clone();
                                            move |_| cancelling.set(Some(booking.clone()))
                                        }
                                    >
                                        "Cancel booking"
                                    </button>
                                </Show>
                            </article>
                        }
                    }
                />
            </Show>

            {move || cancelling.get().map(|booking| {
                let message = format!(
                    "Cancel booking #{} for {} - {}?",
                    booking.id,
                    format_naive_date(booking.check_in_date),
                    format_naive_date(booking.check_out_date)
                );
                view! {
                    <ConfirmDialog
                        title="Cancel booking"
                        message=message
                        confirm_label="Cancel booking"
                        busy=busy
                        on_confirm=Callback::new(move |_| confirm_cancel(booking.clone()))
                        on_cancel=Callback::new(move |_| cancelling.set(None))
                    />
                }
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_booking::PaymentStatus;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn booking(id: i64, status: BookingStatus, check_in: u32, check_out: u32) -> Booking {
        Booking {
            id,
            user_id: Some(1),
            full_name: "Guest".into(),
            email: "guest@example.com".into(),
            phone: "0901234567".into(),
            check_in_date: d(check_in),
            check_out_date: d(check_out),
            status,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            total_price: 100.0,
            final_price: 100.0,
            discount_code: None,
            discount_type: None,
            discount_value: None,
            rooms: Vec::new(),
            special_requests: None,
            created_at: None,
        }
    }

    #[test]
    fn test_tabs_split_bookings() {
        let today = d(10);
        let all = vec![
            booking(1, BookingStatus::Confirmed, 12, 14),
            booking(2, BookingStatus::CheckedOut, 1, 3),
            booking(3, BookingStatus::Pending, 11, 12),
            booking(4, BookingStatus::Cancelled, 20, 22),
        ];
        let upcoming = bookings_for_tab(&all, Tab::Upcoming, today);
        assert_eq!(upcoming.iter().map(|b| b.id).collect::<Vec<_>>(), vec![3, 1]);
        let past = bookings_for_tab(&all, Tab::Past, today);
        assert_eq!(past.iter().map(|b| b.id).collect::<Vec<_>>(), vec![4, 2]);
        assert_eq!(bookings_for_tab(&all, Tab::All, today).len(), 4);
    }

    #[test]
    fn test_can_cancel_until_check_in() {
        assert!(can_cancel(&booking(1, BookingStatus::Pending, 12, 14)));
        assert!(can_cancel(&booking(1, BookingStatus::Confirmed, 12, 14)));
        assert!(!can_cancel(&booking(1, BookingStatus::CheckedIn, 12, 14)));
        assert!(!can_cancel(&booking(1, BookingStatus::Cancelled, 12, 14)));
    }
}
