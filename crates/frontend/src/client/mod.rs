//! Public hotel site: room search, room pages, checkout and the customer's
//! own bookings.

pub mod checkout;
pub mod header;
pub mod my_bookings;
pub mod room_detail;
pub mod room_search;

use chrono::{Duration, NaiveDate};
use contracts::domain::a004_room::AvailabilityQuery;
use contracts::shared::dates::parse_iso_date;
use leptos::prelude::*;
use leptos_router::components::Outlet;

use header::SiteHeader;

/// Stay from the `checkInDate`/`checkOutDate`/`guests` query parameters.
/// Missing or inconsistent values fall back to one night from `today`.
pub fn stay_from_query(get: impl Fn(&str) -> Option<String>, today: NaiveDate) -> AvailabilityQuery {
    let check_in = get("checkInDate")
        .and_then(|v| parse_iso_date(&v))
        .filter(|d| *d >= today)
        .unwrap_or(today);
    let check_out = get("checkOutDate")
        .and_then(|v| parse_iso_date(&v))
        .filter(|d| *d > check_in)
        .unwrap_or(check_in + Duration::days(1));
    let guests = get("guests")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|g| *g > 0)
        .unwrap_or(1);
    AvailabilityQuery {
        check_in_date: check_in,
        check_out_date: check_out,
        guests,
    }
}

#[component]
pub fn ClientShell() -> impl IntoView {
    view! {
        <div class="site-layout">
            <SiteHeader />
            <main class="site-main">
                <Outlet />
            </main>
            <footer class="site-footer">
                <span>"Luxury Hotel"</span>
            </footer>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_stay_from_query() {
        let today = d(2024, 3, 1);
        let stay = stay_from_query(
            lookup(&[("checkInDate", "2024-03-05"), ("checkOutDate", "2024-03-08"), ("guests", "2")]),
            today,
        );
        assert_eq!(stay.check_in_date, d(2024, 3, 5));
        assert_eq!(stay.nights(), 3);
        assert_eq!(stay.guests, 2);
    }

    #[test]
    fn test_stay_defaults() {
        let today = d(2024, 3, 1);
        let stay = stay_from_query(lookup(&[("checkOutDate", "2024-02-01"), ("guests", "0")]), today);
        assert_eq!(stay.check_in_date, today);
        assert_eq!(stay.check_out_date, d(2024, 3, 2));
        assert_eq!(stay.guests, 1);

        let past = stay_from_query(lookup(&[("checkInDate", "2023-12-31")]), today);
        assert_eq!(past.check_in_date, today);
    }
}
