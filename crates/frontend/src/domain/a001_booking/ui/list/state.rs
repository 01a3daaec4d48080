use contracts::domain::a001_booking::{Booking, BookingDateRange, BookingSearch, BookingStatus};
use leptos::prelude::*;

use crate::shared::api_utils::config;

/// Which server query fills the list.
#[derive(Clone, Debug, PartialEq)]
pub enum BookingFilter {
    All,
    Status(BookingStatus),
    DateRange(BookingDateRange),
    User(i64),
    Search(BookingSearch),
}

impl BookingFilter {
    pub fn describe(&self) -> String {
        match self {
            BookingFilter::All => "All bookings".to_string(),
            BookingFilter::Status(status) => format!("Status: {}", status.label()),
            BookingFilter::DateRange(range) => format!(
                "From {} to {}",
                range.start_date.format("%d/%m/%Y"),
                range.end_date.format("%d/%m/%Y")
            ),
            BookingFilter::User(id) => format!("Customer #{}", id),
            BookingFilter::Search(BookingSearch::CustomerName(name)) => {
                format!("Name contains \"{}\"", name)
            }
            BookingFilter::Search(BookingSearch::Phone(phone)) => format!("Phone {}", phone),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BookingsListState {
    /// Everything the current filter returned
    pub all: Vec<Booking>,
    pub filter: BookingFilter,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
    pub is_loaded: bool,
}

impl Default for BookingsListState {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            filter: BookingFilter::All,
            sort_field: "created_at".to_string(),
            sort_ascending: false,
            page: 0,
            page_size: config().ui.page_size,
            is_loaded: false,
        }
    }
}

pub fn create_state() -> RwSignal<BookingsListState> {
    RwSignal::new(BookingsListState::default())
}
