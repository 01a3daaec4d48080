use chrono::NaiveDate;
use contracts::dashboards::d400_statistics::{
    CountInfo, DailyPoint, DailySeries, DateRangeStats, MostBookedRoom, RatingCount,
    RecentBooking, RevenueComparison, StatusBreakdown, StatusCount,
};
use contracts::shared::dates::to_iso;
use contracts::shared::error::ApiError;
use serde::Serialize;

use crate::shared::api_utils::ApiClient;

const API_BASE: &str = "/statistics";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DateRangeQuery {
    start_date: String,
    end_date: String,
}

#[derive(Serialize)]
struct DaysQuery {
    days: u32,
}

#[derive(Serialize)]
struct LimitQuery {
    limit: u32,
}

fn client() -> ApiClient {
    ApiClient::admin()
}

pub async fn get_count_info() -> Result<CountInfo, ApiError> {
    client().get(&format!("{}/count-info", API_BASE)).await
}

/// Totals between two dates, both inclusive.
pub async fn get_date_range(start: NaiveDate, end: NaiveDate) -> Result<DateRangeStats, ApiError> {
    if end < start {
        return Err(ApiError::Validation("End date is before start date".into()));
    }
    let query = DateRangeQuery {
        start_date: to_iso(start),
        end_date: to_iso(end),
    };
    client()
        .get_with(&format!("{}/date-range", API_BASE), &query)
        .await
}

pub async fn get_recent_bookings(days: u32) -> Result<Vec<RecentBooking>, ApiError> {
    client()
        .get_with(&format!("{}/recent-bookings", API_BASE), &DaysQuery { days })
        .await
}

pub async fn get_reviews_by_rating() -> Result<Vec<RatingCount>, ApiError> {
    client().get(&format!("{}/reviews-by-rating", API_BASE)).await
}

pub async fn get_most_booked_rooms(limit: u32) -> Result<Vec<MostBookedRoom>, ApiError> {
    client()
        .get_with(&format!("{}/most-booked-rooms", API_BASE), &LimitQuery { limit })
        .await
}

pub async fn get_revenue_by_day() -> Result<Vec<DailyPoint>, ApiError> {
    let series: DailySeries = client().get(&format!("{}/revenue-by-day", API_BASE)).await?;
    Ok(series.into_points())
}

pub async fn get_bookings_by_day() -> Result<Vec<DailyPoint>, ApiError> {
    let series: DailySeries = client().get(&format!("{}/bookings-by-day", API_BASE)).await?;
    Ok(series.into_points())
}

pub async fn get_revenue_comparison() -> Result<RevenueComparison, ApiError> {
    client().get(&format!("{}/revenue-comparison", API_BASE)).await
}

pub async fn get_booking_status() -> Result<Vec<StatusCount>, ApiError> {
    let breakdown: StatusBreakdown = client().get(&format!("{}/booking-status", API_BASE)).await?;
    Ok(breakdown.into_rows())
}
