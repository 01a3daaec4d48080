use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::a001_booking::BookingStatus;

/// `GET /statistics/count-info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountInfo {
    pub total_bookings: u64,
    pub total_customers: u64,
    /// Number of reviews
    pub total_rates: u64,
    pub total_revenue: f64,
}

/// `GET /statistics/date-range?startDate&endDate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateRangeStats {
    /// Start date in format "YYYY-MM-DD"
    pub start_date: String,
    /// End date in format "YYYY-MM-DD"
    pub end_date: String,
    pub total_bookings: u64,
    pub total_revenue: f64,
    pub total_customers: u64,
}

/// Row of `GET /statistics/recent-bookings?days=N`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBooking {
    pub id: i64,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub check_in_date: String,
    #[serde(default)]
    pub check_out_date: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub final_price: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Row of `GET /statistics/reviews-by-rating`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingCount {
    pub rating: u8,
    #[serde(default)]
    pub count: u64,
}

/// Row of `GET /statistics/most-booked-rooms?limit=N`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MostBookedRoom {
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub room_type: String,
    #[serde(default, alias = "count")]
    pub booking_count: u64,
    #[serde(default)]
    pub revenue: f64,
}

/// One day of a per-day series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Date in format "YYYY-MM-DD"
    pub date: String,
    #[serde(alias = "revenue", alias = "count", alias = "total")]
    pub value: f64,
}

/// `revenue-by-day` and `bookings-by-day` come back either as a list of
/// points or as a `{date: value}` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DailySeries {
    Points(Vec<DailyPoint>),
    Map(BTreeMap<String, f64>),
}

impl DailySeries {
    /// Points ordered by date.
    pub fn into_points(self) -> Vec<DailyPoint> {
        let mut points = match self {
            DailySeries::Points(points) => points,
            DailySeries::Map(map) => map
                .into_iter()
                .map(|(date, value)| DailyPoint { date, value })
                .collect(),
        };
        points.sort_by(|a, b| a.date.cmp(&b.date));
        points
    }
}

/// `GET /statistics/revenue-comparison`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueComparison {
    pub current_month: f64,
    pub previous_month: f64,
}

impl RevenueComparison {
    /// Month-over-month change in percent; zero without a previous month.
    pub fn change_percent(&self) -> f64 {
        if self.previous_month == 0.0 {
            return 0.0;
        }
        (self.current_month - self.previous_month) / self.previous_month * 100.0
    }
}

/// `GET /statistics/booking-status`, as a list or a `{status: count}` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StatusBreakdown {
    Rows(Vec<StatusCount>),
    Map(BTreeMap<String, u64>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: BookingStatus,
    #[serde(default)]
    pub count: u64,
}

impl StatusBreakdown {
    pub fn into_rows(self) -> Vec<StatusCount> {
        match self {
            StatusBreakdown::Rows(rows) => rows,
            StatusBreakdown::Map(map) => map
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status: BookingStatus::from(status),
                    count,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_info() {
        let info: CountInfo = serde_json::from_str(
            r#"{"totalBookings":28,"totalCustomers":22,"totalRates":8,"totalRevenue":142500000.0}"#,
        )
        .unwrap();
        assert_eq!(info.total_bookings, 28);
        assert_eq!(info.total_revenue, 142_500_000.0);
    }

    #[test]
    fn test_change_percent() {
        let cmp = RevenueComparison {
            current_month: 150.0,
            previous_month: 100.0,
        };
        assert_eq!(cmp.change_percent(), 50.0);
        let first = RevenueComparison {
            current_month: 10.0,
            previous_month: 0.0,
        };
        assert_eq!(first.change_percent(), 0.0);
    }

    #[test]
    fn test_daily_series_shapes() {
        let list: DailySeries =
            serde_json::from_str(r#"[{"date":"2024-03-02","revenue":5},{"date":"2024-03-01","revenue":3}]"#)
                .unwrap();
        let points = list.into_points();
        assert_eq!(points[0].date, "2024-03-01");
        assert_eq!(points[1].value, 5.0);

        let map: DailySeries = serde_json::from_str(r#"{"2024-03-01":2,"2024-03-02":4}"#).unwrap();
        assert_eq!(map.into_points().len(), 2);
    }

    #[test]
    fn test_status_breakdown_shapes() {
        let map: StatusBreakdown = serde_json::from_str(r#"{"PENDING":3,"CANCELLED":1}"#).unwrap();
        let rows = map.into_rows();
        assert!(rows.contains(&StatusCount {
            status: BookingStatus::Pending,
            count: 3
        }));

        let list: StatusBreakdown =
            serde_json::from_str(r#"[{"status":"CONFIRMED","count":4}]"#).unwrap();
        assert_eq!(list.into_rows()[0].status, BookingStatus::Confirmed);
    }
}
