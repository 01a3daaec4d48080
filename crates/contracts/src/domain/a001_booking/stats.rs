use serde::{Deserialize, Serialize};

use super::aggregate::{Booking, BookingStatus};

/// Per-status counts and settled revenue of a list of bookings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub checked_in: usize,
    pub checked_out: usize,
    pub cancelled: usize,
    pub total_revenue: f64,
}

impl BookingStats {
    /// Only checked-out, paid bookings count towards revenue.
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        let mut stats = BookingStats {
            total: bookings.len(),
            ..Default::default()
        };
        for booking in bookings {
            match booking.status {
                BookingStatus::Pending => stats.pending += 1,
                BookingStatus::Confirmed => stats.confirmed += 1,
                BookingStatus::CheckedIn => stats.checked_in += 1,
                BookingStatus::CheckedOut => stats.checked_out += 1,
                BookingStatus::Cancelled => stats.cancelled += 1,
                BookingStatus::Unknown(_) => {}
            }
            if booking.counts_as_revenue() {
                stats.total_revenue += booking.revenue_amount();
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: i64, status: &str, payment: &str, final_price: f64) -> Booking {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "checkInDate": "2024-05-01",
            "checkOutDate": "2024-05-03",
            "status": status,
            "paymentStatus": payment,
            "totalPrice": 1_000_000.0,
            "finalPrice": final_price,
            "discountType": "PERCENT",
            "discountValue": 0.2
        }))
        .unwrap()
    }

    #[test]
    fn test_counts_per_status() {
        let bookings = vec![
            booking(1, "PENDING", "UNPAID", 100.0),
            booking(2, "CONFIRMED", "PAID", 100.0),
            booking(3, "CHECKED_IN", "PAID", 100.0),
            booking(4, "CHECKED_OUT", "PAID", 100.0),
            booking(5, "CANCELLED", "REFUNDED", 100.0),
            booking(6, "NO_SHOW", "UNPAID", 100.0),
        ];
        let stats = BookingStats::from_bookings(&bookings);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.confirmed, 1);
        assert_eq!(stats.checked_in, 1);
        assert_eq!(stats.checked_out, 1);
        assert_eq!(stats.cancelled, 1);
    }

    #[test]
    fn test_revenue_only_checked_out_and_paid() {
        let bookings = vec![
            booking(1, "CHECKED_OUT", "PAID", 900_000.0),
            booking(2, "CHECKED_OUT", "UNPAID", 500_000.0),
            booking(3, "CONFIRMED", "PAID", 700_000.0),
            booking(4, "CHECKED_IN", "PAID", 300_000.0),
        ];
        let stats = BookingStats::from_bookings(&bookings);
        assert_eq!(stats.total_revenue, 900_000.0);
    }

    #[test]
    fn test_revenue_recomputes_corrupt_price() {
        let bookings = vec![
            booking(1, "CHECKED_OUT", "PAID", -1.5e15),
            booking(2, "CHECKED_OUT", "PAID", 250_000.0),
        ];
        let stats = BookingStats::from_bookings(&bookings);
        // 1_000_000 * (1 - 0.2) + 250_000
        assert!((stats.total_revenue - 1_050_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty() {
        assert_eq!(BookingStats::from_bookings(&[]), BookingStats::default());
    }
}
