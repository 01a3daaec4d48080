use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::dates::iso_date;
use crate::shared::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub room_type: String,
    #[serde(default)]
    pub room_type_id: Option<i64>,
    #[serde(default)]
    pub price_per_night: f64,
    #[serde(default)]
    pub max_occupancy: u32,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
}

impl Room {
    /// Name for listings, falling back to the room number.
    pub fn title(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Room {}", self.room_number)
        } else {
            self.name.clone()
        }
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Case-insensitive substring match of any room amenity.
    pub fn has_amenity(&self, wanted: &str) -> bool {
        let wanted = wanted.to_lowercase();
        self.amenities
            .iter()
            .any(|amenity| amenity.to_lowercase().contains(&wanted))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub max_occupancy: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Rooms whose nightly price lies in `min..=max`.
pub fn filter_by_price(rooms: &[Room], min: f64, max: f64) -> Vec<Room> {
    rooms
        .iter()
        .filter(|room| room.price_per_night >= min && room.price_per_night <= max)
        .cloned()
        .collect()
}

/// Rooms offering every wanted amenity. No wanted amenities keeps all rooms.
pub fn filter_by_amenities(rooms: &[Room], wanted: &[String]) -> Vec<Room> {
    if wanted.is_empty() {
        return rooms.to_vec();
    }
    rooms
        .iter()
        .filter(|room| wanted.iter().all(|amenity| room.has_amenity(amenity)))
        .cloned()
        .collect()
}

/// Distinct amenities across `rooms`, sorted, for filter checkboxes.
pub fn collect_amenities(rooms: &[Room]) -> Vec<String> {
    let mut all: Vec<String> = rooms.iter().flat_map(|r| r.amenities.iter().cloned()).collect();
    all.sort();
    all.dedup();
    all
}

/// Whole nights between the dates; zero unless check-out is after check-in.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(0)
}

pub fn total_price(room: &Room, check_in: NaiveDate, check_out: NaiveDate) -> f64 {
    room.price_per_night * nights(check_in, check_out) as f64
}

/// `GET /rooms/available` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    #[serde(with = "iso_date")]
    pub check_in_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub check_out_date: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: u32,
}

fn default_guests() -> u32 {
    1
}

impl AvailabilityQuery {
    pub fn new(check_in_date: NaiveDate, check_out_date: NaiveDate) -> Self {
        Self {
            check_in_date,
            check_out_date,
            guests: default_guests(),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.check_out_date <= self.check_in_date {
            return Err(ApiError::Validation(
                "Check-out must be after check-in".into(),
            ));
        }
        if self.guests == 0 {
            return Err(ApiError::Validation("At least one guest is required".into()));
        }
        Ok(())
    }

    pub fn nights(&self) -> i64 {
        nights(self.check_in_date, self.check_out_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn room(id: i64, price: f64, amenities: &[&str]) -> Room {
        Room {
            id,
            room_number: format!("{}", 100 + id),
            name: String::new(),
            description: String::new(),
            room_type: "DELUXE".into(),
            room_type_id: Some(1),
            price_per_night: price,
            max_occupancy: 2,
            area: None,
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            images: Vec::new(),
            status: None,
            rating: None,
            review_count: 0,
        }
    }

    #[test]
    fn test_filter_by_price_inclusive() {
        let rooms = vec![room(1, 500_000.0, &[]), room(2, 1_000_000.0, &[]), room(3, 2_000_000.0, &[])];
        let ids: Vec<i64> = filter_by_price(&rooms, 500_000.0, 1_000_000.0)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_filter_by_amenities() {
        let rooms = vec![
            room(1, 1.0, &["Free WiFi", "Air conditioning"]),
            room(2, 1.0, &["WiFi"]),
            room(3, 1.0, &[]),
        ];
        assert_eq!(filter_by_amenities(&rooms, &[]).len(), 3);

        let wifi = filter_by_amenities(&rooms, &["wifi".to_string()]);
        assert_eq!(wifi.len(), 2);

        let both = filter_by_amenities(&rooms, &["wifi".to_string(), "AIR".to_string()]);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, 1);
    }

    #[test]
    fn test_nights_and_total() {
        let r = room(1, 750_000.0, &[]);
        assert_eq!(nights(d(2024, 3, 5), d(2024, 3, 8)), 3);
        assert_eq!(total_price(&r, d(2024, 3, 5), d(2024, 3, 8)), 2_250_000.0);
        // reversed or equal dates are not a stay
        assert_eq!(nights(d(2024, 3, 8), d(2024, 3, 5)), 0);
        assert_eq!(total_price(&r, d(2024, 3, 5), d(2024, 3, 5)), 0.0);
    }

    #[test]
    fn test_availability_query() {
        let query = AvailabilityQuery::new(d(2024, 3, 5), d(2024, 3, 6));
        assert_eq!(query.guests, 1);
        assert!(query.validate().is_ok());
        let json = serde_json::to_value(query).unwrap();
        assert_eq!(json["checkInDate"], "2024-03-05");
        assert_eq!(json["guests"], 1);

        let same_day = AvailabilityQuery::new(d(2024, 3, 5), d(2024, 3, 5));
        assert!(same_day.validate().is_err());
    }

    #[test]
    fn test_collect_amenities_and_title() {
        let rooms = vec![room(1, 1.0, &["WiFi", "TV"]), room(2, 1.0, &["TV"])];
        assert_eq!(collect_amenities(&rooms), vec!["TV".to_string(), "WiFi".to_string()]);
        assert_eq!(rooms[0].title(), "Room 101");
    }
}
