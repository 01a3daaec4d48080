use contracts::domain::a004_room::{AvailabilityQuery, Room, RoomType};
use contracts::shared::error::ApiError;

use crate::shared::api_utils::ApiClient;

/// Every room, for the back-office.
pub async fn fetch_all_rooms() -> Result<Vec<Room>, ApiError> {
    ApiClient::admin().get("/admin/rooms").await
}

pub async fn fetch_room(id: i64) -> Result<Room, ApiError> {
    ApiClient::anonymous().get(&format!("/rooms/{}", id)).await
}

pub async fn fetch_rooms_by_type(room_type_id: i64) -> Result<Vec<Room>, ApiError> {
    ApiClient::anonymous()
        .get(&format!("/rooms/room-type/{}", room_type_id))
        .await
}

/// Rooms sleeping at least `guests`.
pub async fn fetch_rooms_by_occupancy(guests: u32) -> Result<Vec<Room>, ApiError> {
    ApiClient::anonymous()
        .get(&format!("/rooms/occupancy/{}", guests))
        .await
}

pub async fn fetch_available(query: &AvailabilityQuery) -> Result<Vec<Room>, ApiError> {
    query.validate()?;
    ApiClient::anonymous().get_with("/rooms/available", query).await
}

pub async fn fetch_room_types() -> Result<Vec<RoomType>, ApiError> {
    ApiClient::anonymous().get("/room-types").await
}

pub async fn fetch_room_type(id: i64) -> Result<RoomType, ApiError> {
    ApiClient::anonymous()
        .get(&format!("/room-types/{}", id))
        .await
}

pub async fn fetch_room_type_rooms(id: i64) -> Result<Vec<Room>, ApiError> {
    ApiClient::anonymous()
        .get(&format!("/room-types/{}/rooms", id))
        .await
}
