use contracts::domain::a001_booking::{
    status_change, Booking, BookingDateRange, BookingForm, BookingSearch, BookingStatus,
};
use contracts::shared::error::ApiError;
use futures_util::future::join_all;

use crate::shared::api_utils::{ApiClient, BulkOutcome};

const ADMIN: ApiClient = ApiClient::admin();

pub async fn fetch_all() -> Result<Vec<Booking>, ApiError> {
    ADMIN.get("/bookings/").await
}

pub async fn fetch_by_id(id: i64) -> Result<Booking, ApiError> {
    ADMIN.get(&format!("/bookings/{}", id)).await
}

pub async fn fetch_by_status(status: &BookingStatus) -> Result<Vec<Booking>, ApiError> {
    ADMIN
        .get(&format!("/bookings/status/{}", status.code()))
        .await
}

pub async fn fetch_by_date_range(range: &BookingDateRange) -> Result<Vec<Booking>, ApiError> {
    range.validate()?;
    ADMIN.get_with("/bookings/date-range", range).await
}

/// Bookings of one customer. The customer site calls this with its own
/// session, the back-office with the staff one.
pub async fn fetch_by_user(client: ApiClient, user_id: i64) -> Result<Vec<Booking>, ApiError> {
    client.get(&format!("/bookings/user/{}", user_id)).await
}

pub async fn search(search: &BookingSearch) -> Result<Vec<Booking>, ApiError> {
    ADMIN
        .get(&format!("/bookings/search?{}", search.to_query()))
        .await
}

/// `POST /bookings/create`
pub async fn create(client: ApiClient, form: &BookingForm) -> Result<(), ApiError> {
    form.validate()?;
    let _: serde_json::Value = client.post("/bookings/create", form).await?;
    Ok(())
}

/// `PUT /bookings/update/{id}`
pub async fn update(form: &BookingForm) -> Result<(), ApiError> {
    form.validate()?;
    let id = form
        .id
        .ok_or_else(|| ApiError::Validation("Booking has no id".into()))?;
    let _: serde_json::Value = ADMIN.put(&format!("/bookings/update/{}", id), form).await?;
    Ok(())
}

pub async fn confirm(id: i64) -> Result<(), ApiError> {
    let _: serde_json::Value = ADMIN.post_empty(&format!("/bookings/confirm/{}", id)).await?;
    Ok(())
}

pub async fn cancel(client: ApiClient, id: i64) -> Result<(), ApiError> {
    let _: serde_json::Value = client.post_empty(&format!("/bookings/cancel/{}", id)).await?;
    Ok(())
}

/// Moves a booking to `status` through the update endpoint, for the
/// transitions without a dedicated route (check-in and check-out).
pub async fn update_status(id: i64, status: BookingStatus) -> Result<(), ApiError> {
    let current = fetch_by_id(id).await?;
    let form = status_change(&current, status)?;
    let _: serde_json::Value = ADMIN.put(&format!("/bookings/update/{}", id), &form).await?;
    Ok(())
}

/// Cancels every id concurrently. Callers pass only cancellable bookings.
pub async fn cancel_many(ids: Vec<i64>) -> BulkOutcome {
    let results = join_all(ids.into_iter().map(|id| cancel(ADMIN, id))).await;
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        log::warn!("bulk cancel: {}", err);
    }
    BulkOutcome::from_results(&results)
}
