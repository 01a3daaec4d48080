use contracts::domain::a003_review::{ReplyRequest, Review, ReviewForm, ReviewStatistics};
use contracts::shared::error::ApiError;
use futures_util::future::join_all;

use crate::shared::api_utils::{ApiClient, BulkOutcome};

const ADMIN: ApiClient = ApiClient::admin();

pub async fn fetch_all() -> Result<Vec<Review>, ApiError> {
    ADMIN.get("/reviews/").await
}

pub async fn fetch_statistics() -> Result<ReviewStatistics, ApiError> {
    ADMIN.get("/reviews/statistics").await
}

pub async fn fetch_by_id(id: i64) -> Result<Review, ApiError> {
    ADMIN.get(&format!("/reviews/{}", id)).await
}

/// `POST /reviews/` for new reviews, `PUT /reviews/{id}` otherwise.
pub async fn save(form: &ReviewForm) -> Result<(), ApiError> {
    form.validate()?;
    let _: serde_json::Value = match form.id {
        Some(id) => ADMIN.put(&format!("/reviews/{}", id), form).await?,
        None => ADMIN.post("/reviews/", form).await?,
    };
    Ok(())
}

pub async fn reply(id: i64, request: &ReplyRequest) -> Result<(), ApiError> {
    request.validate()?;
    let _: serde_json::Value = ADMIN
        .post(&format!("/reviews/{}/reply", id), request)
        .await?;
    Ok(())
}

pub async fn delete(id: i64) -> Result<(), ApiError> {
    let _: serde_json::Value = ADMIN.delete(&format!("/reviews/{}", id)).await?;
    Ok(())
}

/// Deletes every id concurrently; failures are counted, not rolled back.
pub async fn delete_many(ids: Vec<i64>) -> BulkOutcome {
    let results = join_all(ids.into_iter().map(delete)).await;
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        log::warn!("bulk review delete: {}", err);
    }
    BulkOutcome::from_results(&results)
}
