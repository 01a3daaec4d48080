use contracts::domain::a002_discount::{
    Discount, DiscountApplication, DiscountForm, GenerateDiscountsRequest, UseDiscountResponse,
};
use contracts::shared::error::ApiError;
use serde::Serialize;

use crate::shared::api_utils::ApiClient;

const ADMIN: ApiClient = ApiClient::admin();

pub async fn fetch_all() -> Result<Vec<Discount>, ApiError> {
    ADMIN.get("/discounts").await
}

pub async fn fetch_active() -> Result<Vec<Discount>, ApiError> {
    ADMIN.get("/discounts/active").await
}

pub async fn fetch_by_id(id: i64) -> Result<Discount, ApiError> {
    ADMIN.get(&format!("/discounts/{}", id)).await
}

pub async fn fetch_by_code(code: &str) -> Result<Discount, ApiError> {
    ADMIN
        .get(&format!("/discounts/code/{}", urlencoding::encode(code.trim())))
        .await
}

/// `POST /discounts` or `PUT /discounts/{id}` depending on the form.
pub async fn save(form: &DiscountForm) -> Result<Discount, ApiError> {
    form.validate()?;
    match form.id {
        Some(id) => ADMIN.put(&format!("/discounts/{}", id), form).await,
        None => ADMIN.post("/discounts", form).await,
    }
}

/// Asks the backend for `request.count` random codes.
pub async fn generate(request: &GenerateDiscountsRequest) -> Result<Vec<Discount>, ApiError> {
    request.validate()?;
    ADMIN.post("/discounts/generate", request).await
}

pub async fn delete(id: i64) -> Result<(), ApiError> {
    let _: serde_json::Value = ADMIN.delete(&format!("/discounts/{}", id)).await?;
    Ok(())
}

/// Looks a code up on behalf of `client`. The backend answers with the
/// discount record when the code exists.
pub async fn validate_code(client: ApiClient, code: &str) -> Result<Discount, ApiError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ApiError::Validation("Enter a discount code".into()));
    }
    client
        .get(&format!("/discounts/validate/{}", urlencoding::encode(code)))
        .await
}

#[derive(Serialize)]
struct ApplyQuery<'a> {
    code: &'a str,
    amount: f64,
}

/// Server-side computation of the discounted amount.
pub async fn apply(client: ApiClient, code: &str, amount: f64) -> Result<DiscountApplication, ApiError> {
    if amount < 0.0 {
        return Err(ApiError::Validation("Amount must not be negative".into()));
    }
    client
        .get_with(
            "/discounts/apply",
            &ApplyQuery {
                code: code.trim(),
                amount,
            },
        )
        .await
}

/// Records one use of `code`.
pub async fn use_code(client: ApiClient, code: &str) -> Result<UseDiscountResponse, ApiError> {
    client
        .post_empty(&format!("/discounts/use/{}", urlencoding::encode(code.trim())))
        .await
}
