use contracts::shared::error::ApiError;
use contracts::system::auth::{LoginRequest, LoginResponse, RegisterRequest};

use crate::shared::api_utils::ApiClient;

/// `POST /login`, shared by the back-office and the customer site.
pub async fn login(request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    request.validate()?;
    ApiClient::anonymous().post("/login", request).await
}

/// `POST /register`
pub async fn register(request: &RegisterRequest) -> Result<(), ApiError> {
    request.validate()?;
    let _: serde_json::Value = ApiClient::anonymous().post("/register", request).await?;
    Ok(())
}
