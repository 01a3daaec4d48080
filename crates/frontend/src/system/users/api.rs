use contracts::shared::error::ApiError;
use contracts::system::users::{search_query, CreateUserDto, UpdateUserDto, User};

use crate::shared::api_utils::ApiClient;

const ADMIN: ApiClient = ApiClient::admin();

/// Fetch all users
pub async fn fetch_users() -> Result<Vec<User>, ApiError> {
    ADMIN.get("/users").await
}

pub async fn fetch_user(id: i64) -> Result<User, ApiError> {
    ADMIN.get(&format!("/users/{}", id)).await
}

/// Server-side keyword search; a blank keyword lists everyone.
pub async fn search_users(keyword: &str) -> Result<Vec<User>, ApiError> {
    if keyword.trim().is_empty() {
        return fetch_users().await;
    }
    ADMIN
        .get(&format!("/users/search?{}", search_query(keyword)))
        .await
}

pub async fn create_user(dto: &CreateUserDto) -> Result<User, ApiError> {
    dto.validate()?;
    ADMIN.post("/users", dto).await
}

pub async fn update_user(dto: &UpdateUserDto) -> Result<User, ApiError> {
    dto.validate()?;
    ADMIN.put(&format!("/users/{}", dto.id), dto).await
}

pub async fn delete_user(id: i64) -> Result<(), ApiError> {
    let _: serde_json::Value = ADMIN.delete(&format!("/users/{}", id)).await?;
    Ok(())
}
