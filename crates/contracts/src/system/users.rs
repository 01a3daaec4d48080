use serde::{Deserialize, Serialize};

use crate::shared::error::ApiError;
use crate::system::auth::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_role() -> Role {
    Role::User
}

fn default_active() -> bool {
    true
}

impl User {
    /// Full name, else email, else username.
    pub fn display_name(&self) -> String {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(self.email.as_str()).filter(|e| !e.trim().is_empty()))
            .unwrap_or(&self.username)
            .to_string()
    }

    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.username.as_str(),
            self.email.as_str(),
            self.full_name.as_deref().unwrap_or(""),
            self.phone.as_deref().unwrap_or(""),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() {
            return Err(ApiError::Validation("Username is required".into()));
        }
        if !self.email.contains('@') {
            return Err(ApiError::Validation("A valid email is required".into()));
        }
        if self.password.len() < 6 {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[serde(skip)]
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub active: bool,
}

impl UpdateUserDto {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            active: user.active,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.email.contains('@') {
            return Err(ApiError::Validation("A valid email is required".into()));
        }
        Ok(())
    }
}

/// `GET /users/search?q=`
pub fn search_query(keyword: &str) -> String {
    format!("q={}", urlencoding::encode(keyword.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_defaults() {
        let user: User = serde_json::from_str(r#"{"id":1,"username":"lan"}"#).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.active);
        assert_eq!(user.display_name(), "lan");
    }

    #[test]
    fn test_display_name_order() {
        let mut user: User =
            serde_json::from_str(r#"{"id":1,"username":"lan","email":"lan@x.vn","role":"ROLE_EMPLOYEE"}"#)
                .unwrap();
        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.display_name(), "lan@x.vn");
        user.full_name = Some("Le Thi Lan".into());
        assert_eq!(user.display_name(), "Le Thi Lan");
        assert!(user.matches("THI"));
        assert!(!user.matches("hung"));
    }

    #[test]
    fn test_update_dto_skips_id() {
        let user: User = serde_json::from_str(r#"{"id":5,"username":"a","email":"a@b.c"}"#).unwrap();
        let dto = UpdateUserDto::from_user(&user);
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["role"], "ROLE_USER");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_validation_and_query() {
        let dto = CreateUserDto {
            username: "nam".into(),
            password: "123".into(),
            email: "nam@x.vn".into(),
            full_name: None,
            phone: None,
            role: Role::Employee,
        };
        assert!(dto.validate().is_err());
        assert_eq!(search_query(" Nguyễn "), "q=Nguy%E1%BB%85n");
    }
}
