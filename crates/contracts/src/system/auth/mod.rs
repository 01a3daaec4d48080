use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::shared::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::Validation(
                "Username and password are required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// Refresh token
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// `POST /register`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub full_name: String,
}

impl RegisterRequest {
    /// An empty username falls back to the email address.
    pub fn new(
        username: &str,
        password: &str,
        email: &str,
        phone: &str,
        full_name: &str,
    ) -> Self {
        let username = if username.trim().is_empty() {
            email.trim()
        } else {
            username.trim()
        };
        Self {
            username: username.to_string(),
            password: password.to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            full_name: full_name.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(ApiError::Validation("A valid email is required".into()));
        }
        if self.password.len() < 6 {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }
        if self.full_name.is_empty() {
            return Err(ApiError::Validation("Full name is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

// ============================================================================
// Roles and sessions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Employee,
    User,
    Guest,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Employee => "ROLE_EMPLOYEE",
            Role::User => "ROLE_USER",
            Role::Guest => "guest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Employee => "Employee",
            Role::User => "Customer",
            Role::Guest => "Guest",
        }
    }

    /// May use the back-office.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ROLE_ADMIN" => Role::Admin,
            "ROLE_EMPLOYEE" => Role::Employee,
            "ROLE_USER" => Role::User,
            _ => Role::Guest,
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.code().to_string()
    }
}

/// Session persisted in browser local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    pub access_token: String,
    /// Refresh token
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "guest_role")]
    pub role: Role,
}

fn guest_role() -> Role {
    Role::Guest
}

impl AuthSession {
    /// Builds a session from a login answer. A missing role becomes
    /// `default_role`. Without a refresh token the session cannot be renewed
    /// and ends when the access token expires.
    pub fn from_login(username: &str, response: LoginResponse, default_role: Role) -> Self {
        let token = response.token.filter(|t| !t.is_empty());
        Self {
            id: response.user_id.unwrap_or(0),
            username: username.to_string(),
            access_token: response.access_token,
            token,
            role: response.role.unwrap_or(default_role),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// ============================================================================
// JWT expiry
// ============================================================================

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// `exp` claim (unix seconds) of a JWT, without verifying the signature.
pub fn token_expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    let trimmed = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| URL_SAFE.decode(payload))
        .ok()?;
    serde_json::from_slice::<ExpiryClaim>(&bytes).ok()?.exp
}

/// True while `now` (unix seconds) is before the token's expiry.
/// Malformed tokens and tokens without `exp` are invalid.
pub fn is_token_valid(token: &str, now: i64) -> bool {
    token_expiry(token).map(|exp| now < exp).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_token_expiry() {
        let token = jwt(r#"{"sub":"admin","exp":1700000000}"#);
        assert_eq!(token_expiry(&token), Some(1_700_000_000));
        assert!(is_token_valid(&token, 1_699_999_999));
        assert!(!is_token_valid(&token, 1_700_000_000));
    }

    #[test]
    fn test_padded_payload_accepted() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":42}"#);
        assert!(payload.ends_with('='));
        let token = format!("h.{}.s", payload);
        assert_eq!(token_expiry(&token), Some(42));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(!is_token_valid("", 0));
        assert!(!is_token_valid("not-a-jwt", 0));
        assert!(!is_token_valid("a.!!!.c", 0));
        assert!(!is_token_valid(&jwt(r#"{"sub":"x"}"#), 0));
        assert!(!is_token_valid(&jwt("not json"), 0));
    }

    #[test]
    fn test_roles() {
        assert_eq!(Role::from("ROLE_EMPLOYEE".to_string()), Role::Employee);
        assert_eq!(Role::from("ROLE_MANAGER".to_string()), Role::Guest);
        assert!(Role::Admin.is_staff());
        assert!(!Role::User.is_staff());
    }

    #[test]
    fn test_session_from_admin_login() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"accessToken":"abc","userId":9}"#).unwrap();
        let session = AuthSession::from_login("boss", response, Role::Admin);
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.token, None);
        assert_eq!(session.id, 9);

        let stored = serde_json::to_string(&session).unwrap();
        assert!(stored.contains(r#""role":"ROLE_ADMIN""#));
        assert!(stored.contains(r#""accessToken":"abc""#));
    }

    #[test]
    fn test_empty_refresh_token_is_dropped() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"accessToken":"acc","token":""}"#).unwrap();
        let session = AuthSession::from_login("guest@example.com", response, Role::User);
        assert_eq!(session.token, None);
        assert_eq!(session.access_token, "acc");
    }

    #[test]
    fn test_session_keeps_server_role() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"accessToken":"abc","token":"refresh","role":"ROLE_USER"}"#,
        )
        .unwrap();
        let session = AuthSession::from_login("guest@example.com", response, Role::Admin);
        assert_eq!(session.role, Role::User);
        assert_eq!(session.token.as_deref(), Some("refresh"));
        assert_eq!(session.bearer(), "Bearer abc");
    }

    #[test]
    fn test_register_username_falls_back_to_email() {
        let request = RegisterRequest::new(" ", "secret1", "a@b.vn", "0900", "An");
        assert_eq!(request.username, "a@b.vn");
        assert!(request.validate().is_ok());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["fullName"], "An");

        assert!(RegisterRequest::new("u", "123", "a@b.vn", "", "An").validate().is_err());
    }
}
