//! HTTP plumbing shared by every page.
//!
//! Requests go to `<base_url><prefix><path>` from the embedded `config.toml`.
//! Each call is made on behalf of an [`AuthScope`]: the back-office session,
//! the customer session, or nobody. Responses are unwrapped from whatever
//! envelope the backend chose via [`decode_body`].

use chrono::Utc;
use contracts::shared::config::{ClientConfig, DEFAULT_CONFIG};
use contracts::shared::envelope::decode_body;
use contracts::shared::error::ApiError;
use contracts::system::auth::{is_token_valid, AuthSession, RefreshRequest, RefreshResponse};
use gloo_net::http::{Method, RequestBuilder};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::system::auth::storage::{self, SessionSlot};

static CONFIG: Lazy<ClientConfig> = Lazy::new(|| load_config(include_str!("../../config.toml")));

/// Parses the embedded configuration, falling back to the defaults.
pub fn load_config(raw: &str) -> ClientConfig {
    match ClientConfig::from_toml(raw) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("config.toml is invalid, using defaults: {}", e);
            ClientConfig::from_toml(DEFAULT_CONFIG).unwrap_or_default()
        }
    }
}

pub fn config() -> &'static ClientConfig {
    &CONFIG
}

/// Full URL of an API path such as `/bookings/12`.
pub fn api_url(path: &str) -> String {
    config().endpoint(path)
}

/// Appends a serialized query to a path.
pub fn with_query<Q: Serialize>(path: &str, query: &Q) -> Result<String, ApiError> {
    let encoded = serde_qs::to_string(query).map_err(|e| ApiError::Validation(e.to_string()))?;
    if encoded.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, encoded))
    }
}

/// Whose credentials a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScope {
    Admin,
    Client,
    Anonymous,
}

impl AuthScope {
    fn slot(&self) -> Option<SessionSlot> {
        match self {
            AuthScope::Admin => Some(SessionSlot::Admin),
            AuthScope::Client => Some(SessionSlot::Client),
            AuthScope::Anonymous => None,
        }
    }
}

/// What a stored session allows before a request goes out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCheck {
    Send,
    /// Customer token is stale; trade this refresh token first.
    Refresh(String),
    Expired,
}

/// Staff sessions end with their access token. Customer sessions get one
/// refresh when they hold a refresh token. Unreadable tokens count as stale.
pub fn check_token(slot: SessionSlot, session: &AuthSession, now: i64) -> TokenCheck {
    if is_token_valid(&session.access_token, now) {
        return TokenCheck::Send;
    }
    match (slot, session.token.as_deref().filter(|t| !t.is_empty())) {
        (SessionSlot::Client, Some(token)) => TokenCheck::Refresh(token.to_string()),
        _ => TokenCheck::Expired,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ApiClient {
    scope: AuthScope,
}

impl ApiClient {
    pub const fn new(scope: AuthScope) -> Self {
        Self { scope }
    }

    pub const fn admin() -> Self {
        Self::new(AuthScope::Admin)
    }

    pub const fn client() -> Self {
        Self::new(AuthScope::Client)
    }

    pub const fn anonymous() -> Self {
        Self::new(AuthScope::Anonymous)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn get_with<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let path = with_query(path, query)?;
        self.send(Method::GET, &path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let json = serde_json::to_string(body)?;
        self.send(Method::POST, path, Some(json)).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::POST, path, None).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let json = serde_json::to_string(body)?;
        self.send(Method::PUT, path, Some(json)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::DELETE, path, None).await
    }

    /// `Authorization` header value for this scope, refreshing an expired
    /// customer token once before giving up.
    async fn authorization(&self) -> Result<Option<String>, ApiError> {
        let slot = match self.scope.slot() {
            Some(slot) => slot,
            None => return Ok(None),
        };
        let session = storage::load_session(slot).ok_or(ApiError::NotAuthenticated)?;
        match check_token(slot, &session, Utc::now().timestamp()) {
            TokenCheck::Send => Ok(Some(session.bearer())),
            TokenCheck::Refresh(token) => {
                let refreshed = refresh_client_session(session, token).await?;
                Ok(Some(refreshed.bearer()))
            }
            TokenCheck::Expired => {
                log::warn!("{:?} token expired, clearing session", slot);
                storage::clear_session(slot);
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let url = api_url(path);
        let authorization = self.authorization().await?;

        let mut builder = RequestBuilder::new(&url).method(method.clone());
        if let Some(value) = authorization.as_deref() {
            builder = builder.header("Authorization", value);
        }
        let request = match body {
            Some(json) => builder.header("Content-Type", "application/json").body(json),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = request.send().await.map_err(|e| {
            log::error!("{} {} failed to send: {}", method, url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            let err = ApiError::from_response(status, &text);
            log::error!("{} {} -> {}: {}", method, url, status, err);
            if status == 401 {
                if let Some(slot) = self.scope.slot() {
                    storage::clear_session(slot);
                }
            }
            return Err(err);
        }

        decode_body(&text).map_err(|e| {
            log::error!("{} {}: {}", method, url, e);
            e
        })
    }
}

/// Outcome of a bulk operation. Nothing is rolled back on partial failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

impl BulkOutcome {
    pub fn from_results<T, E>(results: &[Result<T, E>]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
        }
    }
}

/// Plain `POST /refresh-token`, outside [`ApiClient::send`] so it never
/// asks for authorization itself.
async fn request_refresh(token: String) -> Result<RefreshResponse, ApiError> {
    let url = api_url("/refresh-token");
    let json = serde_json::to_string(&RefreshRequest { token })?;
    let response = RequestBuilder::new(&url)
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(json)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if !response.ok() {
        return Err(ApiError::from_response(status, &text));
    }
    decode_body(&text)
}

/// Trades the refresh token for a new access token. Any failure clears the
/// customer session.
async fn refresh_client_session(
    mut session: AuthSession,
    token: String,
) -> Result<AuthSession, ApiError> {
    match request_refresh(token).await {
        Ok(response) if !response.access_token.is_empty() => {
            session.access_token = response.access_token;
            storage::save_session(SessionSlot::Client, &session);
            log::debug!("customer token refreshed for {}", session.username);
            Ok(session)
        }
        Ok(_) => {
            log::warn!("token refresh returned no token, clearing customer session");
            storage::clear_session(SessionSlot::Client);
            Err(ApiError::SessionExpired)
        }
        Err(e) => {
            log::warn!("token refresh failed ({}), clearing customer session", e);
            storage::clear_session(SessionSlot::Client);
            Err(ApiError::SessionExpired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn test_embedded_config_parses() {
        let config = load_config(include_str!("../../config.toml"));
        assert_eq!(config.api.prefix, "/api/v1");
        assert_eq!(config.ui.page_size, 10);
    }

    #[test]
    fn test_broken_config_falls_back() {
        let config = load_config("[api\nbase_url = ");
        assert_eq!(config, ClientConfig::default());
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Range {
        start_date: String,
        end_date: String,
    }

    #[test]
    fn test_with_query() {
        let range = Range {
            start_date: "2024-03-01".into(),
            end_date: "2024-03-31".into(),
        };
        assert_eq!(
            with_query("/bookings/date-range", &range).unwrap(),
            "/bookings/date-range?startDate=2024-03-01&endDate=2024-03-31"
        );
    }

    #[test]
    fn test_bulk_outcome_counts() {
        let results: Vec<Result<(), String>> = vec![Ok(()), Err("x".into()), Ok(())];
        assert_eq!(
            BulkOutcome::from_results(&results),
            BulkOutcome {
                succeeded: 2,
                failed: 1
            }
        );
        let none: Vec<Result<(), String>> = Vec::new();
        assert_eq!(BulkOutcome::from_results(&none), BulkOutcome::default());
    }

    fn session(access_token: &str, token: Option<&str>) -> AuthSession {
        AuthSession {
            id: 1,
            username: "guest@example.com".into(),
            access_token: access_token.into(),
            token: token.map(str::to_string),
            role: contracts::system::auth::Role::User,
        }
    }

    // header {"alg":"HS256"}, payload {"exp":1000}
    const EXP_1000: &str = "eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjEwMDB9.sig";

    #[test]
    fn test_fresh_token_is_sent() {
        let s = session(EXP_1000, None);
        assert_eq!(check_token(SessionSlot::Admin, &s, 999), TokenCheck::Send);
        assert_eq!(check_token(SessionSlot::Client, &s, 999), TokenCheck::Send);
    }

    #[test]
    fn test_unreadable_token_needs_refresh() {
        let s = session("opaque-token", Some("refresh"));
        assert_eq!(
            check_token(SessionSlot::Client, &s, 0),
            TokenCheck::Refresh("refresh".into())
        );
        assert_eq!(check_token(SessionSlot::Admin, &s, 0), TokenCheck::Expired);
    }

    #[test]
    fn test_stale_client_token_without_refresh_token_expires() {
        assert_eq!(
            check_token(SessionSlot::Client, &session(EXP_1000, None), 1000),
            TokenCheck::Expired
        );
        assert_eq!(
            check_token(SessionSlot::Client, &session(EXP_1000, Some("")), 1000),
            TokenCheck::Expired
        );
    }
}
