use thiserror::Error;

/// Errors surfaced by API calls and client-side validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Not authenticated, please log in")]
    NotAuthenticated,

    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("Network error: {0}")]
    Network(String),

    #[error("{message} ({status})")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Builds an HTTP error from a status and the raw error body.
    ///
    /// The backend usually answers with `{"message": "..."}`; anything else
    /// falls back to the generic `HTTP error <status>` text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error {}", status));
        ApiError::Http { status, message }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::NotAuthenticated
                | ApiError::SessionExpired
                | ApiError::Http { status: 401, .. }
        )
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json_body() {
        let err = ApiError::from_response(400, r#"{"message":"Room is not available"}"#);
        assert_eq!(
            err,
            ApiError::Http {
                status: 400,
                message: "Room is not available".to_string()
            }
        );
        assert_eq!(err.to_string(), "Room is not available (400)");
    }

    #[test]
    fn test_message_fallback() {
        let err = ApiError::from_response(502, "<html>Bad gateway</html>");
        assert_eq!(err.to_string(), "HTTP error 502 (502)");

        let err = ApiError::from_response(500, r#"{"message":"  "}"#);
        assert_eq!(err.to_string(), "HTTP error 500 (500)");
    }

    #[test]
    fn test_unauthorized() {
        assert!(ApiError::SessionExpired.is_unauthorized());
        assert!(ApiError::from_response(401, "").is_unauthorized());
        assert!(!ApiError::from_response(403, "").is_unauthorized());
        assert!(!ApiError::Validation("x".into()).is_unauthorized());
    }
}
