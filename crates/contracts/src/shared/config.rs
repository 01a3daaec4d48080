use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme, host and port of the backend, e.g. `http://127.0.0.1:9000`
    pub base_url: String,
    /// Path prepended to every endpoint, e.g. `/api/v1`
    pub prefix: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub toast_life_ms: u32,
    pub error_toast_life_ms: u32,
    pub page_size: usize,
    pub currency: String,
}

/// Default configuration embedded in the binary
pub const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://127.0.0.1:9000"
prefix = "/api/v1"

[ui]
toast_life_ms = 3000
error_toast_life_ms = 5000
page_size = 10
currency = "VND"
"#;

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000".to_string(),
            prefix: "/api/v1".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_life_ms: 3000,
            error_toast_life_ms: 5000,
            page_size: 10,
            currency: "VND".to_string(),
        }
    }
}

impl ClientConfig {
    /// Parse configuration from TOML text. Missing sections and keys keep
    /// their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Full URL of the API root, without a trailing slash
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.prefix.trim_matches('/')
        )
        .trim_end_matches('/')
        .to_string()
    }

    /// Build a full URL for an endpoint path such as `/bookings/12`
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_root(), path)
        } else {
            format!("{}/{}", self.api_root(), path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = ClientConfig::from_toml(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_root(), "http://127.0.0.1:9000/api/v1");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = ClientConfig::from_toml(
            r#"
[api]
base_url = "https://hotel.example.com/"
"#,
        )
        .unwrap();
        assert_eq!(config.api.prefix, "/api/v1");
        assert_eq!(config.ui.toast_life_ms, 3000);
        assert_eq!(
            config.endpoint("/bookings/7"),
            "https://hotel.example.com/api/v1/bookings/7"
        );
        assert_eq!(
            config.endpoint("room-types"),
            "https://hotel.example.com/api/v1/room-types"
        );
    }

    #[test]
    fn test_empty_prefix() {
        let config = ClientConfig::from_toml(
            r#"
[api]
base_url = "http://localhost:9000"
prefix = ""
"#,
        )
        .unwrap();
        assert_eq!(config.api_root(), "http://localhost:9000");
        assert_eq!(config.endpoint("/login"), "http://localhost:9000/login");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(ClientConfig::from_toml("[ui]\npage_size = \"ten\"").is_err());
    }
}
