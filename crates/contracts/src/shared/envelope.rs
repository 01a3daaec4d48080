//! Decoding of the backend's response envelopes.
//!
//! Endpoints are not consistent about wrapping: the same resource may come
//! back bare, as `{"data": ...}`, or paged as `{"data": {"content": ...}}`.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Wrapped { data: Inner<T> },
    Bare(T),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Inner<T> {
    Page { content: Present<T> },
    Direct(T),
}

/// Newtype so a missing `content` key never decodes as `None` for
/// `Option` targets.
#[derive(Debug, Deserialize)]
pub struct Present<T>(pub T);

impl<T> Payload<T> {
    pub fn into_inner(self) -> T {
        match self {
            Payload::Wrapped {
                data: Inner::Page { content },
            } => content.0,
            Payload::Wrapped {
                data: Inner::Direct(value),
            } => value,
            Payload::Bare(value) => value,
        }
    }
}

/// Decode a response body, unwrapping any envelope.
///
/// An empty body is treated as JSON `null`, so `()` and `Option<T>` targets
/// succeed on `204 No Content`.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    match serde_json::from_str::<Payload<T>>(text) {
        Ok(payload) => Ok(payload.into_inner()),
        // untagged errors are opaque, decode bare to report the real cause
        Err(e) => Err(ApiError::Decode(
            serde_json::from_str::<T>(text)
                .err()
                .map(|inner| inner.to_string())
                .unwrap_or_else(|| e.to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
        name: String,
    }

    #[test]
    fn test_bare_array() {
        let items: Vec<Item> = decode_body(r#"[{"id":1,"name":"a"},{"id":2,"name":"b"}]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "b");
    }

    #[test]
    fn test_data_array() {
        let items: Vec<Item> =
            decode_body(r#"{"data":[{"id":1,"name":"a"}],"message":"ok"}"#).unwrap();
        assert_eq!(items, vec![Item { id: 1, name: "a".into() }]);
    }

    #[test]
    fn test_paged_content() {
        let items: Vec<Item> = decode_body(
            r#"{"data":{"content":[{"id":3,"name":"c"}],"totalElements":1}}"#,
        )
        .unwrap();
        assert_eq!(items[0].id, 3);
    }

    #[test]
    fn test_single_object() {
        let item: Item = decode_body(r#"{"id":5,"name":"bare"}"#).unwrap();
        assert_eq!(item.id, 5);
        let item: Item = decode_body(r#"{"data":{"id":6,"name":"wrapped"}}"#).unwrap();
        assert_eq!(item.name, "wrapped");
    }

    #[test]
    fn test_empty_body() {
        let unit: () = decode_body("").unwrap();
        assert_eq!(unit, ());
        let none: Option<Item> = decode_body("  ").unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_wrapped_optional_object() {
        let item: Option<Item> = decode_body(r#"{"data":{"id":9,"name":"opt"}}"#).unwrap();
        assert_eq!(item, Some(Item { id: 9, name: "opt".into() }));
    }

    #[test]
    fn test_scalar_body() {
        let valid: bool = decode_body("true").unwrap();
        assert!(valid);
    }

    #[test]
    fn test_mismatch_is_decode_error() {
        let result: Result<Vec<Item>, _> = decode_body(r#"{"id":1}"#);
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
