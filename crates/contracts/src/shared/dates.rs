//! Calendar dates on the wire.
//!
//! The backend sends dates either as `2024-03-05` or as a full timestamp
//! `2024-03-05T00:00:00`; only the date part is meaningful.

use chrono::NaiveDate;

/// Parse the leading `YYYY-MM-DD` of an ISO date or datetime.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `#[serde(with = "iso_date")]` for required dates.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }
}

/// `#[serde(with = "iso_date_opt")]` for nullable dates.
pub mod iso_date_opt {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&super::to_iso(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_iso_date(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Stay {
        #[serde(with = "iso_date")]
        from: NaiveDate,
        #[serde(default, with = "iso_date_opt")]
        to: Option<NaiveDate>,
    }

    #[test]
    fn test_parse_iso_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_iso_date("2024-03-05"), expected);
        assert_eq!(parse_iso_date("2024-03-05T10:30:00"), expected);
        assert_eq!(parse_iso_date("05/03/2024"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn test_serde_helpers() {
        let stay: Stay = serde_json::from_str(r#"{"from":"2024-03-05T00:00:00","to":null}"#).unwrap();
        assert_eq!(stay.from, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(stay.to, None);

        let stay: Stay = serde_json::from_str(r#"{"from":"2024-03-05"}"#).unwrap();
        assert_eq!(stay.to, None);
        assert_eq!(
            serde_json::to_string(&stay).unwrap(),
            r#"{"from":"2024-03-05","to":null}"#
        );
    }

    #[test]
    fn test_invalid_date_rejected() {
        let result: Result<Stay, _> = serde_json::from_str(r#"{"from":"tomorrow"}"#);
        assert!(result.is_err());
    }
}
