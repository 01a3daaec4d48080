//! Display formatting shared by the admin and client sites.
//!
//! Amounts are Vietnamese dong: dot thousands separator, no decimals.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Group the integer part of `value` with dots.
/// Example: 1200000.4 -> "1.200.000"
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if value < 0.0 && grouped != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format an amount as VND.
/// Example: 1200000.0 -> "1.200.000 ₫"
pub fn format_currency(value: f64) -> String {
    format!("{} ₫", format_thousands(value))
}

/// Format an optional amount, `-` when absent.
pub fn format_currency_opt(value: Option<f64>) -> String {
    value.map(format_currency).unwrap_or_else(|| "-".to_string())
}

fn parse_date_prefix(value: &str) -> Option<NaiveDate> {
    let date_part = value.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Format an ISO date or datetime string as `dd/MM/yyyy`.
/// Unparsable input is returned unchanged.
pub fn format_date(value: &str) -> String {
    match parse_date_prefix(value.trim()) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => value.to_string(),
    }
}

/// Format a date value as `dd/MM/yyyy`.
pub fn format_naive_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format an ISO datetime string as `dd/MM/yyyy HH:mm`.
/// Example: "2024-03-15T14:02:26.123Z" -> "15/03/2024 14:02"
pub fn format_datetime(value: &str) -> String {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return dt.format("%d/%m/%Y %H:%M").to_string();
        }
    }
    // Date only
    format_date(value)
}

/// Cut `text` to `max` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max).collect();
    format!("{}...", head)
}

/// Group a Vietnamese phone number: 10 digits `3-3-4`, 11 digits `4-3-4`.
/// Anything else is returned as given.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => format!("{} {} {}", &digits[..3], &digits[3..6], &digits[6..]),
        11 => format!("{} {} {}", &digits[..4], &digits[4..7], &digits[7..]),
        _ => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1_200_000.0), "1.200.000 ₫");
        assert_eq!(format_currency(999.0), "999 ₫");
        assert_eq!(format_currency(0.0), "0 ₫");
        assert_eq!(format_currency(1000.0), "1.000 ₫");
        assert_eq!(format_currency(-2_500_000.0), "-2.500.000 ₫");
    }

    #[test]
    fn test_currency_rounds() {
        assert_eq!(format_currency(1499.6), "1.500 ₫");
        assert_eq!(format_currency_opt(None), "-");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05"), "05/03/2024");
        assert_eq!(format_date("2024-03-05T23:10:00Z"), "05/03/2024");
        assert_eq!(format_date("invalid"), "invalid");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2024-03-15T14:02:26.123Z"), "15/03/2024 14:02");
        assert_eq!(format_datetime("2024-03-15T14:02:26"), "15/03/2024 14:02");
        assert_eq!(format_datetime("2024-03-15"), "15/03/2024");
        assert_eq!(format_datetime("soon"), "soon");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a long comment", 6), "a long...");
        assert_eq!(truncate_text("phòng đẹp", 5), "phòng...");
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("0912345678"), "091 234 5678");
        assert_eq!(format_phone("01234567890"), "0123 456 7890");
        assert_eq!(format_phone("+84 912"), "+84 912");
    }
}
