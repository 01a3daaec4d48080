use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::dates::iso_date;
use crate::shared::error::ApiError;
use crate::shared::format::format_currency;
use crate::shared::severity::Severity;

// ============================================================================
// Discount type
// ============================================================================

/// How `discountValue` is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiscountType {
    /// `discountValue` is a fraction in `0..=1`
    Percent,
    /// `discountValue` is an amount of currency
    Fixed,
    Unknown(String),
}

impl DiscountType {
    pub const ALL: [DiscountType; 2] = [DiscountType::Percent, DiscountType::Fixed];

    pub fn code(&self) -> &str {
        match self {
            DiscountType::Percent => "PERCENT",
            DiscountType::Fixed => "FIXED",
            DiscountType::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DiscountType::Percent => "Percentage",
            DiscountType::Fixed => "Fixed amount",
            DiscountType::Unknown(raw) => raw,
        }
    }
}

impl From<String> for DiscountType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PERCENT" => DiscountType::Percent,
            "FIXED" => DiscountType::Fixed,
            _ => DiscountType::Unknown(raw),
        }
    }
}

impl From<DiscountType> for String {
    fn from(value: DiscountType) -> Self {
        value.code().to_string()
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// A promotional code with a validity window and a usage cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: i64,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(with = "iso_date")]
    pub valid_from: NaiveDate,
    #[serde(with = "iso_date")]
    pub valid_to: NaiveDate,
    #[serde(default)]
    pub max_uses: u32,
    #[serde(default)]
    pub used_count: u32,
    /// Administrative on/off switch.
    #[serde(default)]
    pub valid: bool,
}

/// Lifecycle state of a discount on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountStatus {
    Disabled,
    NotStarted,
    Expired,
    Exhausted,
    Active,
}

impl DiscountStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DiscountStatus::Disabled => "Disabled",
            DiscountStatus::NotStarted => "Not started",
            DiscountStatus::Expired => "Expired",
            DiscountStatus::Exhausted => "Used up",
            DiscountStatus::Active => "Active",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiscountStatus::NotStarted => Severity::Warning,
            DiscountStatus::Active => Severity::Success,
            DiscountStatus::Disabled | DiscountStatus::Expired | DiscountStatus::Exhausted => {
                Severity::Danger
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscountError {
    #[error("Discount code {0} is invalid or expired")]
    NotUsable(String),
    #[error("Amount must not be negative")]
    NegativeAmount,
}

/// Outcome of applying a discount to an amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountApplication {
    pub original_amount: f64,
    pub discount_amount: f64,
    pub discounted_amount: f64,
    pub discount_code: String,
}

impl Discount {
    /// Enabled, inside the (inclusive) window, and not used up.
    pub fn is_usable_on(&self, today: NaiveDate) -> bool {
        self.status_on(today) == DiscountStatus::Active
    }

    pub fn status_on(&self, today: NaiveDate) -> DiscountStatus {
        if !self.valid {
            DiscountStatus::Disabled
        } else if today < self.valid_from {
            DiscountStatus::NotStarted
        } else if today > self.valid_to {
            DiscountStatus::Expired
        } else if self.used_count >= self.max_uses {
            DiscountStatus::Exhausted
        } else {
            DiscountStatus::Active
        }
    }

    /// Discount taken off `amount`, never more than `amount` itself.
    pub fn discount_for(&self, amount: f64) -> f64 {
        let raw = match self.discount_type {
            DiscountType::Percent => amount * self.discount_value,
            DiscountType::Fixed => self.discount_value,
            DiscountType::Unknown(_) => 0.0,
        };
        raw.clamp(0.0, amount.max(0.0))
    }

    pub fn apply(&self, amount: f64, today: NaiveDate) -> Result<DiscountApplication, DiscountError> {
        if amount < 0.0 {
            return Err(DiscountError::NegativeAmount);
        }
        if !self.is_usable_on(today) {
            return Err(DiscountError::NotUsable(self.code.clone()));
        }
        let discount_amount = self.discount_for(amount);
        Ok(DiscountApplication {
            original_amount: amount,
            discount_amount,
            discounted_amount: amount - discount_amount,
            discount_code: self.code.clone(),
        })
    }

    /// Whole days until `validTo`; zero once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.valid_to - today).num_days().max(0)
    }

    pub fn usage_percentage(&self) -> f64 {
        if self.max_uses == 0 {
            return 0.0;
        }
        f64::from(self.used_count) / f64::from(self.max_uses) * 100.0
    }

    /// `"15%"` for percent discounts, a currency string otherwise.
    pub fn format_value(&self) -> String {
        format_discount_value(&self.discount_type, self.discount_value)
    }
}

pub fn format_discount_value(discount_type: &DiscountType, value: f64) -> String {
    match discount_type {
        DiscountType::Percent => format!("{:.0}%", value * 100.0),
        _ => format_currency(value),
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Create/update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(with = "iso_date")]
    pub valid_from: NaiveDate,
    #[serde(with = "iso_date")]
    pub valid_to: NaiveDate,
    pub max_uses: u32,
    pub used_count: u32,
    pub valid: bool,
}

fn one_month_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

fn check_value(discount_type: &DiscountType, value: f64) -> Result<(), ApiError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ApiError::Validation(
            "Discount value must be greater than 0".into(),
        ));
    }
    if *discount_type == DiscountType::Percent && value > 1.0 {
        return Err(ApiError::Validation(
            "Percentage discount must be between 0 and 1".into(),
        ));
    }
    Ok(())
}

impl DiscountForm {
    /// Percent, valid from today for one month, 100 uses.
    pub fn new_default(today: NaiveDate) -> Self {
        Self {
            id: None,
            code: String::new(),
            discount_type: DiscountType::Percent,
            discount_value: 0.0,
            valid_from: today,
            valid_to: one_month_after(today),
            max_uses: 100,
            used_count: 0,
            valid: true,
        }
    }

    pub fn from_discount(discount: &Discount) -> Self {
        Self {
            id: Some(discount.id),
            code: discount.code.clone(),
            discount_type: discount.discount_type.clone(),
            discount_value: discount.discount_value,
            valid_from: discount.valid_from,
            valid_to: discount.valid_to,
            max_uses: discount.max_uses,
            used_count: discount.used_count,
            valid: discount.valid,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.code.trim().is_empty() {
            return Err(ApiError::Validation("Discount code is required".into()));
        }
        check_value(&self.discount_type, self.discount_value)?;
        if self.valid_from > self.valid_to {
            return Err(ApiError::Validation(
                "Start date must not be after end date".into(),
            ));
        }
        if self.max_uses < 1 {
            return Err(ApiError::Validation("Max uses must be at least 1".into()));
        }
        Ok(())
    }
}

pub const GENERATE_MAX_COUNT: u32 = 100;

/// Server-side batch generation of random codes sharing a prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDiscountsRequest {
    pub prefix: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(with = "iso_date")]
    pub valid_from: NaiveDate,
    #[serde(with = "iso_date")]
    pub valid_to: NaiveDate,
    pub max_uses: u32,
    pub count: u32,
}

impl GenerateDiscountsRequest {
    pub fn new_default(today: NaiveDate) -> Self {
        Self {
            prefix: "PROMO".to_string(),
            discount_type: DiscountType::Percent,
            discount_value: 0.0,
            valid_from: today,
            valid_to: one_month_after(today),
            max_uses: 100,
            count: 5,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.prefix.trim().is_empty() {
            return Err(ApiError::Validation("Prefix is required".into()));
        }
        check_value(&self.discount_type, self.discount_value)?;
        if self.count < 1 || self.count > GENERATE_MAX_COUNT {
            return Err(ApiError::Validation(format!(
                "Count must be between 1 and {}",
                GENERATE_MAX_COUNT
            )));
        }
        if self.valid_from > self.valid_to {
            return Err(ApiError::Validation(
                "Start date must not be after end date".into(),
            ));
        }
        Ok(())
    }
}

/// Body of `POST /discounts/use/{code}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UseDiscountResponse {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn summer() -> Discount {
        Discount {
            id: 1,
            code: "SUMMER".into(),
            discount_type: DiscountType::Percent,
            discount_value: 0.15,
            valid_from: d(2024, 6, 1),
            valid_to: d(2024, 8, 31),
            max_uses: 100,
            used_count: 45,
            valid: true,
        }
    }

    #[test]
    fn test_window_is_inclusive() {
        let discount = summer();
        assert!(discount.is_usable_on(d(2024, 6, 1)));
        assert!(discount.is_usable_on(d(2024, 8, 31)));
        assert!(!discount.is_usable_on(d(2024, 5, 31)));
        assert!(!discount.is_usable_on(d(2024, 9, 1)));
    }

    #[test]
    fn test_status_precedence() {
        let mut discount = summer();
        discount.valid = false;
        discount.used_count = 100;
        // Disabled wins over everything
        assert_eq!(discount.status_on(d(2024, 1, 1)), DiscountStatus::Disabled);

        discount.valid = true;
        assert_eq!(discount.status_on(d(2024, 1, 1)), DiscountStatus::NotStarted);
        assert_eq!(discount.status_on(d(2024, 12, 1)), DiscountStatus::Expired);
        assert_eq!(discount.status_on(d(2024, 7, 1)), DiscountStatus::Exhausted);

        discount.used_count = 99;
        assert_eq!(discount.status_on(d(2024, 7, 1)), DiscountStatus::Active);
        assert_eq!(DiscountStatus::Exhausted.severity(), Severity::Danger);
        assert_eq!(DiscountStatus::NotStarted.severity(), Severity::Warning);
    }

    #[test]
    fn test_apply_percent() {
        let result = summer().apply(1_000_000.0, d(2024, 7, 1)).unwrap();
        assert_eq!(result.discount_amount, 150_000.0);
        assert_eq!(result.discounted_amount, 850_000.0);
        assert_eq!(result.discount_code, "SUMMER");
    }

    #[test]
    fn test_apply_fixed_is_clamped() {
        let mut discount = summer();
        discount.discount_type = DiscountType::Fixed;
        discount.discount_value = 500_000.0;
        let result = discount.apply(200_000.0, d(2024, 7, 1)).unwrap();
        assert_eq!(result.discount_amount, 200_000.0);
        assert_eq!(result.discounted_amount, 0.0);
    }

    #[test]
    fn test_apply_rejects_unusable() {
        let result = summer().apply(100.0, d(2025, 1, 1));
        assert_eq!(result, Err(DiscountError::NotUsable("SUMMER".into())));
        assert_eq!(
            summer().apply(-1.0, d(2024, 7, 1)),
            Err(DiscountError::NegativeAmount)
        );
    }

    #[test]
    fn test_days_remaining_and_usage() {
        let discount = summer();
        assert_eq!(discount.days_remaining(d(2024, 8, 21)), 10);
        assert_eq!(discount.days_remaining(d(2024, 9, 10)), 0);
        assert_eq!(discount.usage_percentage(), 45.0);

        let mut unlimited = summer();
        unlimited.max_uses = 0;
        assert_eq!(unlimited.usage_percentage(), 0.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(summer().format_value(), "15%");
        let mut fixed = summer();
        fixed.discount_type = DiscountType::Fixed;
        fixed.discount_value = 100_000.0;
        assert_eq!(fixed.format_value(), "100.000 ₫");
    }

    #[test]
    fn test_form_validation() {
        let today = d(2024, 1, 31);
        let mut form = DiscountForm::new_default(today);
        assert_eq!(form.valid_to, d(2024, 2, 29));
        assert_eq!(form.max_uses, 100);
        assert!(form.validate().is_err());

        form.code = "  NEW  ".into();
        form.discount_value = 0.1;
        assert!(form.validate().is_ok());

        form.discount_value = 1.5;
        assert!(form.validate().is_err());
        form.discount_type = DiscountType::Fixed;
        assert!(form.validate().is_ok());

        form.valid_to = d(2024, 1, 1);
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_generate_request() {
        let mut request = GenerateDiscountsRequest::new_default(d(2024, 1, 1));
        assert_eq!(request.prefix, "PROMO");
        assert_eq!(request.count, 5);
        request.discount_value = 0.2;
        assert!(request.validate().is_ok());
        request.count = 101;
        assert!(request.validate().is_err());
        request.count = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"id":2,"code":"WELCOME","discountType":"FIXED","discountValue":100000,
            "validFrom":"2023-01-01","validTo":"2023-12-31","maxUses":1000,"usedCount":387,"valid":true}"#;
        let discount: Discount = serde_json::from_str(json).unwrap();
        assert_eq!(discount.discount_type, DiscountType::Fixed);
        assert_eq!(discount.valid_to, d(2023, 12, 31));

        let other: DiscountType = serde_json::from_str(r#""BOGO""#).unwrap();
        assert_eq!(other, DiscountType::Unknown("BOGO".into()));
        assert_eq!(serde_json::to_string(&DiscountType::Percent).unwrap(), r#""PERCENT""#);
    }
}
