use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::a002_discount::DiscountType;
use crate::shared::dates::{iso_date, iso_date_opt};
use crate::shared::error::ApiError;
use crate::shared::export::Exportable;
use crate::shared::format::{format_currency, format_date, format_naive_date};
use crate::shared::severity::Severity;
use crate::system::access::Permission;

// ============================================================================
// Status enums
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    Unknown(String),
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
        BookingStatus::Cancelled,
    ];

    pub fn code(&self) -> &str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::CheckedIn => "CHECKED_IN",
            BookingStatus::CheckedOut => "CHECKED_OUT",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::CheckedIn => "Checked in",
            BookingStatus::CheckedOut => "Checked out",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Unknown(raw) => raw,
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            BookingStatus::Pending => Some(Severity::Warning),
            BookingStatus::Confirmed => Some(Severity::Info),
            BookingStatus::CheckedIn | BookingStatus::CheckedOut => Some(Severity::Success),
            BookingStatus::Cancelled => Some(Severity::Danger),
            BookingStatus::Unknown(_) => None,
        }
    }

    /// Statuses reachable in one step.
    pub fn next_statuses(&self) -> Vec<BookingStatus> {
        match self {
            BookingStatus::Pending => vec![BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed => vec![BookingStatus::CheckedIn, BookingStatus::Cancelled],
            BookingStatus::CheckedIn => vec![BookingStatus::CheckedOut],
            _ => Vec::new(),
        }
    }

    pub fn can_transition_to(&self, next: &BookingStatus) -> bool {
        self.next_statuses().contains(next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::CheckedOut | BookingStatus::Cancelled)
    }
}

impl From<String> for BookingStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => BookingStatus::Pending,
            "CONFIRMED" => BookingStatus::Confirmed,
            "CHECKED_IN" => BookingStatus::CheckedIn,
            "CHECKED_OUT" => BookingStatus::CheckedOut,
            "CANCELLED" => BookingStatus::Cancelled,
            _ => BookingStatus::Unknown(raw),
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Unknown(String::new())
    }
}

impl From<BookingStatus> for String {
    fn from(value: BookingStatus) -> Self {
        value.code().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
    Unknown(String),
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Unpaid,
        PaymentStatus::Paid,
        PaymentStatus::Refunded,
    ];

    pub fn code(&self) -> &str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Refunded => "REFUNDED",
            PaymentStatus::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Refunded => "Refunded",
            PaymentStatus::Unknown(raw) => raw,
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            PaymentStatus::Paid => Some(Severity::Success),
            PaymentStatus::Unpaid => Some(Severity::Warning),
            PaymentStatus::Refunded => Some(Severity::Info),
            PaymentStatus::Unknown(_) => None,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "UNPAID" => PaymentStatus::Unpaid,
            "PAID" => PaymentStatus::Paid,
            "REFUNDED" => PaymentStatus::Refunded,
            _ => PaymentStatus::Unknown(raw),
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Unknown(String::new())
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        value.code().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    CreditCard,
    Vnpay,
    Cash,
    BankTransfer,
    Unknown(String),
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Vnpay,
        PaymentMethod::Cash,
        PaymentMethod::BankTransfer,
    ];

    pub fn code(&self) -> &str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::Vnpay => "VNPAY",
            PaymentMethod::Cash => "CASH",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::Vnpay => "VNPay",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::Unknown(raw) => raw,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "CREDIT_CARD" => PaymentMethod::CreditCard,
            "VNPAY" => PaymentMethod::Vnpay,
            "CASH" => PaymentMethod::Cash,
            "BANK_TRANSFER" => PaymentMethod::BankTransfer,
            _ => PaymentMethod::Unknown(raw),
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        value.code().to_string()
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// A room line of a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRoom {
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub room_type: String,
    #[serde(default)]
    pub price: Option<f64>,
}

impl BookedRoom {
    /// `101 (DELUXE)`
    pub fn display(&self) -> String {
        format!("{} ({})", self.room_number, self.room_type)
    }
}

/// Hotel room reservation with its status and payment lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(with = "iso_date")]
    pub check_in_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub check_out_date: NaiveDate,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub final_price: f64,
    #[serde(default)]
    pub discount_code: Option<String>,
    #[serde(default)]
    pub discount_type: Option<DiscountType>,
    #[serde(default)]
    pub discount_value: Option<f64>,
    #[serde(default)]
    pub rooms: Vec<BookedRoom>,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Above this magnitude a stored `finalPrice` is treated as corrupt.
pub const MAX_SANE_PRICE: f64 = 1e9;

impl Booking {
    /// `"101 (DELUXE), 102 (SUITE)"`, or `"No rooms"`.
    pub fn rooms_display(&self) -> String {
        if self.rooms.is_empty() {
            return "No rooms".to_string();
        }
        self.rooms
            .iter()
            .map(BookedRoom::display)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Amount this booking contributes to revenue once settled.
    ///
    /// `finalPrice` is used unless it is negative or implausibly large, in
    /// which case it is recomputed from `totalPrice` and the discount.
    pub fn revenue_amount(&self) -> f64 {
        let price = self.final_price;
        if price >= 0.0 && price.abs() <= MAX_SANE_PRICE {
            return price;
        }
        match (&self.discount_type, self.discount_value) {
            (Some(DiscountType::Percent), Some(value)) if value != 0.0 => {
                self.total_price * (1.0 - value)
            }
            (Some(DiscountType::Fixed), Some(value)) if value != 0.0 => self.total_price - value,
            _ => self.total_price,
        }
    }

    /// Checked out and paid.
    pub fn counts_as_revenue(&self) -> bool {
        self.status == BookingStatus::CheckedOut && self.payment_status == PaymentStatus::Paid
    }

    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days().max(0)
    }
}

impl Exportable for Booking {
    fn headers() -> Vec<&'static str> {
        vec![
            "Booking ID",
            "Guest",
            "Phone",
            "Rooms",
            "Check-in",
            "Check-out",
            "Status",
            "Total",
            "Payment",
            "Created",
        ]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name.clone(),
            self.phone.clone(),
            self.rooms_display(),
            format_naive_date(self.check_in_date),
            format_naive_date(self.check_out_date),
            self.status.label().to_string(),
            format_currency(self.final_price).replace('₫', "VND"),
            self.payment_status.label().to_string(),
            self.created_at.as_deref().map(format_date).unwrap_or_default(),
        ]
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Status-changing operations offered on a booking row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    Cancel,
    CheckIn,
    CheckOut,
}

impl BookingAction {
    pub fn label(&self) -> &'static str {
        match self {
            BookingAction::Confirm => "Confirm",
            BookingAction::Cancel => "Cancel",
            BookingAction::CheckIn => "Check in",
            BookingAction::CheckOut => "Check out",
        }
    }

    pub fn target_status(&self) -> BookingStatus {
        match self {
            BookingAction::Confirm => BookingStatus::Confirmed,
            BookingAction::Cancel => BookingStatus::Cancelled,
            BookingAction::CheckIn => BookingStatus::CheckedIn,
            BookingAction::CheckOut => BookingStatus::CheckedOut,
        }
    }

    pub fn required_permission(&self) -> Permission {
        match self {
            BookingAction::Confirm => Permission::Confirm,
            BookingAction::Cancel => Permission::Cancel,
            BookingAction::CheckIn => Permission::CheckIn,
            BookingAction::CheckOut => Permission::CheckOut,
        }
    }

    pub fn is_allowed_from(&self, status: &BookingStatus) -> bool {
        status.can_transition_to(&self.target_status())
    }
}

// ============================================================================
// Form
// ============================================================================

/// Create/update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "iso_date_opt")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(with = "iso_date_opt")]
    pub check_out_date: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub room_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl BookingForm {
    /// Check-in today, check-out tomorrow, pending and unpaid.
    pub fn new_default(today: NaiveDate) -> Self {
        Self {
            id: None,
            user_id: None,
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            check_in_date: Some(today),
            check_out_date: Some(today + Duration::days(1)),
            status: Some(BookingStatus::Pending),
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            room_ids: Vec::new(),
            discount_code: None,
            special_requests: None,
        }
    }

    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            id: Some(booking.id),
            user_id: booking.user_id,
            full_name: booking.full_name.clone(),
            email: booking.email.clone(),
            phone: booking.phone.clone(),
            check_in_date: Some(booking.check_in_date),
            check_out_date: Some(booking.check_out_date),
            status: Some(booking.status.clone()),
            payment_status: booking.payment_status.clone(),
            payment_method: booking.payment_method.clone(),
            room_ids: booking.rooms.iter().filter_map(|r| r.room_id).collect(),
            discount_code: booking.discount_code.clone(),
            special_requests: booking.special_requests.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let (check_in, check_out) = match (self.check_in_date, self.check_out_date) {
            (Some(i), Some(o)) => (i, o),
            _ => {
                return Err(ApiError::Validation(
                    "Check-in and check-out dates are required".into(),
                ))
            }
        };
        if self.status.is_none() {
            return Err(ApiError::Validation("Status is required".into()));
        }
        if check_out <= check_in {
            return Err(ApiError::Validation(
                "Check-out must be after check-in".into(),
            ));
        }
        if self.full_name.trim().is_empty() {
            return Err(ApiError::Validation("Guest name is required".into()));
        }
        if self.email.trim().is_empty() {
            return Err(ApiError::Validation("Email is required".into()));
        }
        if self.phone.trim().is_empty() {
            return Err(ApiError::Validation("Phone is required".into()));
        }
        if !self.is_edit() && self.room_ids.is_empty() {
            return Err(ApiError::Validation("Select at least one room".into()));
        }
        Ok(())
    }

    /// Copy of the form with the status replaced, for lifecycle updates.
    pub fn with_status(&self, status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            ..self.clone()
        }
    }
}

/// Update payload moving a stored booking to `status`. Only the lifecycle is
/// checked; the stored guest fields are sent back as they are.
pub fn status_change(booking: &Booking, status: BookingStatus) -> Result<BookingForm, ApiError> {
    if !booking.status.can_transition_to(&status) {
        return Err(ApiError::Validation(format!(
            "A {} booking cannot become {}",
            booking.status.label(),
            status.label()
        )));
    }
    Ok(BookingForm::from_booking(booking).with_status(status))
}

/// Selected ids whose booking can still be cancelled, plus how many were
/// skipped (settled, already cancelled, or no longer listed).
pub fn cancellable_ids(bookings: &[Booking], selected: &[i64]) -> (Vec<i64>, usize) {
    let mut ids: Vec<i64> = bookings
        .iter()
        .filter(|b| selected.contains(&b.id))
        .filter(|b| b.status.can_transition_to(&BookingStatus::Cancelled))
        .map(|b| b.id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    (ids.clone(), selected.len().saturating_sub(ids.len()))
}

// ============================================================================
// Queries
// ============================================================================

/// `GET /bookings/search` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingSearch {
    CustomerName(String),
    Phone(String),
}

impl BookingSearch {
    /// Digits (with optional `+`, spaces or dashes) search by phone,
    /// anything else by customer name. Blank input yields `None`.
    pub fn detect(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let looks_like_phone = trimmed.chars().any(|c| c.is_ascii_digit())
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '.'));
        if looks_like_phone {
            Some(BookingSearch::Phone(trimmed.to_string()))
        } else {
            Some(BookingSearch::CustomerName(trimmed.to_string()))
        }
    }

    pub fn to_query(&self) -> String {
        match self {
            BookingSearch::CustomerName(name) => {
                format!("customerName={}", urlencoding::encode(name))
            }
            BookingSearch::Phone(phone) => format!("phone={}", urlencoding::encode(phone)),
        }
    }
}

/// `GET /bookings/date-range` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDateRange {
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
}

impl BookingDateRange {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.start_date > self.end_date {
            return Err(ApiError::Validation(
                "Start date must not be after end date".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample() -> Booking {
        serde_json::from_str(
            r#"{
                "id": 7,
                "userId": 3,
                "fullName": "Tran Thi B",
                "email": "b@example.com",
                "phone": "0912345678",
                "checkInDate": "2024-03-05",
                "checkOutDate": "2024-03-07T00:00:00",
                "status": "CONFIRMED",
                "paymentStatus": "PAID",
                "paymentMethod": "VNPAY",
                "totalPrice": 2000000,
                "finalPrice": 1800000,
                "discountCode": "SPRING",
                "discountType": "PERCENT",
                "discountValue": 0.1,
                "rooms": [
                    {"roomId": 1, "roomNumber": "101", "roomType": "DELUXE", "price": 1000000},
                    {"roomId": 2, "roomNumber": "102", "roomType": "SUITE"}
                ],
                "createdAt": "2024-03-01T09:15:00"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_decode_booking() {
        let booking = sample();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_method, Some(PaymentMethod::Vnpay));
        assert_eq!(booking.check_out_date, d(2024, 3, 7));
        assert_eq!(booking.nights(), 2);
        assert_eq!(booking.rooms_display(), "101 (DELUXE), 102 (SUITE)");
    }

    #[test]
    fn test_missing_statuses_decode_as_unknown() {
        let booking: Booking = serde_json::from_str(
            r#"{"id": 8, "checkInDate": "2024-03-05", "checkOutDate": "2024-03-06"}"#,
        )
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Unknown(String::new()));
        assert_eq!(booking.payment_status, PaymentStatus::Unknown(String::new()));
        assert!(!booking.status.can_transition_to(&BookingStatus::Cancelled));
    }

    fn with_status(id: i64, status: BookingStatus) -> Booking {
        Booking {
            id,
            status,
            ..sample()
        }
    }

    #[test]
    fn test_cancellable_ids_skip_settled_bookings() {
        let bookings = vec![
            with_status(1, BookingStatus::Pending),
            with_status(2, BookingStatus::Confirmed),
            with_status(3, BookingStatus::CheckedIn),
            with_status(4, BookingStatus::CheckedOut),
            with_status(5, BookingStatus::Cancelled),
        ];
        let (ids, skipped) = cancellable_ids(&bookings, &[5, 4, 3, 2, 1, 99]);
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(skipped, 4);
        assert_eq!(cancellable_ids(&bookings, &[]), (Vec::new(), 0));
    }

    #[test]
    fn test_status_change_ignores_guest_fields() {
        let mut booking = with_status(7, BookingStatus::Confirmed);
        booking.phone = String::new();
        booking.email = String::new();
        let form = status_change(&booking, BookingStatus::CheckedIn).unwrap();
        assert_eq!(form.id, Some(7));
        assert_eq!(form.status, Some(BookingStatus::CheckedIn));
        assert!(form.validate().is_err());

        let err = status_change(&booking, BookingStatus::CheckedOut).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_unknown_status_keeps_marker() {
        let status = BookingStatus::from("NO_SHOW".to_string());
        assert_eq!(status.label(), "NO_SHOW");
        assert_eq!(status.severity(), None);
        assert_eq!(String::from(status), "NO_SHOW");
    }

    #[test]
    fn test_severities() {
        assert_eq!(BookingStatus::Pending.severity(), Some(Severity::Warning));
        assert_eq!(BookingStatus::Confirmed.severity(), Some(Severity::Info));
        assert_eq!(BookingStatus::CheckedOut.severity(), Some(Severity::Success));
        assert_eq!(BookingStatus::Cancelled.severity(), Some(Severity::Danger));
        assert_eq!(PaymentStatus::Refunded.severity(), Some(Severity::Info));
        assert_eq!(PaymentStatus::Unpaid.severity(), Some(Severity::Warning));
    }

    #[test]
    fn test_lifecycle() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(&Confirmed));
        assert!(Pending.can_transition_to(&Cancelled));
        assert!(!Pending.can_transition_to(&CheckedIn));
        assert!(Confirmed.can_transition_to(&CheckedIn));
        assert!(CheckedIn.can_transition_to(&CheckedOut));
        assert!(!CheckedIn.can_transition_to(&Cancelled));
        assert!(CheckedOut.next_statuses().is_empty());
        assert!(Cancelled.is_terminal());
        assert!(!Unknown("X".into()).can_transition_to(&Confirmed));

        assert!(BookingAction::CheckIn.is_allowed_from(&Confirmed));
        assert!(!BookingAction::Confirm.is_allowed_from(&Confirmed));
    }

    #[test]
    fn test_revenue_amount_fallbacks() {
        let mut booking = sample();
        assert_eq!(booking.revenue_amount(), 1_800_000.0);

        booking.final_price = -5.0;
        assert!((booking.revenue_amount() - 1_800_000.0).abs() < 1e-6);

        booking.final_price = 3e12;
        booking.discount_type = Some(DiscountType::Fixed);
        booking.discount_value = Some(500_000.0);
        assert_eq!(booking.revenue_amount(), 1_500_000.0);

        booking.discount_type = None;
        assert_eq!(booking.revenue_amount(), 2_000_000.0);
    }

    #[test]
    fn test_export_row() {
        let row = sample().to_row();
        assert_eq!(row.len(), Booking::headers().len());
        assert_eq!(row[3], "101 (DELUXE), 102 (SUITE)");
        assert_eq!(row[4], "05/03/2024");
        assert_eq!(row[7], "1.800.000 VND");
        assert_eq!(row[9], "01/03/2024");

        let mut empty = sample();
        empty.rooms.clear();
        assert_eq!(empty.to_row()[3], "No rooms");
    }

    #[test]
    fn test_form_defaults_and_validation() {
        let today = d(2024, 3, 5);
        let mut form = BookingForm::new_default(today);
        assert_eq!(form.check_out_date, Some(d(2024, 3, 6)));
        assert_eq!(form.status, Some(BookingStatus::Pending));
        assert_eq!(form.payment_status, PaymentStatus::Unpaid);
        assert!(form.validate().is_err());

        form.full_name = "Guest".into();
        form.email = "g@example.com".into();
        form.phone = "0900000000".into();
        assert!(matches!(form.validate(), Err(ApiError::Validation(m)) if m.contains("room")));
        form.room_ids.push(1);
        assert!(form.validate().is_ok());

        form.check_out_date = Some(today);
        assert!(form.validate().is_err());
        form.check_out_date = None;
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_edit_form_does_not_need_rooms() {
        let mut booking = sample();
        booking.rooms.clear();
        let form = BookingForm::from_booking(&booking);
        assert!(form.is_edit());
        assert!(form.validate().is_ok());

        let json = serde_json::to_value(form.with_status(BookingStatus::CheckedIn)).unwrap();
        assert_eq!(json["status"], "CHECKED_IN");
        assert_eq!(json["checkInDate"], "2024-03-05");
    }

    #[test]
    fn test_search_detection() {
        assert_eq!(
            BookingSearch::detect(" 0912 345 678 "),
            Some(BookingSearch::Phone("0912 345 678".into()))
        );
        assert_eq!(
            BookingSearch::detect("Nguyễn A"),
            Some(BookingSearch::CustomerName("Nguyễn A".into()))
        );
        assert_eq!(BookingSearch::detect("   "), None);
        assert_eq!(
            BookingSearch::CustomerName("Le Van".into()).to_query(),
            "customerName=Le%20Van"
        );
    }

    #[test]
    fn test_date_range_query() {
        let range = BookingDateRange {
            start_date: d(2024, 1, 1),
            end_date: d(2024, 1, 31),
        };
        assert!(range.validate().is_ok());
        let json = serde_json::to_value(range).unwrap();
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["endDate"], "2024-01-31");

        let reversed = BookingDateRange {
            start_date: range.end_date,
            end_date: range.start_date,
        };
        assert!(reversed.validate().is_err());
    }
}
