use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shared::error::ApiError;
use crate::shared::severity::Severity;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewStatus {
    Pending,
    Replied,
    Hidden,
    Unknown(String),
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 3] = [
        ReviewStatus::Replied,
        ReviewStatus::Pending,
        ReviewStatus::Hidden,
    ];

    pub fn code(&self) -> &str {
        match self {
            ReviewStatus::Pending => "PENDING",
            ReviewStatus::Replied => "REPLIED",
            ReviewStatus::Hidden => "HIDDEN",
            ReviewStatus::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ReviewStatus::Pending => "Under review",
            ReviewStatus::Replied => "Replied",
            ReviewStatus::Hidden => "Hidden",
            ReviewStatus::Unknown(raw) => raw,
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            ReviewStatus::Replied => Some(Severity::Success),
            ReviewStatus::Pending => Some(Severity::Warning),
            ReviewStatus::Hidden => Some(Severity::Danger),
            ReviewStatus::Unknown(_) => None,
        }
    }
}

impl From<String> for ReviewStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => ReviewStatus::Pending,
            "REPLIED" => ReviewStatus::Replied,
            "HIDDEN" => ReviewStatus::Hidden,
            _ => ReviewStatus::Unknown(raw),
        }
    }
}

impl From<ReviewStatus> for String {
    fn from(value: ReviewStatus) -> Self {
        value.code().to_string()
    }
}

/// Badge weight for an overall or average rating.
pub fn rating_severity(rating: f64) -> Severity {
    if rating >= 4.5 {
        Severity::Success
    } else if rating >= 3.5 {
        Severity::Info
    } else if rating >= 2.5 {
        Severity::Warning
    } else {
        Severity::Danger
    }
}

// ============================================================================
// Aggregate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub booking_id: Option<i64>,
    #[serde(default)]
    pub guest_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub room_type: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub cleanliness: u8,
    #[serde(default)]
    pub service: u8,
    #[serde(default)]
    pub comfort: u8,
    #[serde(default)]
    pub location: u8,
    #[serde(default)]
    pub facilities: u8,
    #[serde(default)]
    pub value_for_money: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_anonymous: bool,
    pub status: ReviewStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub reply_comment: Option<String>,
    #[serde(default)]
    pub reply_date: Option<String>,
    #[serde(default)]
    pub reply_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Review {
    /// Name shown next to the review; anonymous reviews hide the guest.
    pub fn guest_display_name(&self) -> String {
        if self.is_anonymous {
            return "Anonymous guest".to_string();
        }
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.guest_name)
            .to_string()
    }

    pub fn has_reply(&self) -> bool {
        self.reply_comment
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }

    /// Case-insensitive match on guest, room, booking id and comment.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let booking = self.booking_id.map(|id| id.to_string()).unwrap_or_default();
        [
            self.guest_name.as_str(),
            self.display_name.as_deref().unwrap_or(""),
            booking.as_str(),
            self.room_number.as_str(),
            self.room_type.as_str(),
            self.comment.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Create/update payload. Moderation fields are only sent for existing
/// reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    #[serde(skip)]
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub booking_id: Option<i64>,
    #[serde(skip)]
    pub guest_name: String,
    #[serde(skip)]
    pub room_number: String,
    #[serde(skip)]
    pub room_type: String,
    pub rating: u8,
    pub cleanliness: u8,
    pub service: u8,
    pub comfort: u8,
    pub location: u8,
    pub facilities: u8,
    pub value_for_money: u8,
    pub comment: String,
    pub is_anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_by: Option<String>,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self {
            id: None,
            user_id: None,
            booking_id: None,
            guest_name: String::new(),
            room_number: String::new(),
            room_type: String::new(),
            rating: 5,
            cleanliness: 5,
            service: 4,
            comfort: 5,
            location: 4,
            facilities: 5,
            value_for_money: 4,
            comment: String::new(),
            is_anonymous: false,
            status: None,
            is_featured: None,
            reply_comment: None,
            reply_date: None,
            reply_by: None,
        }
    }
}

impl ReviewForm {
    pub fn from_review(review: &Review) -> Self {
        Self {
            id: Some(review.id),
            user_id: review.user_id,
            booking_id: review.booking_id,
            guest_name: review.guest_name.clone(),
            room_number: review.room_number.clone(),
            room_type: review.room_type.clone(),
            rating: review.rating.round().clamp(0.0, 5.0) as u8,
            cleanliness: review.cleanliness,
            service: review.service,
            comfort: review.comfort,
            location: review.location,
            facilities: review.facilities,
            value_for_money: review.value_for_money,
            comment: review.comment.clone(),
            is_anonymous: review.is_anonymous,
            status: Some(review.status.clone()),
            is_featured: Some(review.is_featured),
            reply_comment: review.reply_comment.clone(),
            reply_date: review.reply_date.clone(),
            reply_by: review.reply_by.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    fn scores(&self) -> [(&'static str, u8); 7] {
        [
            ("Rating", self.rating),
            ("Cleanliness", self.cleanliness),
            ("Service", self.service),
            ("Comfort", self.comfort),
            ("Location", self.location),
            ("Facilities", self.facilities),
            ("Value for money", self.value_for_money),
        ]
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.user_id.is_none() {
            return Err(ApiError::Validation("User ID is required".into()));
        }
        if self.booking_id.is_none() {
            return Err(ApiError::Validation("Booking ID is required".into()));
        }
        if self.comment.trim().is_empty() {
            return Err(ApiError::Validation("Comment is required".into()));
        }
        for (name, score) in self.scores() {
            if !(1..=5).contains(&score) {
                return Err(ApiError::Validation(format!(
                    "{} must be between 1 and 5",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Body of `POST /reviews/{id}/reply`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub reply_comment: String,
    pub reply_by: String,
}

impl ReplyRequest {
    pub fn new(reply_comment: impl Into<String>, reply_by: impl Into<String>) -> Self {
        Self {
            reply_comment: reply_comment.into(),
            reply_by: reply_by.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.reply_comment.trim().is_empty() {
            return Err(ApiError::Validation("Reply must not be empty".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// `GET /reviews/statistics`. The server may omit any field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewStatistics {
    pub total_reviews: u64,
    pub average_rating: f64,
    pub average_cleanliness: f64,
    pub average_service: f64,
    pub average_comfort: f64,
    pub average_location: f64,
    pub average_facilities: f64,
    pub average_value_for_money: f64,
    pub replied_count: u64,
    pub pending_count: u64,
    pub hidden_count: u64,
    pub rating_distribution: BTreeMap<String, u64>,
}

/// Summary computed locally from the loaded list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewSummary {
    pub count: usize,
    pub average_rating: f64,
    /// Index 0 holds one-star reviews, index 4 five-star ones.
    pub stars: [usize; 5],
    pub replied: usize,
    pub pending: usize,
    pub hidden: usize,
}

impl ReviewSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut summary = ReviewSummary {
            count: reviews.len(),
            ..Default::default()
        };
        if reviews.is_empty() {
            return summary;
        }
        let mut sum = 0.0;
        for review in reviews {
            sum += review.rating;
            let star = review.rating.round().clamp(1.0, 5.0) as usize;
            summary.stars[star - 1] += 1;
            match review.status {
                ReviewStatus::Replied => summary.replied += 1,
                ReviewStatus::Pending => summary.pending += 1,
                ReviewStatus::Hidden => summary.hidden += 1,
                ReviewStatus::Unknown(_) => {}
            }
        }
        summary.average_rating = sum / reviews.len() as f64;
        summary
    }

    pub fn star_share(&self, star: usize) -> f64 {
        if self.count == 0 || !(1..=5).contains(&star) {
            return 0.0;
        }
        self.stars[star - 1] as f64 / self.count as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: i64, rating: f64, status: &str) -> Review {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "userId": 4,
            "bookingId": 12,
            "guestName": "Pham C",
            "roomNumber": "204",
            "roomType": "DELUXE",
            "rating": rating,
            "comment": "Clean room, friendly staff",
            "status": status
        }))
        .unwrap()
    }

    #[test]
    fn test_rating_severity_thresholds() {
        assert_eq!(rating_severity(5.0), Severity::Success);
        assert_eq!(rating_severity(4.5), Severity::Success);
        assert_eq!(rating_severity(4.49), Severity::Info);
        assert_eq!(rating_severity(3.5), Severity::Info);
        assert_eq!(rating_severity(2.5), Severity::Warning);
        assert_eq!(rating_severity(2.4), Severity::Danger);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ReviewStatus::Replied.severity(), Some(Severity::Success));
        assert_eq!(ReviewStatus::Hidden.severity(), Some(Severity::Danger));
        assert_eq!(ReviewStatus::from("SPAM".to_string()).label(), "SPAM");
    }

    #[test]
    fn test_display_name() {
        let mut r = review(1, 5.0, "PENDING");
        assert_eq!(r.guest_display_name(), "Pham C");
        r.display_name = Some("C.".into());
        assert_eq!(r.guest_display_name(), "C.");
        r.is_anonymous = true;
        assert_eq!(r.guest_display_name(), "Anonymous guest");
    }

    #[test]
    fn test_matches() {
        let r = review(1, 5.0, "PENDING");
        assert!(r.matches("friendly"));
        assert!(r.matches("deluxe"));
        assert!(r.matches("12"));
        assert!(!r.matches("suite"));
        assert!(r.matches("  "));
    }

    #[test]
    fn test_new_form_omits_moderation_fields() {
        let mut form = ReviewForm {
            user_id: Some(1),
            booking_id: Some(2),
            comment: "Nice".into(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("status").is_none());
        assert!(json.get("replyComment").is_none());
        assert!(json.get("guestName").is_none());
        assert_eq!(json["valueForMoney"], 4);

        form.cleanliness = 6;
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_edit_form_carries_moderation_fields() {
        let form = ReviewForm::from_review(&review(3, 4.0, "REPLIED"));
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["status"], "REPLIED");
        assert_eq!(json["isFeatured"], false);
    }

    #[test]
    fn test_form_requires_ids_and_comment() {
        let form = ReviewForm::default();
        assert!(matches!(form.validate(), Err(ApiError::Validation(_))));
        assert!(ReplyRequest::new("  ", "Admin").validate().is_err());
        assert!(ReplyRequest::new("Thanks!", "Admin").validate().is_ok());
    }

    #[test]
    fn test_summary() {
        let reviews = vec![
            review(1, 5.0, "REPLIED"),
            review(2, 4.0, "PENDING"),
            review(3, 1.0, "HIDDEN"),
            review(4, 4.0, "PENDING"),
        ];
        let summary = ReviewSummary::from_reviews(&reviews);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.average_rating, 3.5);
        assert_eq!(summary.stars, [1, 0, 0, 2, 1]);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.star_share(4), 50.0);
        assert_eq!(ReviewSummary::from_reviews(&[]).average_rating, 0.0);
    }

    #[test]
    fn test_statistics_tolerates_missing_fields() {
        let stats: ReviewStatistics = serde_json::from_str(r#"{"totalReviews": 10}"#).unwrap();
        assert_eq!(stats.total_reviews, 10);
        assert_eq!(stats.average_rating, 0.0);
    }
}
