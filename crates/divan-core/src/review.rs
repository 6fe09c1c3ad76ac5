use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ProductId, RecordId, UserId};
use crate::serde_helpers::{
    lenient_f64, lenient_optional, lenient_record_id, lenient_string, lenient_timestamp,
};
use crate::validation::{required, ValidationError};

pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(
        default,
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Blank when the record has none.
    #[serde(default, deserialize_with = "lenient_record_id")]
    pub product_id: ProductId,
    /// Blank when the record has none.
    #[serde(default, deserialize_with = "lenient_record_id")]
    pub user_id: UserId,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Who wrote a review, as far as the users endpoint could tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    Named(String),
    /// The user record was missing, unreadable, or had neither name nor email.
    Anonymous,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::Named(name) => f.write_str(name),
            Author::Anonymous => f.write_str("anonymous"),
        }
    }
}

/// A review paired with its resolved author.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewWithAuthor {
    pub review: Review,
    pub author: Author,
}

/// Review form input.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: f64,
    pub text: String,
}

impl ReviewDraft {
    /// # Errors
    ///
    /// - [`ValidationError::RatingOutOfRange`] unless `0 <= rating <= 5`.
    /// - [`ValidationError::MissingField`] for blank text or ids.
    pub fn into_review(self, now: DateTime<Utc>) -> Result<Review, ValidationError> {
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        required("productId", self.product_id.as_str())?;
        required("userId", self.user_id.as_str())?;
        let text = required("text", &self.text)?.to_owned();

        Ok(Review {
            id: None,
            product_id: self.product_id,
            user_id: self.user_id,
            rating: self.rating,
            text,
            created_at: Some(now),
        })
    }
}

/// Mean rating across `reviews`, or `None` when there are none.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: f64 = reviews.iter().map(|r| r.rating).sum();
    #[allow(clippy::cast_precision_loss)]
    let count = reviews.len() as f64;
    Some(sum / count)
}

/// Reviews for one product, newest first. Undated reviews go last.
#[must_use]
pub fn reviews_for<'a>(reviews: &'a [Review], product_id: &ProductId) -> Vec<&'a Review> {
    let mut matching: Vec<&Review> = reviews
        .iter()
        .filter(|r| !r.product_id.is_blank() && &r.product_id == product_id)
        .collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn review(product: &str, rating: f64, day: Option<u32>) -> Review {
        Review {
            id: None,
            product_id: RecordId::from(product),
            user_id: RecordId::from("u"),
            rating,
            text: "ok".to_owned(),
            created_at: day.map(|d| Utc.with_ymd_and_hms(2025, 3, d, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn average_is_mean_of_ratings() {
        let reviews = [review("p", 4.0, None), review("p", 5.0, None), review("p", 3.0, None)];
        assert_eq!(average_rating(&reviews), Some(4.0));
    }

    #[test]
    fn average_of_nothing_is_none() {
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn reviews_for_filters_and_sorts_newest_first() {
        let reviews = [
            review("p", 1.0, Some(1)),
            review("q", 2.0, Some(5)),
            review("p", 3.0, None),
            review("p", 4.0, Some(9)),
        ];
        let ratings: Vec<f64> = reviews_for(&reviews, &RecordId::from("p"))
            .iter()
            .map(|r| r.rating)
            .collect();
        assert_eq!(ratings, [4.0, 1.0, 3.0]);
    }

    #[test]
    fn records_missing_ids_still_decode() {
        let reviews: Vec<Review> = serde_json::from_value(serde_json::json!([
            { "id": "r1", "productId": "p", "userId": "u", "rating": "4", "text": null },
            { "id": "r2", "rating": 5 }
        ]))
        .unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].text, "");
        assert!(reviews[1].product_id.is_blank());
        assert!(reviews[1].user_id.is_blank());
        assert_eq!(reviews_for(&reviews, &RecordId::default()).len(), 0);
        assert_eq!(reviews_for(&reviews, &RecordId::from("p")).len(), 1);
    }

    #[test]
    fn draft_rejects_rating_above_five() {
        let draft = ReviewDraft {
            product_id: RecordId::from("p"),
            user_id: RecordId::from("u"),
            rating: 5.5,
            text: "great".to_owned(),
        };
        assert_eq!(
            draft.into_review(Utc::now()).unwrap_err(),
            ValidationError::RatingOutOfRange(5.5)
        );
    }

    #[test]
    fn draft_rejects_blank_text() {
        let draft = ReviewDraft {
            product_id: RecordId::from("p"),
            user_id: RecordId::from("u"),
            rating: 4.0,
            text: "   ".to_owned(),
        };
        assert_eq!(
            draft.into_review(Utc::now()).unwrap_err(),
            ValidationError::MissingField("text")
        );
    }
}
