//! Review Aggregate

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use crate::domain::events::{DomainEvent, ReviewEvent};
use crate::domain::value_objects::Rating;

pub const MIN_COMMENT_LEN: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A review together with the reviewer's display name.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    pub author: Option<String>,
}

impl Review {
    /// Posting is only allowed once the caller holds a verified purchase of the product.
    pub fn post(user_id: Uuid, product_id: Uuid, verified_purchase: bool, rating: i32, comment: &str) -> Result<(Self, DomainEvent), ReviewError> {
        if !verified_purchase { return Err(ReviewError::NotPurchased); }
        let rating = Rating::new(rating).map_err(|_| ReviewError::InvalidRating(rating))?;
        let comment = comment.trim();
        if comment.chars().count() < MIN_COMMENT_LEN { return Err(ReviewError::CommentTooShort); }
        let review = Self { id: Uuid::now_v7(), user_id, product_id, rating, comment: comment.to_string(), created_at: Utc::now() };
        let event = DomainEvent::Review(ReviewEvent::Posted { review_id: review.id, product_id, rating: rating.value() });
        Ok((review, event))
    }
}

/// Mean star rating, 0 when there are no reviews.
pub fn average_rating<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> f64 {
    let (sum, count) = reviews.into_iter().fold((0u32, 0u32), |(s, c), r| (s + u32::from(r.rating.value()), c + 1));
    if count == 0 { 0.0 } else { f64::from(sum) / f64::from(count) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("You must purchase this product to review it.")]
    NotPurchased,
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),
    #[error("Please write a longer comment")]
    CommentTooShort,
}
