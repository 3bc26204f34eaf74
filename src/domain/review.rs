use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BookingId, ProviderId, Rating, ReviewId, UserId};

/// Customer review for a completed booking, one-to-one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub booking_id: BookingId,
    pub provider_id: ProviderId,
    pub user_id: UserId,
    pub rating: Rating,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Review`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewReview {
    pub booking_id: BookingId,
    pub provider_id: ProviderId,
    pub user_id: UserId,
    pub rating: Rating,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
