use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::review::{Review as DomainReview, NewReview as DomainNewReview};
use crate::domain::types::{Rating, TypeConstraintError};

/// Diesel model representing the `reviews` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct Review {
    pub id: i32,
    pub booking_id: i32,
    pub provider_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Review`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview {
    pub booking_id: i32,
    pub provider_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Review> for DomainReview {
    type Error = TypeConstraintError;

    fn try_from(review: Review) -> Result<Self, Self::Error> {
        Ok(Self {
            id: review.id.try_into()?,
            booking_id: review.booking_id.try_into()?,
            provider_id: review.provider_id.try_into()?,
            user_id: review.user_id.try_into()?,
            rating: Rating::new(review.rating)?,
            comment: review.comment,
            created_at: review.created_at,
            updated_at: review.updated_at,
        })
    }
}

impl From<DomainNewReview> for NewReview {
    fn from(review: DomainNewReview) -> Self {
        Self {
            booking_id: review.booking_id.get(),
            provider_id: review.provider_id.get(),
            user_id: review.user_id.get(),
            rating: review.rating.get(),
            comment: review.comment,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}
