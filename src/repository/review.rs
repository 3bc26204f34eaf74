use diesel::prelude::*;

use crate::domain::review::{NewReview, Review};
use crate::domain::types::{BookingId, ProviderId};
use crate::models::review::{NewReview as DbNewReview, Review as DbReview};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ReviewReader, ReviewWriter};

impl ReviewReader for DieselRepository {
    fn get_review_by_booking(&self, booking_id: BookingId) -> RepositoryResult<Option<Review>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let review = reviews::table
            .filter(reviews::booking_id.eq(booking_id.get()))
            .first::<DbReview>(&mut conn)
            .optional()?;

        Ok(review.map(TryInto::try_into).transpose()?)
    }

    fn list_reviews_by_provider(&self, provider_id: ProviderId) -> RepositoryResult<Vec<Review>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let items = reviews::table
            .filter(reviews::provider_id.eq(provider_id.get()))
            .order(reviews::created_at.desc())
            .load::<DbReview>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Review>, _>>()?;

        Ok(items)
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let db_review: DbNewReview = review.clone().into();

        // One review per booking, enforced by the UNIQUE constraint.
        let inserted = diesel::insert_into(reviews::table)
            .values(db_review)
            .get_result::<DbReview>(&mut conn)?;

        Ok(inserted.try_into()?)
    }
}
