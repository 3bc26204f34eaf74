use chrono::Utc;
use diesel::prelude::*;

use crate::domain::provider::{NewProvider, Provider, rating_average};
use crate::domain::types::{BookingStatus, ProviderId, Rating, UserId, VerificationStatus};
use crate::models::provider::{NewProvider as DbNewProvider, Provider as DbProvider};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProviderReader, ProviderWriter};

impl ProviderReader for DieselRepository {
    fn get_provider_by_id(&self, id: ProviderId) -> RepositoryResult<Option<Provider>> {
        use crate::schema::providers;

        let mut conn = self.conn()?;

        let provider = providers::table
            .filter(providers::id.eq(id.get()))
            .first::<DbProvider>(&mut conn)
            .optional()?;

        Ok(provider.map(TryInto::try_into).transpose()?)
    }

    fn get_provider_by_user_id(&self, user_id: UserId) -> RepositoryResult<Option<Provider>> {
        use crate::schema::providers;

        let mut conn = self.conn()?;

        let provider = providers::table
            .filter(providers::user_id.eq(user_id.get()))
            .first::<DbProvider>(&mut conn)
            .optional()?;

        Ok(provider.map(TryInto::try_into).transpose()?)
    }

    fn list_providers(&self, verified_only: bool) -> RepositoryResult<Vec<Provider>> {
        use crate::schema::providers;

        let mut conn = self.conn()?;

        let mut query = providers::table.into_boxed::<diesel::sqlite::Sqlite>();
        if verified_only {
            query = query.filter(
                providers::verification_status.eq(VerificationStatus::Verified.as_str()),
            );
        }

        let items = query
            .order(providers::business_name.asc())
            .load::<DbProvider>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Provider>, _>>()?;

        Ok(items)
    }
}

impl ProviderWriter for DieselRepository {
    fn create_provider(&self, provider: &NewProvider) -> RepositoryResult<usize> {
        use crate::schema::providers;

        let mut conn = self.conn()?;
        let db_provider: DbNewProvider = provider.clone().into();

        let affected = diesel::insert_into(providers::table)
            .values(db_provider)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_verification_status(
        &self,
        id: ProviderId,
        status: VerificationStatus,
    ) -> RepositoryResult<usize> {
        use crate::schema::providers;

        let mut conn = self.conn()?;

        let verified_at = match status {
            VerificationStatus::Verified => Some(Utc::now().naive_utc()),
            _ => None,
        };

        let affected = diesel::update(providers::table.filter(providers::id.eq(id.get())))
            .set((
                providers::verification_status.eq(status.as_str()),
                providers::verified_at.eq(verified_at),
                providers::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn refresh_provider_aggregates(&self, id: ProviderId) -> RepositoryResult<()> {
        use crate::schema::{bookings, providers, reviews};

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let ratings = reviews::table
                .filter(reviews::provider_id.eq(id.get()))
                .select(reviews::rating)
                .load::<i32>(conn)?
                .into_iter()
                .map(Rating::new)
                .collect::<Result<Vec<Rating>, _>>()?;

            let completed = bookings::table
                .filter(bookings::provider_id.eq(id.get()))
                .filter(bookings::status.eq(BookingStatus::Completed.as_str()))
                .count()
                .get_result::<i64>(conn)?;

            diesel::update(providers::table.filter(providers::id.eq(id.get())))
                .set((
                    providers::average_rating.eq(rating_average(&ratings).to_string()),
                    providers::total_reviews.eq(ratings.len() as i32),
                    providers::total_bookings.eq(completed as i32),
                    providers::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

            Ok(())
        })
    }
}
