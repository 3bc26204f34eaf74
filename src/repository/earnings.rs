use chrono::Utc;
use diesel::prelude::*;

use crate::domain::earnings::{NewProviderEarnings, ProviderEarnings};
use crate::domain::types::{BookingId, EarningsId, PayoutStatus, ProviderId};
use crate::models::earnings::{
    NewProviderEarnings as DbNewProviderEarnings, ProviderEarnings as DbProviderEarnings,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, EarningsReader, EarningsWriter};

impl EarningsReader for DieselRepository {
    fn get_earnings_by_booking(
        &self,
        booking_id: BookingId,
    ) -> RepositoryResult<Option<ProviderEarnings>> {
        use crate::schema::provider_earnings;

        let mut conn = self.conn()?;

        let earnings = provider_earnings::table
            .filter(provider_earnings::booking_id.eq(booking_id.get()))
            .first::<DbProviderEarnings>(&mut conn)
            .optional()?;

        Ok(earnings.map(TryInto::try_into).transpose()?)
    }

    fn list_earnings_by_provider(
        &self,
        provider_id: ProviderId,
    ) -> RepositoryResult<Vec<ProviderEarnings>> {
        use crate::schema::provider_earnings;

        let mut conn = self.conn()?;

        let items = provider_earnings::table
            .filter(provider_earnings::provider_id.eq(provider_id.get()))
            .order(provider_earnings::created_at.desc())
            .load::<DbProviderEarnings>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<ProviderEarnings>, _>>()?;

        Ok(items)
    }
}

impl EarningsWriter for DieselRepository {
    fn create_earnings(
        &self,
        earnings: &NewProviderEarnings,
    ) -> RepositoryResult<ProviderEarnings> {
        use crate::schema::provider_earnings;

        let mut conn = self.conn()?;
        let db_earnings: DbNewProviderEarnings = earnings.clone().into();

        // booking_id and payment_id are both UNIQUE; a second derivation for
        // the same booking fails instead of silently updating.
        let inserted = diesel::insert_into(provider_earnings::table)
            .values(db_earnings)
            .get_result::<DbProviderEarnings>(&mut conn)?;

        Ok(inserted.try_into()?)
    }

    fn set_payout_status(&self, id: EarningsId, status: PayoutStatus) -> RepositoryResult<usize> {
        use crate::schema::provider_earnings;

        let mut conn = self.conn()?;

        let paid_at = match status {
            PayoutStatus::Paid => Some(Utc::now().naive_utc()),
            _ => None,
        };

        let affected =
            diesel::update(provider_earnings::table.filter(provider_earnings::id.eq(id.get())))
                .set((
                    provider_earnings::payout_status.eq(status.as_str()),
                    provider_earnings::paid_at.eq(paid_at),
                ))
                .execute(&mut conn)?;

        Ok(affected)
    }
}
