use chrono::Utc;
use diesel::prelude::*;

use crate::domain::payment::{NewPayment, Payment};
use crate::domain::types::{BookingId, Money, PaymentId, PaymentStatus};
use crate::models::payment::{NewPayment as DbNewPayment, Payment as DbPayment};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, PaymentReader, PaymentWriter};

impl PaymentReader for DieselRepository {
    fn get_payment_by_booking(&self, booking_id: BookingId) -> RepositoryResult<Option<Payment>> {
        use crate::schema::payments;

        let mut conn = self.conn()?;

        let payment = payments::table
            .filter(payments::booking_id.eq(booking_id.get()))
            .first::<DbPayment>(&mut conn)
            .optional()?;

        Ok(payment.map(TryInto::try_into).transpose()?)
    }

    fn get_payment_by_id(&self, id: PaymentId) -> RepositoryResult<Option<Payment>> {
        use crate::schema::payments;

        let mut conn = self.conn()?;

        let payment = payments::table
            .filter(payments::id.eq(id.get()))
            .first::<DbPayment>(&mut conn)
            .optional()?;

        Ok(payment.map(TryInto::try_into).transpose()?)
    }
}

impl PaymentWriter for DieselRepository {
    fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let db_payment: DbNewPayment = payment.clone().into();

        // The UNIQUE constraint on booking_id enforces the one-to-one even
        // when two capture requests race; the violation surfaces as
        // RepositoryError::Duplicate.
        let inserted = diesel::insert_into(payments::table)
            .values(db_payment)
            .get_result::<DbPayment>(&mut conn)?;

        Ok(inserted.try_into()?)
    }

    fn update_provider_amount(&self, id: PaymentId, amount: Money) -> RepositoryResult<usize> {
        use crate::schema::payments;

        let mut conn = self.conn()?;

        let affected = diesel::update(payments::table.filter(payments::id.eq(id.get())))
            .set((
                payments::provider_amount.eq(amount.get().to_string()),
                payments::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_payment_status(&self, id: PaymentId, status: PaymentStatus) -> RepositoryResult<usize> {
        use crate::schema::payments;

        let mut conn = self.conn()?;

        let paid_at = match status {
            PaymentStatus::Completed => Some(Utc::now().naive_utc()),
            _ => None,
        };

        let affected = diesel::update(payments::table.filter(payments::id.eq(id.get())))
            .set((
                payments::status.eq(status.as_str()),
                payments::paid_at.eq(paid_at),
                payments::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
