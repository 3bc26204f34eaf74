use chrono::Utc;
use diesel::prelude::*;

use crate::domain::booking::{Booking, BookingAction, NewBooking};
use crate::domain::types::{BookingId, BookingStatus, ProviderId};
use crate::models::booking::{Booking as DbBooking, NewBooking as DbNewBooking};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    BookingListQuery, BookingReader, BookingStatusCounts, BookingWriter, DieselRepository,
};

impl BookingReader for DieselRepository {
    fn list_bookings(&self, query: BookingListQuery) -> RepositoryResult<(usize, Vec<Booking>)> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut q = bookings::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(provider_id) = query.provider_id {
                q = q.filter(bookings::provider_id.eq(provider_id.get()));
            }
            if let Some(user_id) = query.user_id {
                q = q.filter(bookings::user_id.eq(Some(user_id.get())));
            }
            if let Some(status) = query.status {
                q = q.filter(bookings::status.eq(status.as_str()));
            }
            q
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let items = items
            .order(bookings::created_at.desc())
            .load::<DbBooking>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Booking>, _>>()?;

        Ok((total, items))
    }

    fn get_booking_by_id(&self, id: BookingId) -> RepositoryResult<Option<Booking>> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;

        let booking = bookings::table
            .filter(bookings::id.eq(id.get()))
            .first::<DbBooking>(&mut conn)
            .optional()?;

        Ok(booking.map(TryInto::try_into).transpose()?)
    }

    fn booking_status_counts(
        &self,
        provider_id: ProviderId,
    ) -> RepositoryResult<BookingStatusCounts> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;

        let rows = bookings::table
            .filter(bookings::provider_id.eq(provider_id.get()))
            .group_by(bookings::status)
            .select((bookings::status, diesel::dsl::count_star()))
            .load::<(String, i64)>(&mut conn)?;

        let mut counts = BookingStatusCounts::default();
        for (status, count) in rows {
            let count = count as usize;
            match BookingStatus::try_from(status.as_str())? {
                BookingStatus::Pending => counts.pending = count,
                BookingStatus::Confirmed => counts.confirmed = count,
                BookingStatus::InProgress => counts.in_progress = count,
                BookingStatus::Completed => counts.completed = count,
                BookingStatus::Cancelled => counts.cancelled = count,
            }
        }

        Ok(counts)
    }
}

impl BookingWriter for DieselRepository {
    fn create_booking(&self, booking: &NewBooking) -> RepositoryResult<Booking> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;
        let db_booking: DbNewBooking = booking.clone().into();

        let inserted = diesel::insert_into(bookings::table)
            .values(db_booking)
            .get_result::<DbBooking>(&mut conn)?;

        Ok(inserted.try_into()?)
    }

    fn transition_booking(&self, id: BookingId, action: BookingAction) -> RepositoryResult<usize> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;

        let sources: Vec<&'static str> = BookingStatus::sources(action)
            .into_iter()
            .map(BookingStatus::as_str)
            .collect();
        let target = BookingStatus::target(action).as_str();
        let now = Utc::now().naive_utc();

        // Optimistic guard: the update only matches while the current status
        // still admits the action.
        let scope = bookings::table
            .filter(bookings::id.eq(id.get()))
            .filter(bookings::status.eq_any(sources));

        let affected = match action {
            BookingAction::Confirm => diesel::update(scope)
                .set((
                    bookings::status.eq(target),
                    bookings::confirmed_at.eq(Some(now)),
                    bookings::updated_at.eq(now),
                ))
                .execute(&mut conn)?,
            BookingAction::Complete => diesel::update(scope)
                .set((
                    bookings::status.eq(target),
                    bookings::completed_at.eq(Some(now)),
                    bookings::updated_at.eq(now),
                ))
                .execute(&mut conn)?,
            BookingAction::Start | BookingAction::Cancel => diesel::update(scope)
                .set((bookings::status.eq(target), bookings::updated_at.eq(now)))
                .execute(&mut conn)?,
        };

        Ok(affected)
    }
}
