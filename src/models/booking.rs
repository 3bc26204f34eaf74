use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;

use crate::domain::booking::{Booking as DomainBooking, NewBooking as DomainNewBooking};
use crate::domain::types::{
    CustomerName, EmailAddress, Money, PhoneNumber, PostalAddress, TypeConstraintError, UserId,
};
use crate::models::parse_decimal;

/// Diesel model representing the `bookings` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct Booking {
    pub id: i32,
    pub service_id: i32,
    pub provider_id: i32,
    pub user_id: Option<i32>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
    pub is_emergency: bool,
    pub status: String,
    pub total_amount: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub confirmed_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

/// Insertable form of [`Booking`]. Bookings always start out pending.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking {
    pub service_id: i32,
    pub provider_id: i32,
    pub user_id: Option<i32>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
    pub is_emergency: bool,
    pub status: String,
    pub total_amount: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Booking> for DomainBooking {
    type Error = TypeConstraintError;

    fn try_from(booking: Booking) -> Result<Self, Self::Error> {
        Ok(Self {
            id: booking.id.try_into()?,
            service_id: booking.service_id.try_into()?,
            provider_id: booking.provider_id.try_into()?,
            user_id: booking.user_id.map(UserId::new).transpose()?,
            customer_name: CustomerName::new(booking.customer_name)?,
            customer_email: EmailAddress::new(booking.customer_email)?,
            customer_phone: PhoneNumber::new(booking.customer_phone)?,
            customer_address: PostalAddress::new(booking.customer_address)?,
            booking_date: booking.booking_date,
            booking_time: booking.booking_time,
            notes: booking.notes,
            is_emergency: booking.is_emergency,
            status: booking.status.try_into()?,
            total_amount: Money::new(parse_decimal(&booking.total_amount, "total_amount")?)?,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
            confirmed_at: booking.confirmed_at,
            completed_at: booking.completed_at,
        })
    }
}

impl From<DomainNewBooking> for NewBooking {
    fn from(booking: DomainNewBooking) -> Self {
        Self {
            service_id: booking.service_id.get(),
            provider_id: booking.provider_id.get(),
            user_id: booking.user_id.map(UserId::get),
            customer_name: booking.customer_name.into_inner(),
            customer_email: booking.customer_email.into_inner(),
            customer_phone: booking.customer_phone.into_inner(),
            customer_address: booking.customer_address.into_inner(),
            booking_date: booking.booking_date,
            booking_time: booking.booking_time,
            notes: booking.notes,
            is_emergency: booking.is_emergency,
            status: crate::domain::types::BookingStatus::Pending.as_str().to_string(),
            total_amount: booking.total_amount.get().to_string(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}
