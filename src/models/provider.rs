use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::provider::{Provider as DomainProvider, NewProvider as DomainNewProvider};
use crate::domain::types::{
    BookingCount, BusinessName, EmailAddress, PhoneNumber, PostalAddress, ReviewCount,
    TypeConstraintError, VerificationStatus,
};
use crate::models::parse_decimal;

/// Diesel model representing the `providers` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::providers)]
pub struct Provider {
    pub id: i32,
    pub user_id: i32,
    pub business_name: String,
    pub contact_phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub experience_years: i32,
    pub bio: String,
    pub verification_status: String,
    pub verified_at: Option<NaiveDateTime>,
    pub average_rating: String,
    pub total_reviews: i32,
    pub total_bookings: i32,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Provider`]. Aggregates start at their zero values.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::providers)]
pub struct NewProvider {
    pub user_id: i32,
    pub business_name: String,
    pub contact_phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub experience_years: i32,
    pub bio: String,
    pub verification_status: String,
    pub average_rating: String,
    pub total_reviews: i32,
    pub total_bookings: i32,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Provider> for DomainProvider {
    type Error = TypeConstraintError;

    fn try_from(provider: Provider) -> Result<Self, Self::Error> {
        Ok(Self {
            id: provider.id.try_into()?,
            user_id: provider.user_id.try_into()?,
            business_name: BusinessName::new(provider.business_name)?,
            contact_phone: PhoneNumber::new(provider.contact_phone)?,
            email: EmailAddress::new(provider.email)?,
            address: PostalAddress::new(provider.address)?,
            city: provider.city,
            experience_years: provider.experience_years,
            bio: provider.bio,
            verification_status: provider.verification_status.try_into()?,
            verified_at: provider.verified_at,
            average_rating: parse_decimal(&provider.average_rating, "average_rating")?,
            total_reviews: ReviewCount::new(provider.total_reviews)?,
            total_bookings: BookingCount::new(provider.total_bookings)?,
            is_available: provider.is_available,
            created_at: provider.created_at,
            updated_at: provider.updated_at,
        })
    }
}

impl From<DomainNewProvider> for NewProvider {
    fn from(provider: DomainNewProvider) -> Self {
        Self {
            user_id: provider.user_id.get(),
            business_name: provider.business_name.into_inner(),
            contact_phone: provider.contact_phone.into_inner(),
            email: provider.email.into_inner(),
            address: provider.address.into_inner(),
            city: provider.city,
            experience_years: provider.experience_years,
            bio: provider.bio,
            verification_status: VerificationStatus::Pending.as_str().to_string(),
            average_rating: "0".to_string(),
            total_reviews: 0,
            total_bookings: 0,
            is_available: true,
            created_at: provider.created_at,
            updated_at: provider.updated_at,
        }
    }
}
