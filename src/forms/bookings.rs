use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::booking::NewBooking;
use crate::domain::service::Service;
use crate::domain::types::{
    CustomerName, EmailAddress, PhoneNumber, PostalAddress, TypeConstraintError, UserId,
};

/// Storefront booking form; also carries the payment instrument because the
/// flow captures the payment in the same request.
#[derive(Deserialize, Validate)]
pub struct CreateBookingForm {
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1))]
    pub customer_phone: String,
    #[validate(length(min = 1))]
    pub customer_address: String,
    pub booking_date: String,
    pub booking_time: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_emergency: bool,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateBookingFormPayload {
    pub customer_name: CustomerName,
    pub customer_email: EmailAddress,
    pub customer_phone: PhoneNumber,
    pub customer_address: PostalAddress,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
    pub is_emergency: bool,
}

impl CreateBookingFormPayload {
    /// Builds the insertable booking, snapshotting the service's current
    /// price and provider.
    pub fn into_new_booking(self, service: &Service, user_id: Option<UserId>) -> NewBooking {
        let now = Utc::now().naive_utc();
        NewBooking {
            service_id: service.id,
            provider_id: service.provider_id,
            user_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            customer_address: self.customer_address,
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            is_emergency: self.is_emergency,
            total_amount: service.price,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum CreateBookingFormError {
    #[error("Booking form validation failed: {0}")]
    Validation(String),
    #[error("Booking form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CreateBookingFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CreateBookingFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, TypeConstraintError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TypeConstraintError::InvalidValue(format!("booking date: {value}")))
}

fn parse_time(value: &str) -> Result<NaiveTime, TypeConstraintError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| TypeConstraintError::InvalidValue(format!("booking time: {value}")))
}

impl TryFrom<CreateBookingForm> for CreateBookingFormPayload {
    type Error = CreateBookingFormError;

    fn try_from(value: CreateBookingForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            customer_name: CustomerName::new(value.customer_name)?,
            customer_email: EmailAddress::new(value.customer_email)?,
            customer_phone: PhoneNumber::new(value.customer_phone)?,
            customer_address: PostalAddress::new(value.customer_address)?,
            booking_date: parse_date(&value.booking_date)?,
            booking_time: parse_time(&value.booking_time)?,
            notes: value.notes,
            is_emergency: value.is_emergency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> CreateBookingForm {
        CreateBookingForm {
            customer_name: "  Asha  ".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: "555-0100".to_string(),
            customer_address: "12 Canal Road".to_string(),
            booking_date: "2026-07-01".to_string(),
            booking_time: "10:30".to_string(),
            notes: None,
            is_emergency: false,
            payment_method: Some("card".to_string()),
        }
    }

    #[test]
    fn parses_and_trims_the_booking_form() {
        let payload: CreateBookingFormPayload = sample_form().try_into().unwrap();
        assert_eq!(payload.customer_name.as_str(), "Asha");
        assert_eq!(
            payload.booking_date,
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
        );
        assert_eq!(
            payload.booking_time,
            NaiveTime::from_hms_opt(10, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        let mut form = sample_form();
        form.booking_date = "01/07/2026".to_string();
        let payload: Result<CreateBookingFormPayload, _> = form.try_into();
        assert!(payload.is_err());
    }

    #[test]
    fn rejects_invalid_email() {
        let mut form = sample_form();
        form.customer_email = "not-an-email".to_string();
        let payload: Result<CreateBookingFormPayload, _> = form.try_into();
        assert!(payload.is_err());
    }
}
