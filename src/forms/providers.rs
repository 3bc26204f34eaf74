use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::provider::NewProvider;
use crate::domain::types::{
    BusinessName, EmailAddress, PhoneNumber, PostalAddress, TypeConstraintError, UserId,
};

#[derive(Deserialize, Validate)]
pub struct RegisterProviderForm {
    #[validate(length(min = 1))]
    pub business_name: String,
    #[validate(length(min = 1))]
    pub contact_phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub address: String,
    pub city: Option<String>,
    #[validate(range(min = 0))]
    pub experience_years: i32,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterProviderFormPayload {
    pub business_name: BusinessName,
    pub contact_phone: PhoneNumber,
    pub email: EmailAddress,
    pub address: PostalAddress,
    pub city: String,
    pub experience_years: i32,
    pub bio: String,
}

impl RegisterProviderFormPayload {
    pub fn into_new_provider(self, user_id: UserId) -> NewProvider {
        let now = Utc::now().naive_utc();
        NewProvider {
            user_id,
            business_name: self.business_name,
            contact_phone: self.contact_phone,
            email: self.email,
            address: self.address,
            city: self.city,
            experience_years: self.experience_years,
            bio: self.bio,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegisterProviderFormError {
    #[error("Provider registration form validation failed: {0}")]
    Validation(String),
    #[error("Provider registration form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for RegisterProviderFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RegisterProviderFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RegisterProviderForm> for RegisterProviderFormPayload {
    type Error = RegisterProviderFormError;

    fn try_from(value: RegisterProviderForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            business_name: BusinessName::new(value.business_name)?,
            contact_phone: PhoneNumber::new(value.contact_phone)?,
            email: EmailAddress::new(value.email)?,
            address: PostalAddress::new(value.address)?,
            city: value.city.unwrap_or_default(),
            experience_years: value.experience_years,
            bio: value.bio.unwrap_or_default(),
        })
    }
}
