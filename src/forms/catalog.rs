use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::NewCategory;
use crate::domain::service::NewService;
use crate::domain::types::{
    CategoryId, CategoryName, DurationMinutes, Money, PricingType, ProviderId, ServiceId,
    ServiceTitle, TypeConstraintError,
};

fn parse_price(value: &str) -> Result<Money, TypeConstraintError> {
    let price = Decimal::from_str(value.trim())
        .map_err(|_| TypeConstraintError::InvalidValue(format!("price: {value}")))?;
    Money::new(price)
}

#[derive(Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
    pub description: String,
    pub icon: Option<String>,
}

impl AddCategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            description: self.description,
            icon: self.icon,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddCategoryFormError {
    #[error("Add category form validation failed: {0}")]
    Validation(String),
    #[error("Add category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = AddCategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
            description: value.description.unwrap_or_default(),
            icon: value.icon.filter(|icon| !icon.trim().is_empty()),
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateCategoryForm {
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategoryFormPayload {
    pub category_id: CategoryId,
    pub name: CategoryName,
    pub description: String,
    pub icon: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Error)]
pub enum UpdateCategoryFormError {
    #[error("Update category form validation failed: {0}")]
    Validation(String),
    #[error("Update category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateCategoryForm> for UpdateCategoryFormPayload {
    type Error = UpdateCategoryFormError;

    fn try_from(value: UpdateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category_id: CategoryId::new(value.category_id)?,
            name: CategoryName::new(value.name)?,
            description: value.description.unwrap_or_default(),
            icon: value.icon.filter(|icon| !icon.trim().is_empty()),
            is_active: value.is_active,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct AddServiceForm {
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub pricing_type: String,
    #[validate(length(min = 1))]
    pub price: String,
    #[validate(range(min = 1))]
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddServiceFormPayload {
    pub category_id: CategoryId,
    pub title: ServiceTitle,
    pub description: String,
    pub pricing_type: PricingType,
    pub price: Money,
    pub duration_minutes: DurationMinutes,
}

impl AddServiceFormPayload {
    pub fn into_new_service(self, provider_id: ProviderId) -> NewService {
        let now = Utc::now().naive_utc();
        NewService {
            provider_id,
            category_id: self.category_id,
            title: self.title,
            description: self.description,
            pricing_type: self.pricing_type,
            price: self.price,
            duration_minutes: self.duration_minutes,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddServiceFormError {
    #[error("Add service form validation failed: {0}")]
    Validation(String),
    #[error("Add service form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddServiceFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddServiceFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddServiceForm> for AddServiceFormPayload {
    type Error = AddServiceFormError;

    fn try_from(value: AddServiceForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category_id: CategoryId::new(value.category_id)?,
            title: ServiceTitle::new(value.title)?,
            description: value.description.unwrap_or_default(),
            pricing_type: PricingType::try_from(value.pricing_type.as_str())?,
            price: parse_price(&value.price)?,
            duration_minutes: DurationMinutes::new(value.duration_minutes)?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateServiceForm {
    #[validate(range(min = 1))]
    pub service_id: i32,
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub pricing_type: String,
    #[validate(length(min = 1))]
    pub price: String,
    #[validate(range(min = 1))]
    pub duration_minutes: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateServiceFormPayload {
    pub service_id: ServiceId,
    pub category_id: CategoryId,
    pub title: ServiceTitle,
    pub description: String,
    pub pricing_type: PricingType,
    pub price: Money,
    pub duration_minutes: DurationMinutes,
    pub is_active: bool,
}

impl UpdateServiceFormPayload {
    pub fn into_new_service(self, provider_id: ProviderId) -> NewService {
        let now = Utc::now().naive_utc();
        NewService {
            provider_id,
            category_id: self.category_id,
            title: self.title,
            description: self.description,
            pricing_type: self.pricing_type,
            price: self.price,
            duration_minutes: self.duration_minutes,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateServiceFormError {
    #[error("Update service form validation failed: {0}")]
    Validation(String),
    #[error("Update service form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateServiceFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateServiceFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateServiceForm> for UpdateServiceFormPayload {
    type Error = UpdateServiceFormError;

    fn try_from(value: UpdateServiceForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            service_id: ServiceId::new(value.service_id)?,
            category_id: CategoryId::new(value.category_id)?,
            title: ServiceTitle::new(value.title)?,
            description: value.description.unwrap_or_default(),
            pricing_type: PricingType::try_from(value.pricing_type.as_str())?,
            price: parse_price(&value.price)?,
            duration_minutes: DurationMinutes::new(value.duration_minutes)?,
            is_active: value.is_active,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct RejectServiceForm {
    #[validate(length(min = 1))]
    pub reason: String,
}
