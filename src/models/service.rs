use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::service::{Service as DomainService, NewService as DomainNewService};
use crate::domain::types::{
    ApprovalStatus, DurationMinutes, Money, ServiceTitle, TypeConstraintError,
};
use crate::models::parse_decimal;

/// Diesel model representing the `services` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::services)]
pub struct Service {
    pub id: i32,
    pub provider_id: i32,
    pub category_id: i32,
    pub title: String,
    pub description: String,
    pub pricing_type: String,
    pub price: String,
    pub duration_minutes: i32,
    pub approval_status: String,
    pub rejection_reason: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Service`]. New services always await admin approval.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::services)]
pub struct NewService {
    pub provider_id: i32,
    pub category_id: i32,
    pub title: String,
    pub description: String,
    pub pricing_type: String,
    pub price: String,
    pub duration_minutes: i32,
    pub approval_status: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Service> for DomainService {
    type Error = TypeConstraintError;

    fn try_from(service: Service) -> Result<Self, Self::Error> {
        Ok(Self {
            id: service.id.try_into()?,
            provider_id: service.provider_id.try_into()?,
            category_id: service.category_id.try_into()?,
            title: ServiceTitle::new(service.title)?,
            description: service.description,
            pricing_type: service.pricing_type.try_into()?,
            price: Money::new(parse_decimal(&service.price, "price")?)?,
            duration_minutes: DurationMinutes::new(service.duration_minutes)?,
            approval_status: service.approval_status.try_into()?,
            rejection_reason: service.rejection_reason,
            is_active: service.is_active,
            created_at: service.created_at,
            updated_at: service.updated_at,
        })
    }
}

impl From<DomainNewService> for NewService {
    fn from(service: DomainNewService) -> Self {
        Self {
            provider_id: service.provider_id.get(),
            category_id: service.category_id.get(),
            title: service.title.into_inner(),
            description: service.description,
            pricing_type: service.pricing_type.as_str().to_string(),
            price: service.price.get().to_string(),
            duration_minutes: service.duration_minutes.get(),
            approval_status: ApprovalStatus::Pending.as_str().to_string(),
            is_active: service.is_active,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}
