use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ApprovalStatus, CategoryId, DurationMinutes, Money, PricingType, ProviderId, ServiceId,
    ServiceTitle,
};

/// Canonical service record offered by a provider within one category.
///
/// A service is publicly listed only when it is active AND approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub provider_id: ProviderId,
    pub category_id: CategoryId,
    pub title: ServiceTitle,
    pub description: String,
    pub pricing_type: PricingType,
    pub price: Money,
    pub duration_minutes: DurationMinutes,
    pub approval_status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Service {
    /// Whether the service may appear in public listings and accept bookings.
    pub fn is_listed(&self) -> bool {
        self.is_active && self.approval_status == ApprovalStatus::Approved
    }
}

/// Data required to insert a new [`Service`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewService {
    pub provider_id: ProviderId,
    pub category_id: CategoryId,
    pub title: ServiceTitle,
    pub description: String,
    pub pricing_type: PricingType,
    pub price: Money,
    pub duration_minutes: DurationMinutes,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
