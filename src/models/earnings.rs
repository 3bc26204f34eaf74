use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::earnings::{
    NewProviderEarnings as DomainNewProviderEarnings, ProviderEarnings as DomainProviderEarnings,
};
use crate::domain::types::{CommissionRate, Money, TypeConstraintError};
use crate::models::parse_decimal;

/// Diesel model representing the `provider_earnings` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::provider_earnings)]
pub struct ProviderEarnings {
    pub id: i32,
    pub provider_id: i32,
    pub booking_id: i32,
    pub payment_id: i32,
    pub gross_amount: String,
    pub commission_percentage: String,
    pub commission_amount: String,
    pub net_amount: String,
    pub payout_status: String,
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`ProviderEarnings`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::provider_earnings)]
pub struct NewProviderEarnings {
    pub provider_id: i32,
    pub booking_id: i32,
    pub payment_id: i32,
    pub gross_amount: String,
    pub commission_percentage: String,
    pub commission_amount: String,
    pub net_amount: String,
    pub payout_status: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ProviderEarnings> for DomainProviderEarnings {
    type Error = TypeConstraintError;

    fn try_from(earnings: ProviderEarnings) -> Result<Self, Self::Error> {
        Ok(Self {
            id: earnings.id.try_into()?,
            provider_id: earnings.provider_id.try_into()?,
            booking_id: earnings.booking_id.try_into()?,
            payment_id: earnings.payment_id.try_into()?,
            gross_amount: Money::new(parse_decimal(&earnings.gross_amount, "gross_amount")?)?,
            commission_percentage: CommissionRate::new(parse_decimal(
                &earnings.commission_percentage,
                "commission_percentage",
            )?)?,
            commission_amount: Money::new(parse_decimal(
                &earnings.commission_amount,
                "commission_amount",
            )?)?,
            net_amount: Money::new(parse_decimal(&earnings.net_amount, "net_amount")?)?,
            payout_status: earnings.payout_status.try_into()?,
            paid_at: earnings.paid_at,
            created_at: earnings.created_at,
        })
    }
}

impl From<DomainNewProviderEarnings> for NewProviderEarnings {
    fn from(earnings: DomainNewProviderEarnings) -> Self {
        Self {
            provider_id: earnings.provider_id.get(),
            booking_id: earnings.booking_id.get(),
            payment_id: earnings.payment_id.get(),
            gross_amount: earnings.gross_amount.get().to_string(),
            commission_percentage: earnings.commission_percentage.get().to_string(),
            commission_amount: earnings.commission_amount.get().to_string(),
            net_amount: earnings.net_amount.get().to_string(),
            payout_status: earnings.payout_status.as_str().to_string(),
            created_at: earnings.created_at,
        }
    }
}
