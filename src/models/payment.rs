use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::payment::{Payment as DomainPayment, NewPayment as DomainNewPayment};
use crate::domain::types::{CommissionRate, Money, TypeConstraintError, UserId};
use crate::models::parse_decimal;

/// Diesel model representing the `payments` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::payments)]
pub struct Payment {
    pub id: i32,
    pub booking_id: i32,
    pub user_id: Option<i32>,
    pub amount: String,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub platform_commission: String,
    pub provider_amount: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub paid_at: Option<NaiveDateTime>,
}

/// Insertable form of [`Payment`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::payments)]
pub struct NewPayment {
    pub booking_id: i32,
    pub user_id: Option<i32>,
    pub amount: String,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub platform_commission: String,
    pub provider_amount: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub paid_at: Option<NaiveDateTime>,
}

impl TryFrom<Payment> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(payment: Payment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: payment.id.try_into()?,
            booking_id: payment.booking_id.try_into()?,
            user_id: payment.user_id.map(UserId::new).transpose()?,
            amount: Money::new(parse_decimal(&payment.amount, "amount")?)?,
            payment_method: payment.payment_method.try_into()?,
            status: payment.status.try_into()?,
            transaction_id: payment.transaction_id,
            platform_commission: CommissionRate::new(parse_decimal(
                &payment.platform_commission,
                "platform_commission",
            )?)?,
            provider_amount: Money::new(parse_decimal(
                &payment.provider_amount,
                "provider_amount",
            )?)?,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
            paid_at: payment.paid_at,
        })
    }
}

impl From<DomainNewPayment> for NewPayment {
    fn from(payment: DomainNewPayment) -> Self {
        Self {
            booking_id: payment.booking_id.get(),
            user_id: payment.user_id.map(UserId::get),
            amount: payment.amount.get().to_string(),
            payment_method: payment.payment_method.as_str().to_string(),
            status: payment.status.as_str().to_string(),
            transaction_id: payment.transaction_id,
            platform_commission: payment.platform_commission.get().to_string(),
            provider_amount: payment.provider_amount.get().to_string(),
            created_at: payment.created_at,
            updated_at: payment.updated_at,
            paid_at: payment.paid_at,
        }
    }
}
