use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BookingId, CommissionRate, Money, PaymentId, PaymentMethod, PaymentStatus, UserId,
};

/// Recorded monetary capture against a booking, one-to-one.
///
/// No external gateway is modeled: a payment is a recorded intent, not a
/// verified charge. `provider_amount` is derived from `amount` and
/// `platform_commission` and is resynchronized only through an explicit
/// recomputation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub user_id: Option<UserId>,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub platform_commission: CommissionRate,
    pub provider_amount: Money,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub paid_at: Option<NaiveDateTime>,
}

/// Data required to insert a new [`Payment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPayment {
    pub booking_id: BookingId,
    pub user_id: Option<UserId>,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub platform_commission: CommissionRate,
    pub provider_amount: Money,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub paid_at: Option<NaiveDateTime>,
}
