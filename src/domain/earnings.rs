use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BookingId, CommissionRate, EarningsId, Money, PaymentId, PayoutStatus, ProviderId,
};

/// Derived net payout owed to a provider for one completed, paid booking.
///
/// One-to-one with both the booking and the payment; created at most once and
/// never before the payment has completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderEarnings {
    pub id: EarningsId,
    pub provider_id: ProviderId,
    pub booking_id: BookingId,
    pub payment_id: PaymentId,
    pub gross_amount: Money,
    pub commission_percentage: CommissionRate,
    pub commission_amount: Money,
    pub net_amount: Money,
    pub payout_status: PayoutStatus,
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`ProviderEarnings`] row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProviderEarnings {
    pub provider_id: ProviderId,
    pub booking_id: BookingId,
    pub payment_id: PaymentId,
    pub gross_amount: Money,
    pub commission_percentage: CommissionRate,
    pub commission_amount: Money,
    pub net_amount: Money,
    pub payout_status: PayoutStatus,
    pub created_at: NaiveDateTime,
}
