use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::types::{CommissionRate, TypeConstraintError};

/// Configuration options specific to the Localserve application.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Address the HTTP server binds to, e.g. `127.0.0.1:8080`.
    pub bind_address: String,
    /// Key material for the session and flash-message cookies.
    pub secret_key: String,
    /// Login page of the external auth collaborator.
    pub auth_service_url: String,
    /// Commission rates applied by the payment and earnings paths.
    pub commission: CommissionConfig,
}

/// The two independently configured platform commission percentages.
///
/// The payment rate is recorded on each captured payment; the earnings rate
/// is applied when deriving the provider payout. They intentionally remain
/// separate values because the business has never reconciled them.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CommissionConfig {
    pub payment_pct: Decimal,
    pub earnings_pct: Decimal,
}

impl CommissionConfig {
    /// Rate recorded on captured payments.
    pub fn payment_rate(&self) -> Result<CommissionRate, TypeConstraintError> {
        CommissionRate::new(self.payment_pct)
    }

    /// Rate applied when deriving provider earnings.
    pub fn earnings_rate(&self) -> Result<CommissionRate, TypeConstraintError> {
        CommissionRate::new(self.earnings_pct)
    }
}
