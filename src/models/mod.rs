//! Diesel row structs and their conversions into domain entities.
//!
//! Monetary columns are persisted as TEXT and parsed into
//! [`rust_decimal::Decimal`] here, so the domain never sees raw strings.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::domain::types::TypeConstraintError;

pub mod booking;
pub mod category;
pub mod config;
pub mod earnings;
pub mod payment;
pub mod provider;
pub mod review;
pub mod service;

/// Parses a TEXT-persisted decimal column.
pub(crate) fn parse_decimal(
    value: &str,
    field: &'static str,
) -> Result<Decimal, TypeConstraintError> {
    Decimal::from_str(value.trim())
        .map_err(|_| TypeConstraintError::InvalidValue(format!("{field}: {value}")))
}
