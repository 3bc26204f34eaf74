use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{PaymentMethod, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct CapturePaymentForm {
    #[validate(length(min = 1))]
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapturePaymentFormPayload {
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Error)]
pub enum CapturePaymentFormError {
    #[error("Payment form validation failed: {0}")]
    Validation(String),
    #[error("Payment form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CapturePaymentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CapturePaymentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CapturePaymentForm> for CapturePaymentFormPayload {
    type Error = CapturePaymentFormError;

    fn try_from(value: CapturePaymentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            payment_method: PaymentMethod::try_from(value.payment_method.as_str())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_payment_methods() {
        let form = CapturePaymentForm {
            payment_method: "upi".to_string(),
        };
        let payload: CapturePaymentFormPayload = form.try_into().unwrap();
        assert_eq!(payload.payment_method, PaymentMethod::Upi);
    }

    #[test]
    fn rejects_unknown_payment_methods() {
        let form = CapturePaymentForm {
            payment_method: "barter".to_string(),
        };
        let payload: Result<CapturePaymentFormPayload, _> = form.try_into();
        assert!(payload.is_err());
    }
}
