use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{PayoutStatus, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct PayoutStatusForm {
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayoutStatusFormPayload {
    pub status: PayoutStatus,
}

#[derive(Debug, Error)]
pub enum PayoutStatusFormError {
    #[error("Payout form validation failed: {0}")]
    Validation(String),
    #[error("Payout form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for PayoutStatusFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PayoutStatusFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<PayoutStatusForm> for PayoutStatusFormPayload {
    type Error = PayoutStatusFormError;

    fn try_from(value: PayoutStatusForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            status: PayoutStatus::try_from(value.status.as_str())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_payout_states() {
        let form = PayoutStatusForm {
            status: "processing".to_string(),
        };
        let payload: PayoutStatusFormPayload = form.try_into().unwrap();
        assert_eq!(payload.status, PayoutStatus::Processing);
    }

    #[test]
    fn rejects_unknown_payout_states() {
        let form = PayoutStatusForm {
            status: "vanished".to_string(),
        };
        let payload: Result<PayoutStatusFormPayload, _> = form.try_into();
        assert!(payload.is_err());
    }
}
