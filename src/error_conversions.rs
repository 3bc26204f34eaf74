//! Error conversion glue between domain/form errors and the service layer.

use crate::domain::booking::InvalidTransition;
use crate::domain::types::TypeConstraintError;
use crate::forms::bookings::CreateBookingFormError;
use crate::forms::catalog::{
    AddCategoryFormError, AddServiceFormError, UpdateCategoryFormError, UpdateServiceFormError,
};
use crate::forms::earnings::PayoutStatusFormError;
use crate::forms::payments::CapturePaymentFormError;
use crate::forms::providers::RegisterProviderFormError;
use crate::forms::reviews::AddReviewFormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(val: InvalidTransition) -> Self {
        ServiceError::InvalidTransition(val.to_string())
    }
}

impl From<CreateBookingFormError> for ServiceError {
    fn from(val: CreateBookingFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<CapturePaymentFormError> for ServiceError {
    fn from(val: CapturePaymentFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<AddCategoryFormError> for ServiceError {
    fn from(val: AddCategoryFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<UpdateCategoryFormError> for ServiceError {
    fn from(val: UpdateCategoryFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<AddServiceFormError> for ServiceError {
    fn from(val: AddServiceFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<UpdateServiceFormError> for ServiceError {
    fn from(val: UpdateServiceFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<RegisterProviderFormError> for ServiceError {
    fn from(val: RegisterProviderFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<AddReviewFormError> for ServiceError {
    fn from(val: AddReviewFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<PayoutStatusFormError> for ServiceError {
    fn from(val: PayoutStatusFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
