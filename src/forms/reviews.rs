use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{Rating, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct AddReviewForm {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddReviewFormPayload {
    pub rating: Rating,
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum AddReviewFormError {
    #[error("Review form validation failed: {0}")]
    Validation(String),
    #[error("Review form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddReviewFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddReviewFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddReviewForm> for AddReviewFormPayload {
    type Error = AddReviewFormError;

    fn try_from(value: AddReviewForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            rating: Rating::new(value.rating)?,
            comment: value.comment.unwrap_or_default(),
        })
    }
}
