use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not authorized to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Submitted form data failed validation.
    #[error("{0}")]
    Form(String),
    /// The booking state machine rejected the attempted action.
    #[error("{0}")]
    InvalidTransition(String),
    /// A one-to-one constraint rejected a second record.
    #[error("duplicate record: {0}")]
    Duplicate(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
