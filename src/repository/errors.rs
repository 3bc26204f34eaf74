//! Error type shared by every repository trait.

use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Failed to check a connection out of the pool.
    #[error("database pool error: {0}")]
    Pool(#[from] PoolError),
    /// Insert violated a one-to-one (unique) constraint.
    #[error("duplicate record: {0}")]
    Duplicate(String),
    /// Requested row does not exist.
    #[error("record not found")]
    NotFound,
    /// A stored value failed domain validation when loaded.
    #[error("validation error: {0}")]
    Validation(String),
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(DieselError),
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Duplicate(info.message().to_string())
            }
            other => Self::Database(other),
        }
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Convenient alias for results returned from repository methods.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
