//! Application error taxonomy.

use domain::{DomainError, RepositoryError};
use thiserror::Error;

/// The four error kinds callers of the lifecycle services can observe.
///
/// Presentation layers map these onto transport codes (e.g. HTTP 404, 400,
/// 409, 503).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// The requested entity does not exist.
    #[error("Resource not found")]
    NotFound,

    /// Caller-supplied data violates a validation rule.
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// A uniqueness constraint was violated.
    #[error("Resource conflict")]
    Conflict,

    /// The persistence collaborator failed or did not answer in time.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl AppError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Invalid(_) => "invalid",
            AppError::Conflict => "conflict",
            AppError::Unavailable(_) => "unavailable",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Invalid(err.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound,
            RepositoryError::Conflict => AppError::Conflict,
            RepositoryError::InvalidInput(reason) => AppError::Invalid(reason),
            RepositoryError::Backend(source) => AppError::Unavailable(source.to_string()),
        }
    }
}
