//! Domain error types.

use thiserror::Error;

/// Business rule violations detected inside the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A user field failed validation.
    #[error("Invalid user: {0}")]
    InvalidUser(&'static str),

    /// An order line item failed validation.
    #[error("Invalid item: {0}")]
    InvalidItem(&'static str),

    /// An order failed order-level validation.
    #[error("Invalid order: {0}")]
    InvalidOrder(&'static str),
}

/// Errors reported by repository implementations.
///
/// `NotFound`, `Conflict` and `InvalidInput` are recognized sentinels; any
/// other failure is carried opaquely in `Backend`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity does not exist.
    #[error("Resource not found")]
    NotFound,

    /// A uniqueness constraint was violated (e.g. duplicate email).
    #[error("Resource conflict")]
    Conflict,

    /// The storage layer rejected the data as invalid.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any other storage or transport failure.
    #[error("Backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps an arbitrary storage error as a backend failure.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        RepositoryError::Backend(err.into())
    }
}
