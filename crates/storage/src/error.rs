use domain::RepositoryError;
use thiserror::Error;

/// Errors raised while setting up storage (connecting, migrating).
#[derive(Debug, Error)]
pub enum StorageError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Maps a driver error onto the repository sentinels.
///
/// Missing rows become `NotFound`, unique violations become `Conflict`,
/// everything else is an opaque backend failure.
pub(crate) fn to_repository_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            RepositoryError::Conflict
        }
        sqlx::Error::Database(ref db_err) if db_err.is_check_violation() => {
            RepositoryError::InvalidInput(db_err.message().to_string())
        }
        other => {
            metrics::counter!("storage_backend_errors_total").increment(1);
            tracing::debug!(error = %other, "database call failed");
            RepositoryError::backend(other)
        }
    }
}
