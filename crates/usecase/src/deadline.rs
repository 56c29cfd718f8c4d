//! Per-operation deadline for repository calls.

use std::future::Future;
use std::time::Duration;

use domain::RepositoryError;

use crate::error::AppError;

/// Default budget for a single lifecycle operation's repository work.
pub const DEFAULT_OPERATION_DEADLINE: Duration = Duration::from_millis(800);

/// Runs a repository future under `deadline`, translating its outcome.
///
/// On expiry the future is dropped and `Unavailable` is returned. Dropping
/// the returned future (caller cancellation) drops the repository call too.
pub(crate) async fn within<T, F>(
    deadline: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => {
            metrics::counter!("repository_deadline_exceeded_total", "operation" => operation)
                .increment(1);
            tracing::warn!(
                operation,
                deadline_ms = deadline.as_millis() as u64,
                "repository call exceeded deadline"
            );
            Err(AppError::Unavailable(format!(
                "{operation} exceeded deadline of {}ms",
                deadline.as_millis()
            )))
        }
    }
}

/// Records a failed operation and passes the error through.
pub(crate) fn observe_failure(operation: &'static str, err: AppError) -> AppError {
    metrics::counter!("usecase_errors_total", "operation" => operation, "kind" => err.kind())
        .increment(1);
    match &err {
        AppError::Unavailable(reason) => {
            tracing::warn!(operation, %reason, "operation failed: dependency unavailable");
        }
        other => tracing::debug!(operation, error = %other, "operation rejected"),
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_result_passes_through() {
        let ok: Result<u32, AppError> =
            within(Duration::from_millis(50), "test", async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let not_found: Result<u32, AppError> = within(Duration::from_millis(50), "test", async {
            Err(RepositoryError::NotFound)
        })
        .await;
        assert_eq!(not_found, Err(AppError::NotFound));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_is_unavailable() {
        let result: Result<(), AppError> = within(Duration::from_millis(800), "slow", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Unavailable(ref msg)) if msg.contains("slow")));
    }

    #[test]
    fn test_default_deadline() {
        assert_eq!(DEFAULT_OPERATION_DEADLINE, Duration::from_millis(800));
    }
}
