//! Single retry for transient store failures.

use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::DomainError;

/// Runs `op`, and once more after `backoff` if the first attempt failed with
/// a retryable error. The second result is returned as is.
pub(super) async fn retry_once<T, F, Fut>(
    operation: &'static str,
    backoff: Duration,
    mut op: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    match op().await {
        Err(err) if err.code.is_retryable() => {
            tracing::warn!(
                operation,
                error = %err,
                backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                "Transient store error, retrying once"
            );
            tokio::time::sleep(backoff).await;
            op().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn unavailable() -> DomainError {
        DomainError::new(ErrorCode::StoreUnavailable, "connection reset")
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let result = retry_once("find", Duration::ZERO, move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(unavailable())
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_transient_failure_is_returned() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let result: Result<(), _> = retry_once("find", Duration::ZERO, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(unavailable())
        })
        .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::StoreUnavailable);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let result: Result<(), _> = retry_once("insert", Duration::ZERO, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::new(ErrorCode::DatabaseError, "constraint"))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
