//! Bounded retry for transient ledger failures

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::error::ServiceResult;

/// Run `operation` until it succeeds, fails non-transiently, or `attempts`
/// runs out. Attempt `n` is followed by a `n * backoff` pause.
pub async fn retry_transient<T, F, Fut>(
    attempts: u32,
    backoff: Duration,
    operation: &'static str,
    mut run: F,
) -> ServiceResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ServiceResult<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match run().await {
            Err(e) if e.is_transient() && attempt < attempts => {
                warn!(operation, attempt, error = %e, "Transient ledger failure, retrying");
                tokio::time::sleep(backoff * attempt).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;
    use premium_core::DomainError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry_transient(3, Duration::from_millis(1), "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(DomainError::StoreUnavailable("blip".into()).into())
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: ServiceResult<()> =
            retry_transient(2, Duration::from_millis(1), "test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::StoreUnavailable("down".into()).into())
            })
            .await;

        assert!(result.unwrap_err().is_transient());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_conflicts_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: ServiceResult<()> =
            retry_transient(5, Duration::from_millis(1), "test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ServiceError::from(DomainError::CodeExhausted("X".into())))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
