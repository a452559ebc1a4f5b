//! Simulated backend latency
//!
//! Stands in for a network round trip. Callers may pass an
//! [`AbortRegistration`]; triggering its handle resolves the call early with
//! [`AppError::Aborted`] instead of the value.

use crate::errors::{AppError, Result};
use futures::future::{AbortRegistration, Abortable};
use std::time::Duration;

/// Wait `delay`, then hand back `value`
pub async fn round_trip<T>(delay: Duration, abort: Option<AbortRegistration>, value: T) -> Result<T> {
    let wait = tokio::time::sleep(delay);

    match abort {
        None => {
            wait.await;
            Ok(value)
        }
        Some(registration) => match Abortable::new(wait, registration).await {
            Ok(()) => Ok(value),
            Err(_) => Err(AppError::Aborted),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::AbortHandle;

    #[tokio::test(start_paused = true)]
    async fn test_resolves_after_delay() {
        let start = tokio::time::Instant::now();
        let value = round_trip(Duration::from_millis(1000), None, 7).await.unwrap();
        assert_eq!(value, 7);
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_delay_resolves_immediately() {
        let value = tokio_test::block_on(round_trip(Duration::ZERO, None, "now"));
        assert_eq!(value.unwrap(), "now");
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_before_completion() {
        let (handle, registration) = AbortHandle::new_pair();
        let call = tokio::spawn(round_trip(Duration::from_secs(5), Some(registration), "done"));

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.abort();

        let result = call.await.unwrap();
        assert!(matches!(result, Err(AppError::Aborted)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unused_registration_completes() {
        let (_handle, registration) = AbortHandle::new_pair();
        let result = round_trip(Duration::from_millis(5), Some(registration), 1).await;
        assert_eq!(result.unwrap(), 1);
    }
}
