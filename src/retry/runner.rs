//! # The attempt loop.
//!
//! [`Retry`] drives a zero-argument thunk through the attempts granted by
//! an optional [`RetryPolicy`], producing a single `(data, error)` outcome.
//!
//! ## Rules
//! - Success short-circuits: no further attempts.
//! - [`TaskError::Canceled`] short-circuits to `(None, None)`: intentional
//!   cancellation is neither a failure to retry nor an error to report.
//! - Any other failure is kept as the latest error; if attempts remain,
//!   the loop sleeps `policy.delay_for(k)` and tries again.
//! - Exhaustion yields `(None, last_error)` — returned, never thrown; the
//!   executor decides whether the caller sees a rejection.

use std::future::Future;
use std::time::Duration;

use tokio::time;

use crate::error::TaskError;
use crate::retry::policy::RetryPolicy;

/// Executes a thunk with configured attempts and inter-attempt delays.
#[derive(Clone, Copy, Debug, Default)]
pub struct Retry {
    policy: Option<RetryPolicy>,
}

impl Retry {
    /// Creates a runner; `None` grants a single attempt.
    pub fn new(policy: Option<RetryPolicy>) -> Self {
        Self { policy }
    }

    /// Drives `thunk` to one outcome.
    ///
    /// Exactly one of the tuple slots is set on success/failure; both are
    /// `None` when the thunk observed cancellation.
    pub async fn run<T, F, Fut>(&self, mut thunk: F) -> (Option<T>, Option<TaskError>)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TaskError>>,
    {
        let attempts = self.policy.map_or(1, |p| p.attempts());
        let mut last_error = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self
                    .policy
                    .map(|p| p.delay_for(attempt))
                    .unwrap_or(Duration::ZERO);
                if delay > Duration::ZERO {
                    time::sleep(delay).await;
                }
            }

            match thunk().await {
                Ok(data) => return (Some(data), None),
                Err(TaskError::Canceled) => return (None, None),
                Err(error) => last_error = Some(error),
            }
        }

        (None, last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_success_short_circuits() {
        let calls = Arc::new(AtomicU32::new(0));
        let retry = Retry::new(Some(RetryPolicy::times(5)));

        let counter = calls.clone();
        let (data, error) = retry
            .run(|| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, AtomicOrdering::Relaxed);
                    Ok::<_, TaskError>("done")
                }
            })
            .await;

        assert_eq!(data, Some("done"));
        assert!(error.is_none());
        assert_eq!(calls.load(AtomicOrdering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delays_between_attempts() {
        let policy = RetryPolicy::times(2)
            .with_delay(Duration::from_millis(100))
            .with_backoff();
        let retry = Retry::new(Some(policy));

        let started = Instant::now();
        let offsets = Arc::new(std::sync::Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let log = offsets.clone();
        let (data, error) = retry
            .run(|| {
                let counter = counter.clone();
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(started.elapsed());
                    if counter.fetch_add(1, AtomicOrdering::Relaxed) < 2 {
                        Err(TaskError::fail("flaky"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(data, Some(42));
        assert!(error.is_none());
        // attempts at 0ms, +100ms, +200ms more (exponential)
        let offsets = offsets.lock().unwrap();
        assert_eq!(
            *offsets,
            vec![
                Duration::ZERO,
                Duration::from_millis(100),
                Duration::from_millis(300),
            ]
        );
    }

    #[tokio::test]
    async fn test_exhausted_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let retry = Retry::new(Some(RetryPolicy::times(2)));

        let counter = calls.clone();
        let (data, error) = retry
            .run(|| {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, AtomicOrdering::Relaxed);
                    Err::<(), _>(TaskError::fail(format!("attempt {n}")))
                }
            })
            .await;

        assert!(data.is_none());
        assert_eq!(error, Some(TaskError::fail("attempt 2")));
        assert_eq!(calls.load(AtomicOrdering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_canceled_short_circuits_silently() {
        let calls = Arc::new(AtomicU32::new(0));
        let retry = Retry::new(Some(RetryPolicy::times(5)));

        let counter = calls.clone();
        let (data, error) = retry
            .run(|| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, AtomicOrdering::Relaxed);
                    Err::<(), _>(TaskError::Canceled)
                }
            })
            .await;

        assert!(data.is_none());
        assert!(error.is_none());
        assert_eq!(calls.load(AtomicOrdering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_no_policy_grants_single_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let retry = Retry::new(None);

        let counter = calls.clone();
        let (data, error) = retry
            .run(|| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, AtomicOrdering::Relaxed);
                    Err::<(), _>(TaskError::fail("x"))
                }
            })
            .await;

        assert!(data.is_none());
        assert_eq!(error, Some(TaskError::fail("x")));
        assert_eq!(calls.load(AtomicOrdering::Relaxed), 1);
    }
}
