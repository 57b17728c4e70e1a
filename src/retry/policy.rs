//! # Retry policy.
//!
//! [`RetryPolicy`] controls how many attempts a failing run gets and how
//! long to wait between them. It is parameterized by:
//! - [`RetryPolicy::count`] — the number of *retries*; total attempts are
//!   `count + 1`;
//! - [`RetryPolicy::delay`] — the base inter-attempt delay;
//! - [`RetryPolicy::backoff`] — flat vs. exponential growth;
//! - [`RetryPolicy::max_delay`] — the delay cap;
//! - [`RetryPolicy::jitter`] — randomization applied last.
//!
//! The delay before overall attempt `k` (1-indexed retry, i.e. the 2nd
//! overall attempt has `k = 1`) is `delay` when `backoff` is off, else
//! `delay × 2^(k-1)`, clamped to `max_delay`. The base is derived purely
//! from the attempt number; jitter output never feeds back into subsequent
//! calculations.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use taskcell::RetryPolicy;
//!
//! let policy = RetryPolicy::times(3)
//!     .with_delay(Duration::from_millis(100))
//!     .with_backoff();
//!
//! assert_eq!(policy.attempts(), 4);
//! assert_eq!(policy.delay_for(1), Duration::from_millis(100));
//! assert_eq!(policy.delay_for(2), Duration::from_millis(200));
//! assert_eq!(policy.delay_for(3), Duration::from_millis(400));
//! ```

use std::time::Duration;

use crate::retry::jitter::JitterPolicy;

/// Retry policy for failed attempts.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Number of retries after the initial attempt.
    pub count: u32,
    /// Base delay before a retry.
    pub delay: Duration,
    /// When true, the delay doubles for each further retry.
    pub backoff: bool,
    /// Maximum delay cap for retries.
    pub max_delay: Duration,
    /// Jitter policy applied to the clamped delay.
    pub jitter: JitterPolicy,
}

impl Default for RetryPolicy {
    /// Returns a policy with:
    /// - `count = 0` (single attempt);
    /// - `delay = 0`;
    /// - `backoff` off;
    /// - `max_delay = 30s`;
    /// - `jitter = None`.
    fn default() -> Self {
        Self {
            count: 0,
            delay: Duration::ZERO,
            backoff: false,
            max_delay: Duration::from_secs(30),
            jitter: JitterPolicy::None,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with `count` retries and no delay.
    pub fn times(count: u32) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Sets the base inter-attempt delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enables exponential growth of the delay.
    pub fn with_backoff(mut self) -> Self {
        self.backoff = true;
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Sets the jitter policy.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Total attempts granted by this policy.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.count.saturating_add(1)
    }

    /// Computes the delay before overall attempt `k` (`k >= 1`).
    ///
    /// The base is `delay` flat or `delay × 2^(k-1)` with backoff, clamped
    /// to [`RetryPolicy::max_delay`]; jitter is applied to the clamped
    /// base and is **never** fed back into later attempts.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        debug_assert!(attempt >= 1, "delay_for is defined for retries only");
        let base = if self.backoff {
            let exponent = attempt.saturating_sub(1).min(31);
            self.delay.saturating_mul(1u32 << exponent)
        } else {
            self.delay
        };
        self.jitter.apply(base.min(self.max_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempts_is_count_plus_one() {
        assert_eq!(RetryPolicy::times(0).attempts(), 1);
        assert_eq!(RetryPolicy::times(2).attempts(), 3);
        assert_eq!(RetryPolicy::times(u32::MAX).attempts(), u32::MAX);
    }

    #[test]
    fn test_flat_delay_is_constant() {
        let policy = RetryPolicy::times(5).with_delay(Duration::from_millis(100));
        for attempt in 1..=5 {
            assert_eq!(policy.delay_for(attempt), Duration::from_millis(100));
        }
    }

    #[test]
    fn test_exponential_growth() {
        let policy = RetryPolicy::times(4)
            .with_delay(Duration::from_millis(100))
            .with_backoff();

        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(4), Duration::from_millis(800));
    }

    #[test]
    fn test_clamped_to_max_delay() {
        let policy = RetryPolicy::times(20)
            .with_delay(Duration::from_millis(100))
            .with_backoff()
            .with_max_delay(Duration::from_secs(1));

        assert_eq!(policy.delay_for(10), Duration::from_secs(1));
        assert_eq!(policy.delay_for(20), Duration::from_secs(1));
    }

    #[test]
    fn test_huge_attempt_does_not_overflow() {
        let policy = RetryPolicy::times(u32::MAX)
            .with_delay(Duration::from_millis(100))
            .with_backoff()
            .with_max_delay(Duration::from_secs(60));

        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_full_jitter_never_exceeds_base() {
        let policy = RetryPolicy::times(5)
            .with_delay(Duration::from_millis(1000))
            .with_jitter(JitterPolicy::Full);

        for _ in 0..50 {
            assert!(policy.delay_for(1) <= Duration::from_millis(1000));
        }
    }
}
