//! # Per-task configuration.
//!
//! [`TaskConfig`] bundles the knobs that shape one task's execution:
//! cancellation key, debounce window, timeout watchdog, polling interval,
//! and retry policy. Absent knobs are `None` — there are no zero sentinels.
//!
//! The config is assembled by [`TaskBuilder`](crate::TaskBuilder) and
//! consumed by the [`Executor`](crate::Executor); it never changes after
//! construction.

use std::borrow::Cow;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Caller-chosen cancellation key.
///
/// Tasks (and unrelated async call sites) that register under the same key
/// on the same [`CancelRegistry`](crate::CancelRegistry) cancel each
/// other's in-flight work.
pub type CancelKey = Cow<'static, str>;

/// Interval polling configuration.
///
/// When set, a successful run arms a repeating timer that re-executes the
/// operation every `interval`, skipping ticks that would overlap a run
/// still in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollingConfig {
    /// Delay between poll-triggered re-executions.
    pub interval: Duration,
}

impl PollingConfig {
    /// Creates a polling configuration with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

/// Configuration for a single [`Task`](crate::Task).
///
/// ## Field semantics
/// - `key`: cancellation/dedup key; required for `stop()` and for
///   cross-instance cancellation. `None` = runs are only superseded, never
///   externally aborted.
/// - `debounce`: quiet window applied by `run()`; a burst of calls inside
///   the window collapses into the last one. `None` = execute immediately.
/// - `timeout`: per-run watchdog; on firing, the in-flight result goes
///   stale and state returns to idle. `None` = no watchdog.
/// - `polling`: repeating re-execution after a successful run.
/// - `retry`: attempts and delays for failed runs. `None` = one attempt.
#[derive(Clone, Debug, Default)]
pub struct TaskConfig {
    /// Cancellation/dedup key, shared by convention.
    pub key: Option<CancelKey>,
    /// Debounce window for `run()` calls.
    pub debounce: Option<Duration>,
    /// Per-run timeout watchdog.
    pub timeout: Option<Duration>,
    /// Interval polling armed after a successful run.
    pub polling: Option<PollingConfig>,
    /// Retry policy for failed attempts.
    pub retry: Option<RetryPolicy>,
}

impl TaskConfig {
    /// True when a cancellation key is configured.
    #[inline]
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }
}
