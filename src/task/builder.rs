//! # Task builder.
//!
//! [`TaskBuilder`] assembles a [`Task`](crate::Task) with a fluent API:
//! configuration knobs, lifecycle hooks, an optional tracked argument
//! source, and the operation itself.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskcell::{RetryPolicy, TaskBuilder, TaskError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let task = TaskBuilder::new("lookup")
//!     .with_key("lookup")
//!     .with_debounce(Duration::from_millis(150))
//!     .with_retry(RetryPolicy::times(2).with_delay(Duration::from_millis(100)))
//!     .build(|id: u32, _ctx: CancellationToken| async move {
//!         Ok::<_, TaskError>(format!("record {id}"))
//!     });
//! # task.dispose();
//! # }
//! ```

use std::borrow::Cow;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::abort::CancelRegistry;
use crate::config::{PollingConfig, TaskConfig};
use crate::error::TaskError;
use crate::retry::RetryPolicy;
use crate::task::facade::Task;
use crate::task::hooks::Hooks;
use crate::task::op::{OpFn, OpRef};

/// Fluent builder for [`Task`].
pub struct TaskBuilder<A, T> {
    name: Cow<'static, str>,
    config: TaskConfig,
    registry: Option<CancelRegistry>,
    hooks: Hooks<T>,
    track: Option<watch::Receiver<A>>,
    eager: Option<A>,
}

impl<A, T> TaskBuilder<A, T>
where
    A: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a builder for a task with the given operation name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            config: TaskConfig::default(),
            registry: None,
            hooks: Hooks::default(),
            track: None,
            eager: None,
        }
    }

    /// Sets the cancellation/dedup key.
    pub fn with_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.config.key = Some(key.into());
        self
    }

    /// Uses a private registry instead of [`CancelRegistry::global`].
    pub fn with_registry(mut self, registry: CancelRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the debounce window applied by `run()`.
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.config.debounce = Some(window);
        self
    }

    /// Sets the per-run timeout watchdog.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Arms interval polling after successful runs.
    pub fn with_polling(mut self, interval: Duration) -> Self {
        self.config.polling = Some(PollingConfig::new(interval));
        self
    }

    /// Sets the retry policy for failed attempts.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = Some(retry);
        self
    }

    /// Tracks an argument source; every change re-runs the task.
    pub fn with_track(mut self, track: watch::Receiver<A>) -> Self {
        self.track = Some(track);
        self
    }

    /// Makes the task eager: it executes once with `args` at build time
    /// (bypassing debounce) instead of waiting for `start()`/`run()`.
    pub fn eager(mut self, args: A) -> Self {
        self.eager = Some(args);
        self
    }

    /// Sets the hook fired when a run enters loading.
    pub fn on_loading(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.on_loading = Some(Box::new(hook));
        self
    }

    /// Sets the hook fired when a surviving run commits data.
    pub fn on_success(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.hooks.on_success = Some(Box::new(hook));
        self
    }

    /// Sets the hook fired when a surviving run commits an error.
    pub fn on_error(mut self, hook: impl Fn(&TaskError) + Send + Sync + 'static) -> Self {
        self.hooks.on_error = Some(Box::new(hook));
        self
    }

    /// Sets the hook fired at the end of a surviving run.
    pub fn on_finally(
        mut self,
        hook: impl Fn(Option<&T>, Option<&TaskError>) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_finally = Some(Box::new(hook));
        self
    }

    /// Builds the task from a closure.
    ///
    /// Must be called within a tokio runtime: the watcher subscription
    /// and the eager call (if any) are spawned on it.
    pub fn build<F, Fut>(self, f: F) -> Task<A, T>
    where
        F: Fn(A, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        let op = OpFn::arc(self.name, f);
        Task::assemble(
            op,
            self.config,
            self.hooks,
            self.registry.unwrap_or_else(CancelRegistry::global),
            self.track,
            self.eager,
        )
    }

    /// Builds the task from an existing operation handle.
    pub fn build_from(self, op: OpRef<A, T>) -> Task<A, T> {
        Task::assemble(
            op,
            self.config,
            self.hooks,
            self.registry.unwrap_or_else(CancelRegistry::global),
            self.track,
            self.eager,
        )
    }
}

impl<A, T> std::fmt::Debug for TaskBuilder<A, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskBuilder")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("eager", &self.eager.is_some())
            .field("track", &self.track.is_some())
            .finish_non_exhaustive()
    }
}
