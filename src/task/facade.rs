//! # Task: the public operation handle.
//!
//! [`Task`] composes the engine — state cell, aborter, timers, retry,
//! executor, watcher — into one handle owning a single logical async
//! operation across many invocations.
//!
//! ## Construction order
//! State, aborter, timers, and retry are assembled inside the executor;
//! the watcher subscribes on top of it; an eager task then performs its
//! initial `execute` (not `run`, bypassing debounce) with the configured
//! initial arguments.
//!
//! ## Lifecycle
//! The handle is typically owned by a long-lived service object and reused
//! for every invocation of the operation. The owner must call
//! [`Task::dispose`] when done — timers and key tokens are not cleaned up
//! by drop alone.

use std::borrow::Cow;
use std::sync::Arc;

use tokio::sync::watch;

use crate::abort::CancelRegistry;
use crate::config::TaskConfig;
use crate::error::{TaskError, TaskResult};
use crate::exec::{Executor, Watcher};
use crate::state::{Snapshot, TaskStatus};
use crate::task::builder::TaskBuilder;
use crate::task::hooks::Hooks;
use crate::task::op::OpRef;

/// Handle to one managed async operation.
///
/// See the [crate docs](crate) for the full semantics; in short:
/// - [`Task::run`] schedules a run (honoring debounce),
/// - [`Task::start`] runs only once, then serves the cached snapshot,
/// - overlapping runs resolve in favor of the **last started** one,
/// - observable state is available as snapshots or a watch subscription.
pub struct Task<A, T> {
    executor: Arc<Executor<A, T>>,
    watcher: Watcher<A, T>,
}

impl<A, T> std::fmt::Debug for Task<A, T>
where
    A: Send + 'static + std::fmt::Debug,
    T: 'static + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("executor", &self.executor)
            .field("watcher", &self.watcher)
            .finish()
    }
}

impl<A, T> Task<A, T>
where
    A: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a builder for constructing a task with a fluent API.
    pub fn builder(name: impl Into<Cow<'static, str>>) -> TaskBuilder<A, T> {
        TaskBuilder::new(name)
    }

    pub(crate) fn assemble(
        op: OpRef<A, T>,
        config: TaskConfig,
        hooks: Hooks<T>,
        registry: CancelRegistry,
        track: Option<watch::Receiver<A>>,
        eager: Option<A>,
    ) -> Self {
        let executor = Executor::new(op, config, hooks, registry);
        let watcher = Watcher::new(Arc::clone(&executor), track);
        watcher.setup();

        if let Some(args) = eager {
            let exec = Arc::clone(&executor);
            tokio::spawn(async move {
                let _ = exec.execute(args).await;
            });
        }

        Self { executor, watcher }
    }

    /// Returns the operation's name.
    pub fn name(&self) -> &str {
        self.executor.name()
    }

    /// Schedules a run, honoring the configured debounce window.
    pub async fn run(&self, args: A) -> TaskResult<T> {
        self.executor.run(args).await
    }

    /// Runs once; afterwards serves the cached `[data, error]` snapshot
    /// until [`Task::reset`].
    pub async fn start(&self, args: A) -> TaskResult<T> {
        self.executor.start(args).await
    }

    /// Releases the cancellation key, stales out in-flight work, forces
    /// idle. Warns and no-ops when no key is configured.
    pub fn stop(&self) {
        self.executor.stop();
    }

    /// Stales out in-flight work and wipes state, keeping `initialized`.
    pub fn clear(&self) {
        self.executor.clear();
    }

    /// Stales out in-flight work and fully resets state, re-arming
    /// [`Task::start`].
    pub fn reset(&self) {
        self.executor.reset();
    }

    /// Tears the task down: unsubscribes the watcher, cancels all timers,
    /// releases the key, forces idle. The task must not be used after.
    pub fn dispose(&self) {
        self.watcher.dispose();
        self.executor.dispose();
    }

    /// Returns a consistent copy of the observable state.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.executor.state().snapshot()
    }

    /// Creates a receiver observing subsequent state transitions.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.executor.state().subscribe()
    }

    pub fn data(&self) -> Option<T> {
        self.executor.state().data()
    }

    pub fn error(&self) -> Option<TaskError> {
        self.executor.state().error()
    }

    pub fn status(&self) -> TaskStatus {
        self.executor.state().status()
    }

    pub fn initialized(&self) -> bool {
        self.executor.state().initialized()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.status().is_idle()
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.status().is_loading()
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.status().is_error()
    }
}
