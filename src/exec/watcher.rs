//! # Watcher: dependency-triggered re-runs.
//!
//! [`Watcher`] subscribes to a caller-supplied `watch::Receiver` of
//! arguments and re-invokes [`Executor::run`] with every new value —
//! `run`, never `execute`, so debounce applies to dependency-triggered
//! re-runs too.
//!
//! ## Rules
//! - Tracking is **edge-triggered**: the value present at subscription
//!   time never fires; the initial run comes from an explicit
//!   `start()`/`run()` (or the eager path of the façade).
//! - Changes arriving while a triggered run is in flight coalesce into
//!   one follow-up run with the newest value.
//! - `setup()` subscribes at most once; `dispose()` unsubscribes and is
//!   idempotent.
//! - The loop holds a `Weak` executor and ends when the sender or the
//!   task goes away.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::exec::executor::Executor;

/// Re-runs the executor whenever a tracked argument source changes.
pub struct Watcher<A, T> {
    executor: Arc<Executor<A, T>>,
    track: Mutex<Option<watch::Receiver<A>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<A, T> std::fmt::Debug for Watcher<A, T>
where
    A: Send + 'static + std::fmt::Debug,
    T: 'static + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("executor", &self.executor)
            .field("track", &self.track)
            .field("handle", &self.handle)
            .finish()
    }
}

impl<A, T> Watcher<A, T>
where
    A: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a watcher over an optional argument source.
    pub fn new(executor: Arc<Executor<A, T>>, track: Option<watch::Receiver<A>>) -> Self {
        Self {
            executor,
            track: Mutex::new(track),
            handle: Mutex::new(None),
        }
    }

    /// Subscribes to the tracked source, once.
    ///
    /// No-op when no source was supplied or a subscription already exists.
    pub fn setup(&self) {
        let mut slot = lock(&self.handle);
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        let Some(mut rx) = lock(&self.track).take() else {
            return;
        };

        let exec = Arc::downgrade(&self.executor);
        *slot = Some(tokio::spawn(async move {
            loop {
                if rx.changed().await.is_err() {
                    break;
                }
                let args = rx.borrow_and_update().clone();
                let Some(exec) = exec.upgrade() else {
                    break;
                };
                let _ = exec.run(args).await;
            }
        }));
    }

    /// Unsubscribes. Idempotent.
    pub fn dispose(&self) {
        if let Some(handle) = lock(&self.handle).take() {
            handle.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abort::CancelRegistry;
    use crate::config::TaskConfig;
    use crate::error::TaskError;
    use crate::task::{Hooks, OpFn};
    use std::time::Duration;
    use tokio::time;
    use tokio_util::sync::CancellationToken;

    fn doubler() -> Arc<Executor<u32, u32>> {
        let op = OpFn::arc("double", |n: u32, _ctx: CancellationToken| async move {
            Ok::<_, TaskError>(n * 2)
        });
        Executor::new(
            op,
            TaskConfig::default(),
            Hooks::default(),
            CancelRegistry::new(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_value_does_not_fire() {
        let exec = doubler();
        let (_tx, rx) = watch::channel(1u32);

        let watcher = Watcher::new(Arc::clone(&exec), Some(rx));
        watcher.setup();

        time::sleep(Duration::from_millis(10)).await;
        assert!(exec.state().data().is_none());
        assert!(!exec.state().initialized());
        watcher.dispose();
    }

    #[tokio::test(start_paused = true)]
    async fn test_changes_trigger_runs_with_new_args() {
        let exec = doubler();
        let (tx, rx) = watch::channel(1u32);

        let watcher = Watcher::new(Arc::clone(&exec), Some(rx));
        watcher.setup();
        watcher.setup(); // second setup is a no-op

        tx.send(4).unwrap();
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(exec.state().data(), Some(8));

        tx.send(5).unwrap();
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(exec.state().data(), Some(10));

        watcher.dispose();
        watcher.dispose();

        tx.send(6).unwrap();
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(exec.state().data(), Some(10));
    }
}
