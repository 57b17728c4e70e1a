//! # Executor: the run state machine.
//!
//! [`Executor`] orchestrates one logical run of the wrapped operation:
//!
//! ```text
//! execute(args):
//!   ├─► id = aborter.next()              (before any await)
//!   ├─► register key token               (aborts previous in-flight token)
//!   ├─► arm timeout watchdog             (fires → abort key + invalidate + idle)
//!   ├─► state = Loading, on_loading
//!   ├─► retry.run(op.call(args, child))  (suspension point)
//!   ├─► aborter.is_current(id)?
//!   │     ├─ no  → discard: no state, no hooks, Ok(None)
//!   │     └─ yes ├─ error    → state = Error, on_error, Err(error)
//!   │            ├─ data     → state = Success, on_success, arm polling
//!   │            └─ canceled → state = Idle (silent outcome)
//!   └─► always: clear watchdog; on_finally for the surviving execution
//! ```
//!
//! ## Rules
//! - Results are committed in **start order, gated by completion**: a run
//!   goes stale the instant a later run obtains an id, no matter which
//!   finishes first.
//! - A stale run commits nothing and fires no hooks; that outcome is
//!   distinct from cancellation (superseded vs. explicitly aborted), but
//!   both resolve `Ok(None)`.
//! - A timed-out run resolves `Ok(None)` and forces `Idle` without
//!   setting `error`; only an exhausted retry rejects. Callers rely on
//!   timeouts never throwing.
//! - Poll ticks skip while a run is still `Loading` (no overlap) and
//!   re-execute with the most recent arguments.
//! - The watchdog and poll loop re-enter the executor through a `Weak`
//!   self-reference; a dropped task ends them.

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use crate::abort::{Aborter, CancelRegistry};
use crate::config::TaskConfig;
use crate::error::TaskResult;
use crate::retry::Retry;
use crate::state::StateCell;
use crate::task::{Hooks, OpRef};
use crate::timers::TimerSet;

/// Drives one operation through loading, retries, commit, and timers.
///
/// Always constructed behind an `Arc`; timer closures hold the weak side.
pub struct Executor<A, T> {
    weak: Weak<Self>,
    op: OpRef<A, T>,
    config: TaskConfig,
    hooks: Hooks<T>,
    state: StateCell<T>,
    aborter: Aborter,
    timers: TimerSet,
    retry: Retry,
    last_args: Mutex<Option<A>>,
}

impl<A, T> Executor<A, T>
where
    A: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Assembles an executor and its owned collaborators.
    pub fn new(
        op: OpRef<A, T>,
        config: TaskConfig,
        hooks: Hooks<T>,
        registry: CancelRegistry,
    ) -> Arc<Self> {
        let aborter = Aborter::new(config.key.clone(), registry);
        let retry = Retry::new(config.retry);
        Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            op,
            config,
            hooks,
            state: StateCell::new(),
            aborter,
            timers: TimerSet::new(),
            retry,
            last_args: Mutex::new(None),
        })
    }

    /// Returns the operation's name.
    pub fn name(&self) -> &str {
        self.op.name()
    }

    /// The observable state owned by this executor.
    pub fn state(&self) -> &StateCell<T> {
        &self.state
    }

    /// Schedules a run, honoring the configured debounce window.
    ///
    /// Calls superseded inside the window resolve `Ok(None)`; only the
    /// newest scheduled call executes.
    pub async fn run(&self, args: A) -> TaskResult<T> {
        match self.config.debounce {
            Some(window) => {
                match self
                    .timers
                    .debounce(window, move || self.execute(args))
                    .await
                {
                    Some(result) => result,
                    None => Ok(None),
                }
            }
            None => self.execute(args).await,
        }
    }

    /// First-call-only entry point.
    ///
    /// Once initialized, returns the current `[data, error]` snapshot
    /// without re-invoking the operation; `reset()` re-arms it.
    pub async fn start(&self, args: A) -> TaskResult<T> {
        if self.state.initialized() {
            let snap = self.state.snapshot();
            return match snap.error {
                Some(error) => Err(error),
                None => Ok(snap.data),
            };
        }
        self.execute(args).await
    }

    /// Performs one logical run, bypassing debounce.
    pub async fn execute(&self, args: A) -> TaskResult<T> {
        let id = self.aborter.next();
        *self
            .last_args
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(args.clone());
        self.state.mark_initialized();

        // registering under the key aborts any previous in-flight token
        let token = self.aborter.register().unwrap_or_default();

        if let Some(window) = self.config.timeout {
            let exec = self.weak.clone();
            self.timers.start_timeout(window, move || {
                if let Some(exec) = exec.upgrade() {
                    exec.watchdog_fired();
                }
            });
        }

        self.state.set_loading();
        self.hooks.loading();

        let outcome = self
            .retry
            .run(|| self.op.call(args.clone(), token.child_token()))
            .await;

        let result = if !self.aborter.is_current(id) {
            tracing::debug!(op = %self.op.name(), ?id, "discarding stale result");
            Ok(None)
        } else {
            match outcome {
                (_, Some(error)) => {
                    self.state.set_error(error.clone());
                    self.hooks.error(&error);
                    Err(error)
                }
                (Some(data), None) => {
                    self.state.set_success(data.clone());
                    self.hooks.success(&data);
                    if let Some(polling) = self.config.polling {
                        self.arm_polling(polling.interval);
                    }
                    Ok(Some(data))
                }
                (None, None) => {
                    // canceled while still current: silent outcome
                    self.state.set_idle();
                    Ok(None)
                }
            }
        };

        self.timers.clear_timeout();
        if self.aborter.is_current(id) {
            let snap = self.state.snapshot();
            self.hooks.finally(snap.data.as_ref(), snap.error.as_ref());
        }
        result
    }

    /// Releases the key's token, stales out in-flight work, forces idle.
    ///
    /// Requires a configured cancellation key; warns and no-ops otherwise.
    pub fn stop(&self) {
        if !self.aborter.has_key() {
            tracing::warn!(op = %self.op.name(), "stop() requires a cancellation key; call ignored");
            return;
        }
        self.aborter.release_key();
        self.aborter.invalidate();
        self.state.set_idle();
    }

    /// Stales out in-flight work and wipes state, keeping `initialized`.
    pub fn clear(&self) {
        self.aborter.invalidate();
        self.state.clear();
    }

    /// Stales out in-flight work and fully resets state.
    pub fn reset(&self) {
        self.aborter.invalidate();
        self.state.reset();
    }

    /// Tears the executor down: stales out in-flight work, cancels all
    /// timers, releases the key, forces idle.
    ///
    /// The executor must not be used afterwards.
    pub fn dispose(&self) {
        self.aborter.invalidate();
        self.timers.dispose();
        self.aborter.release_key();
        self.state.set_idle();
    }

    fn watchdog_fired(&self) {
        tracing::debug!(op = %self.op.name(), "timeout watchdog fired; in-flight run goes stale");
        self.aborter.abort_key();
        self.aborter.invalidate();
        self.state.set_idle();
    }

    fn arm_polling(&self, interval: Duration) {
        let exec = self.weak.clone();
        self.timers.start_polling(interval, move || {
            let exec = exec.clone();
            async move {
                let Some(exec) = exec.upgrade() else {
                    return false;
                };
                if exec.state.is_loading() {
                    // never overlap an in-flight run
                    return true;
                }
                let args = exec
                    .last_args
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                if let Some(args) = args {
                    let _ = exec.execute(args).await;
                }
                true
            }
        });
    }
}

impl<A, T> std::fmt::Debug for Executor<A, T>
where
    A: Send + 'static,
    T: 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("op", &self.op.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
