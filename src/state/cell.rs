//! # Observable state cell.
//!
//! [`StateCell`] owns the task's `data`/`error`/`status`/`initialized`
//! fields behind a [`tokio::sync::watch`] channel. Every transition goes
//! through [`watch::Sender::send_modify`], so a reader never observes an
//! intermediate state — `status` and the field it implies change together.
//!
//! ## Rules
//! - `set_loading` clears any stale `error` (a new run starts clean)
//! - `set_success` stores data and clears `error`
//! - `set_error` stores the error; `data` keeps its previous value and is
//!   cleared by the next `set_loading`/`clear`
//! - `clear` wipes everything back to idle but keeps `initialized`
//! - `reset` additionally drops `initialized`
//! - no method fails; transitions are plain field updates

use tokio::sync::watch;

use crate::error::TaskError;
use crate::state::status::TaskStatus;

/// One consistent view of a task's observable state.
#[derive(Clone, Debug)]
pub struct Snapshot<T> {
    /// Result of the latest surviving successful run.
    pub data: Option<T>,
    /// Error of the latest surviving failed run.
    pub error: Option<TaskError>,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// True once any run has started; survives `clear()`, dropped by `reset()`.
    pub initialized: bool,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            status: TaskStatus::Idle,
            initialized: false,
        }
    }
}

impl<T> Snapshot<T> {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.status.is_idle()
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }
}

/// Watch-channel backed holder of one task's observable state.
///
/// Cheap to share by reference; the engine commits transitions, consumers
/// read [`StateCell::snapshot`] or await [`StateCell::subscribe`].
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<Snapshot<T>>,
}

impl<T: Clone> StateCell<T> {
    /// Creates a cell in the idle, uninitialized state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Self { tx }
    }

    /// Transitions to `Loading`, clearing any stale error.
    pub fn set_loading(&self) {
        self.tx.send_modify(|s| {
            s.status = TaskStatus::Loading;
            s.error = None;
        });
    }

    /// Commits a successful result.
    pub fn set_success(&self, data: T) {
        self.tx.send_modify(|s| {
            s.status = TaskStatus::Success;
            s.data = Some(data);
            s.error = None;
        });
    }

    /// Commits a terminal error.
    pub fn set_error(&self, error: TaskError) {
        self.tx.send_modify(|s| {
            s.status = TaskStatus::Error;
            s.error = Some(error);
        });
    }

    /// Forces the status back to `Idle` without touching data or error.
    pub fn set_idle(&self) {
        self.tx.send_modify(|s| {
            s.status = TaskStatus::Idle;
        });
    }

    /// Wipes `data`/`error`/`status` back to idle, keeping `initialized`.
    pub fn clear(&self) {
        self.tx.send_modify(|s| {
            s.data = None;
            s.error = None;
            s.status = TaskStatus::Idle;
        });
    }

    /// Performs [`StateCell::clear`] and additionally drops `initialized`.
    pub fn reset(&self) {
        self.tx.send_modify(|s| {
            s.data = None;
            s.error = None;
            s.status = TaskStatus::Idle;
            s.initialized = false;
        });
    }

    /// Flips `initialized` to true; never reverts except via `reset()`.
    pub fn mark_initialized(&self) {
        self.tx.send_modify(|s| {
            s.initialized = true;
        });
    }

    /// Returns a consistent copy of the current state.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.tx.borrow().clone()
    }

    /// Creates a receiver that observes subsequent transitions.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }

    pub fn status(&self) -> TaskStatus {
        self.tx.borrow().status
    }

    pub fn data(&self) -> Option<T> {
        self.tx.borrow().data.clone()
    }

    pub fn error(&self) -> Option<TaskError> {
        self.tx.borrow().error.clone()
    }

    pub fn initialized(&self) -> bool {
        self.tx.borrow().initialized
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

impl<T: Clone> Default for StateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
