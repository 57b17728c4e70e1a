//! # Task status.
//!
//! [`TaskStatus`] classifies the observable lifecycle of a task:
//! `Idle → Loading → Success | Error`, with `clear()`/`reset()`/timeouts
//! returning it to `Idle`. Exactly one status holds at any time; the
//! boolean views are pure functions of it.

/// Observable lifecycle status of a task.
///
/// - `Loading` implies an execution is in flight.
/// - `Error` implies the `error` field is set.
/// - `Success` implies the `data` field is set and `error` is cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskStatus {
    /// No run committed; the initial state and the post-clear state.
    #[default]
    Idle,
    /// A run is in flight.
    Loading,
    /// The latest surviving run committed data.
    Success,
    /// The latest surviving run exhausted its attempts and committed an error.
    Error,
}

impl TaskStatus {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskStatus::Idle => "idle",
            TaskStatus::Loading => "loading",
            TaskStatus::Success => "success",
            TaskStatus::Error => "error",
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, TaskStatus::Idle)
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self, TaskStatus::Loading)
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, TaskStatus::Error)
    }
}
