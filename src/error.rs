//! Error types produced by wrapped operations.
//!
//! This module defines [`TaskError`], the error surface of every operation
//! driven by a [`Task`](crate::Task), and [`TaskResult`], the outcome type
//! returned by `run`/`start`.
//!
//! Two cases matter to the engine:
//!
//! - [`TaskError::Fail`] — an ordinary failure. It is retried per
//!   [`RetryPolicy`](crate::RetryPolicy) and, once attempts are exhausted,
//!   committed to observable state and returned to the caller.
//! - [`TaskError::Canceled`] — the distinguished cancellation case. It is
//!   never retried, never stored as the task's `error`, and never surfaces
//!   to the caller as `Err`; the run resolves silently.

use thiserror::Error;

/// Outcome of one logical run.
///
/// - `Ok(Some(data))` — the run survived and committed `data`.
/// - `Ok(None)` — the run was superseded, canceled, timed out, or collapsed
///   by debounce; nothing was committed.
/// - `Err(e)` — the final retry attempt failed and `e` was committed.
pub type TaskResult<T> = Result<Option<T>, TaskError>;

/// # Errors produced by a wrapped operation.
///
/// Operations return `Result<T, TaskError>`. Arbitrary failure values are
/// normalized through [`TaskError::fail`], which keeps their string form.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Operation failed but may succeed if retried.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Operation observed cancellation and exited cooperatively.
    ///
    /// Raised when the operation acts on a signaled
    /// [`CancellationToken`](tokio_util::sync::CancellationToken).
    #[error("operation canceled")]
    Canceled,
}

impl TaskError {
    /// Normalizes any displayable failure into [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use taskcell::TaskError;
    ///
    /// let err = TaskError::fail("connection refused");
    /// assert_eq!(err.to_string(), "execution failed: connection refused");
    /// ```
    pub fn fail(error: impl ToString) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskcell::TaskError;
    ///
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// assert_eq!(TaskError::fail("x").as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// True for the distinguished cancellation case.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }

    /// Indicates whether the error is safe to retry.
    ///
    /// Cancellation is intentional and is never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskError::Fail { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_keeps_string_form() {
        let err = TaskError::fail(std::io::Error::other("boom"));
        assert_eq!(
            err,
            TaskError::Fail {
                error: "boom".into()
            }
        );
    }

    #[test]
    fn test_canceled_is_not_retryable() {
        assert!(!TaskError::Canceled.is_retryable());
        assert!(TaskError::Canceled.is_canceled());
        assert!(TaskError::fail("x").is_retryable());
    }
}
