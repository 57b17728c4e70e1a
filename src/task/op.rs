//! # Operation abstraction and function-backed implementation.
//!
//! This module defines the [`Operation`] trait (async, cancelable, takes
//! the run's arguments) and a convenient function-backed implementation
//! [`OpFn`]. The common handle type is [`OpRef`], an `Arc<dyn Operation>`
//! suitable for sharing with the executor and its timers.
//!
//! An operation receives a child [`CancellationToken`] per attempt and
//! should return [`TaskError::Canceled`] when it acts on a signaled token,
//! so the engine can distinguish intentional cancellation from failure.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Shared handle to an operation.
pub type OpRef<A, T> = Arc<dyn Operation<A, T>>;

/// # Asynchronous, cancelable, argument-taking unit of work.
///
/// An `Operation` has a stable [`name`](Operation::name) and an async
/// [`call`](Operation::call) that receives the run's arguments and a
/// [`CancellationToken`]. Implementors that start interruptible work
/// should watch the token and exit with [`TaskError::Canceled`].
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use taskcell::{Operation, TaskError};
///
/// struct Fetch;
///
/// #[async_trait]
/// impl Operation<u32, String> for Fetch {
///     fn name(&self) -> &str { "fetch" }
///
///     async fn call(&self, id: u32, ctx: CancellationToken) -> Result<String, TaskError> {
///         if ctx.is_cancelled() {
///             return Err(TaskError::Canceled);
///         }
///         Ok(format!("record {id}"))
///     }
/// }
/// ```
#[async_trait]
pub trait Operation<A, T>: Send + Sync + 'static
where
    A: Send + 'static,
    T: 'static,
{
    /// Returns a stable, human-readable operation name.
    fn name(&self) -> &str;

    /// Executes one attempt with the given arguments.
    async fn call(&self, args: A, ctx: CancellationToken) -> Result<T, TaskError>;
}

/// Function-backed operation implementation.
///
/// Wraps a closure that *creates* a new future per call, so attempts never
/// share hidden mutable state; use an explicit `Arc<...>` inside the
/// closure when shared state is intended.
#[derive(Debug)]
pub struct OpFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> OpFn<F> {
    /// Creates a new function-backed operation.
    ///
    /// Prefer [`OpFn::arc`] when you immediately need an [`OpRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the operation and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut, A, T> Operation<A, T> for OpFn<F>
where
    F: Fn(A, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    A: Send + 'static,
    T: 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, args: A, ctx: CancellationToken) -> Result<T, TaskError> {
        (self.f)(args, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_op_fn_forwards_args_and_token() {
        let op = OpFn::arc("double", |n: u32, ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                return Err(TaskError::Canceled);
            }
            Ok(n * 2)
        });
        assert_eq!(op.name(), "double");

        let token = CancellationToken::new();
        assert_eq!(op.call(21, token.clone()).await, Ok(42));

        token.cancel();
        assert_eq!(op.call(21, token).await, Err(TaskError::Canceled));
    }
}
