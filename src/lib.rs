//! # taskcell
//!
//! **Taskcell** is a lightweight async-operation state engine for Rust.
//!
//! It wraps a single logical async operation into a reusable [`Task`]
//! handle with observable state, race-safe result commits, retry with
//! backoff, debounce, timeout watchdogs, interval polling, and key-based
//! cooperative cancellation. The crate is designed as a building block
//! for services that fire the same operation many times and only ever
//! want the freshest result.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!          ┌───────────────────────────────────────────────┐
//!          │  Task (façade)                                │
//!          │  run / start / stop / clear / reset / dispose │
//!          └───────────────┬───────────────┬───────────────┘
//!                          ▼               ▼
//!               ┌─────────────────┐   ┌──────────────────────┐
//!               │    Executor     │◄──│       Watcher        │
//!               │ (run state      │   │ (tracked args → run) │
//!               │  machine)       │   └──────────────────────┘
//!               └──┬───┬───┬───┬──┘
//!                  ▼   ▼   ▼   ▼
//!          ┌───────┐ ┌─────┐ ┌────────┐ ┌─────────────────┐
//!          │ State │ │Retry│ │TimerSet│ │     Aborter     │
//!          │ Cell  │ │     │ │        │ │  (exec ids) ────┼──► CancelRegistry
//!          └───────┘ └─────┘ └────────┘ └─────────────────┘      (shared by key)
//! ```
//!
//! ### One logical run
//! ```text
//! run(args)
//!   ├─► debounce window (optional; only the newest burst call survives)
//!   └─► execute(args)
//!         ├─► capture execution id          (snapshot…)
//!         ├─► register key token            (aborts previous in-flight)
//!         ├─► arm timeout watchdog
//!         ├─► Loading + on_loading
//!         ├─► Retry loop over op.call(args, child_token)
//!         ├─► id still current?             (…then compare)
//!         │     ├─ no  → discard, Ok(None)
//!         │     └─ yes → commit Success/Error/Idle + hooks, arm polling
//!         └─► clear watchdog; on_finally for the surviving run
//! ```
//!
//! ## Semantics
//! - **Last-started wins**: overlapping runs are resolved by execution id,
//!   not completion order. A superseded run commits nothing and fires no
//!   hooks, no matter how it settles.
//! - **Cancellation is silent**: an operation that returns
//!   [`TaskError::Canceled`] neither retries nor reports an error.
//! - **Timeouts never reject**: a timed-out run resolves `Ok(None)` and
//!   forces the state back to idle, leaving `error` unset.
//! - **Cancellation keys are shared by convention**: tasks (and external
//!   call sites) registering the same key on the same [`CancelRegistry`]
//!   cancel each other's in-flight work.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskcell::{RetryPolicy, TaskBuilder, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), TaskError> {
//!     let task = TaskBuilder::new("lookup")
//!         .with_key("lookup")
//!         .with_retry(RetryPolicy::times(2).with_delay(Duration::from_millis(100)))
//!         .on_success(|record: &String| println!("got {record}"))
//!         .build(|id: u32, _ctx: CancellationToken| async move {
//!             // fetch, compute, whatever returns Result<T, TaskError>
//!             Ok(format!("record {id}"))
//!         });
//!
//!     let record = task.run(7).await?;
//!     assert_eq!(record.as_deref(), Some("record 7"));
//!     assert!(task.is_success());
//!
//!     task.dispose();
//!     Ok(())
//! }
//! ```

mod abort;
mod config;
mod error;
mod exec;
mod retry;
mod state;
mod task;
mod timers;

// ---- Public re-exports ----

pub use abort::{Aborter, CancelRegistry, ExecId};
pub use config::{CancelKey, PollingConfig, TaskConfig};
pub use error::{TaskError, TaskResult};
pub use exec::{Executor, Watcher};
pub use retry::{JitterPolicy, Retry, RetryPolicy};
pub use state::{Snapshot, StateCell, TaskStatus};
pub use task::{Hooks, OpFn, OpRef, Operation, Task, TaskBuilder};
