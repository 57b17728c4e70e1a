//! Staleness detection and cooperative cancellation.
//!
//! Two deliberately separate mechanisms live here:
//!
//! - [`Aborter`] issues strictly increasing execution ids. The id
//!   suppresses *state mutation* from stale results: a run whose captured
//!   id is no longer current commits nothing, even if it completed
//!   successfully.
//! - [`CancelRegistry`] maps caller-chosen keys to live
//!   [`CancellationToken`](tokio_util::sync::CancellationToken)s. The
//!   token suppresses *work in progress*: it tells an in-flight operation
//!   (possibly started outside any task) to stop.
//!
//! A stale execution may still be running physically; the id check is what
//! prevents it from corrupting observable state when it eventually settles.

mod aborter;
mod registry;

pub use aborter::{Aborter, ExecId};
pub use registry::CancelRegistry;
