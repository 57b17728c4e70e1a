//! # Execution-id issuer.
//!
//! [`Aborter`] owns a strictly increasing counter of execution ids plus
//! this task's view of the shared [`CancelRegistry`]. Every logical run
//! captures an id at its start (before any await) and compares it against
//! the live counter after every suspension point: snapshot, then compare.
//!
//! ## Rules
//! - ids are task-instance scoped and never reused
//! - `invalidate` advances the counter without handing the id to anyone,
//!   retroactively staling every in-flight run
//! - the key operations delegate to the registry and are no-ops when the
//!   task was built without a key

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio_util::sync::CancellationToken;

use crate::abort::registry::CancelRegistry;
use crate::config::CancelKey;

/// Opaque execution identifier captured at the start of one logical run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExecId(u64);

/// Issues execution ids and manages this task's cancellation key.
#[derive(Debug)]
pub struct Aborter {
    seq: AtomicU64,
    key: Option<CancelKey>,
    registry: CancelRegistry,
}

impl Aborter {
    /// Creates an aborter bound to `key` (if any) on `registry`.
    pub fn new(key: Option<CancelKey>, registry: CancelRegistry) -> Self {
        Self {
            seq: AtomicU64::new(0),
            key,
            registry,
        }
    }

    /// Increments and returns the new current id.
    ///
    /// Every logical run calls this exactly once, before any await.
    pub fn next(&self) -> ExecId {
        ExecId(self.seq.fetch_add(1, AtomicOrdering::Relaxed) + 1)
    }

    /// True iff `id` is the latest value handed out by [`Aborter::next`].
    pub fn is_current(&self, id: ExecId) -> bool {
        self.seq.load(AtomicOrdering::Relaxed) == id.0
    }

    /// Advances the counter without producing a usable id.
    ///
    /// Used by `clear()`/`reset()`/`stop()`/`dispose()` to stale-out any
    /// in-flight execution.
    pub fn invalidate(&self) {
        self.seq.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// True when this task was built with a cancellation key.
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Registers a fresh token under this task's key, aborting any
    /// previous in-flight token sharing it.
    ///
    /// Returns `None` when no key is configured.
    pub fn register(&self) -> Option<CancellationToken> {
        self.key
            .as_ref()
            .map(|key| self.registry.register(key.clone()))
    }

    /// Cancels the key's token without removing it. No-op without a key.
    pub fn abort_key(&self) {
        if let Some(key) = &self.key {
            self.registry.abort(key);
        }
    }

    /// Cancels and removes the key's token. No-op without a key.
    pub fn release_key(&self) {
        if let Some(key) = &self.key {
            self.registry.release(key);
        }
    }
}
