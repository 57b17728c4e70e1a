//! # Shared cancellation-token registry.
//!
//! [`CancelRegistry`] maps caller-chosen keys to live
//! [`CancellationToken`]s. Registering a key aborts and replaces any token
//! already stored under it, so the newest registrant always wins.
//!
//! The registry is an explicit, cloneable handle. Task instances that
//! should coordinate cancellation share a handle (usually
//! [`CancelRegistry::global`]) and a key by convention; an external call
//! site holding the same key's token gets cancelled together with the
//! task's in-flight work.
//!
//! ## Rules
//! - `register` aborts the previous token for the key, then installs a
//!   fresh one
//! - `abort` cancels without removing (the key stays registered)
//! - `release` cancels and removes
//! - all operations are best-effort on missing keys (no errors)
//! - the map lock is never held across an await point

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::config::CancelKey;

static GLOBAL: OnceLock<CancelRegistry> = OnceLock::new();

/// Shared registry of cancellation tokens, keyed by caller-chosen names.
///
/// Clone-cheap (wraps an `Arc`); clones observe the same mapping. Two
/// unrelated tasks sharing a key on the same handle will cancel each
/// other's work — that sharing is the point, but it is opt-in per key.
#[derive(Clone, Debug, Default)]
pub struct CancelRegistry {
    inner: Arc<Mutex<HashMap<CancelKey, CancellationToken>>>,
}

impl CancelRegistry {
    /// Creates an empty, private registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    ///
    /// Tasks built without an explicit registry land here, preserving
    /// cross-instance coordination by key convention.
    pub fn global() -> Self {
        GLOBAL.get_or_init(Self::new).clone()
    }

    /// Installs a fresh token under `key`, aborting any previous one.
    ///
    /// Returns a clone of the installed token.
    pub fn register(&self, key: CancelKey) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self.lock().insert(key, token.clone());
        if let Some(old) = previous {
            old.cancel();
        }
        token
    }

    /// Cancels the token under `key` without removing it.
    ///
    /// No-op if the key is not registered.
    pub fn abort(&self, key: &str) {
        if let Some(token) = self.lock().get(key) {
            token.cancel();
        }
    }

    /// Cancels and removes the token under `key`.
    ///
    /// No-op if the key is not registered.
    pub fn release(&self, key: &str) {
        if let Some(token) = self.lock().remove(key) {
            token.cancel();
        }
    }

    /// Returns a clone of the live token under `key`, if any.
    ///
    /// External call sites use this to tie their own async work to the
    /// task's cancellation lifecycle.
    pub fn token(&self, key: &str) -> Option<CancellationToken> {
        self.lock().get(key).cloned()
    }

    /// True if a token is currently registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CancelKey, CancellationToken>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_aborts_and_replaces_previous() {
        let reg = CancelRegistry::new();
        let first = reg.register("fetch".into());
        assert!(!first.is_cancelled());

        let second = reg.register("fetch".into());
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(reg.contains("fetch"));
    }

    #[test]
    fn test_abort_cancels_but_keeps_key() {
        let reg = CancelRegistry::new();
        let token = reg.register("fetch".into());

        reg.abort("fetch");
        assert!(token.is_cancelled());
        assert!(reg.contains("fetch"));
    }

    #[test]
    fn test_release_cancels_and_removes() {
        let reg = CancelRegistry::new();
        let token = reg.register("fetch".into());

        reg.release("fetch");
        assert!(token.is_cancelled());
        assert!(!reg.contains("fetch"));
    }

    #[test]
    fn test_missing_keys_are_best_effort() {
        let reg = CancelRegistry::new();
        reg.abort("absent");
        reg.release("absent");
        assert!(reg.token("absent").is_none());
    }

    #[test]
    fn test_clones_share_the_mapping() {
        let reg = CancelRegistry::new();
        let other = reg.clone();

        let token = reg.register("shared".into());
        other.abort("shared");
        assert!(token.is_cancelled());
    }
}
