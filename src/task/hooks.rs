//! # Lifecycle hooks.
//!
//! [`Hooks`] is the optional-callback bundle fired around state
//! transitions: every slot is nullable and checked before the call.
//!
//! ## Rules
//! - Hooks fire **after** the matching state commit, so a panicking hook
//!   cannot leave engine state inconsistent; the panic propagates to the
//!   caller of `run`/`start`.
//! - A superseded or invalidated execution fires no hooks at all;
//!   `on_finally` fires once per *surviving* execution, with the committed
//!   state values.

use crate::error::TaskError;

type LoadingHook = Box<dyn Fn() + Send + Sync>;
type SuccessHook<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorHook = Box<dyn Fn(&TaskError) + Send + Sync>;
type FinallyHook<T> = Box<dyn Fn(Option<&T>, Option<&TaskError>) + Send + Sync>;

/// Optional lifecycle callbacks for one task.
pub struct Hooks<T> {
    /// Fired when a run enters `Loading`.
    pub on_loading: Option<LoadingHook>,
    /// Fired when a surviving run commits data.
    pub on_success: Option<SuccessHook<T>>,
    /// Fired when a surviving run commits an error.
    pub on_error: Option<ErrorHook>,
    /// Fired at the end of a surviving run with the committed state.
    pub on_finally: Option<FinallyHook<T>>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self {
            on_loading: None,
            on_success: None,
            on_error: None,
            on_finally: None,
        }
    }
}

impl<T> Hooks<T> {
    pub(crate) fn loading(&self) {
        if let Some(hook) = &self.on_loading {
            hook();
        }
    }

    pub(crate) fn success(&self, data: &T) {
        if let Some(hook) = &self.on_success {
            hook(data);
        }
    }

    pub(crate) fn error(&self, error: &TaskError) {
        if let Some(hook) = &self.on_error {
            hook(error);
        }
    }

    pub(crate) fn finally(&self, data: Option<&T>, error: Option<&TaskError>) {
        if let Some(hook) = &self.on_finally {
            hook(data, error);
        }
    }
}

impl<T> std::fmt::Debug for Hooks<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("on_loading", &self.on_loading.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_finally", &self.on_finally.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    #[test]
    fn test_empty_hooks_are_noops() {
        let hooks: Hooks<u32> = Hooks::default();
        hooks.loading();
        hooks.success(&1);
        hooks.error(&TaskError::fail("x"));
        hooks.finally(Some(&1), None);
    }

    #[test]
    fn test_set_hooks_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let count = fired.clone();
        let hooks: Hooks<u32> = Hooks {
            on_success: Some(Box::new(move |data| {
                assert_eq!(*data, 7);
                count.fetch_add(1, AtomicOrdering::Relaxed);
            })),
            ..Hooks::default()
        };

        hooks.success(&7);
        assert_eq!(fired.load(AtomicOrdering::Relaxed), 1);
    }
}
