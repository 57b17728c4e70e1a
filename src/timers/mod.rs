//! Scheduled-callback slots for debounce, timeout, and polling.
//!
//! [`TimerSet`] owns the three timers one task instance can arm. The slots
//! are mutually independent: cancelling one never affects the others, and
//! `dispose()` tears down all three, idempotently.

mod set;

pub use set::TimerSet;
