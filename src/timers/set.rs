//! # Per-task timer slots.
//!
//! [`TimerSet`] provides three independent scheduled-callback slots:
//!
//! - **debounce** — generation-counted supersession. Every call bumps the
//!   generation, sleeps out the quiet window, and only runs its thunk if
//!   no newer call arrived meanwhile. Superseded callers resolve to
//!   `None`; only the most recent scheduled call ever fires.
//! - **timeout** — a single-shot watchdog on a spawned sleep. Starting a
//!   new one clears any previous one.
//! - **polling** — a repeating sleep-first loop. Starting is a no-op while
//!   a loop is already live (no duplicate intervals); the tick callback
//!   returns `false` to end the loop.
//!
//! ## Rules
//! - slots never interact; `stop_polling` leaves a pending timeout alone
//! - every cancel is idempotent
//! - `dispose` cancels all three and is safe to call repeatedly
//! - handle locks are never held across an await point

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

/// Debounce, timeout, and polling timers for one task instance.
#[derive(Debug, Default)]
pub struct TimerSet {
    debounce_gen: AtomicU64,
    timeout: Mutex<Option<JoinHandle<()>>>,
    polling: Mutex<Option<JoinHandle<()>>>,
}

impl TimerSet {
    /// Creates a set with all slots inactive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `thunk` after `delay` of quiet, unless superseded.
    ///
    /// Returns `Some(result)` for the newest scheduled call, `None` for
    /// calls that a later `debounce` (or [`TimerSet::cancel_debounce`])
    /// superseded while they slept.
    pub async fn debounce<F, Fut, R>(&self, delay: Duration, thunk: F) -> Option<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        let generation = self.debounce_gen.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        time::sleep(delay).await;
        if self.debounce_gen.load(AtomicOrdering::Relaxed) != generation {
            return None;
        }
        Some(thunk().await)
    }

    /// Supersedes any pending debounce call without scheduling a new one.
    pub fn cancel_debounce(&self) {
        self.debounce_gen.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Arms the single-shot watchdog, clearing any previous one.
    ///
    /// `on_timeout` runs on a spawned task after `delay`, unless
    /// [`TimerSet::clear_timeout`] wins the race.
    pub fn start_timeout<F>(&self, delay: Duration, on_timeout: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            on_timeout();
        });
        if let Some(previous) = lock(&self.timeout).replace(handle) {
            previous.abort();
        }
    }

    /// Cancels the watchdog if armed. Idempotent.
    pub fn clear_timeout(&self) {
        if let Some(handle) = lock(&self.timeout).take() {
            handle.abort();
        }
    }

    /// Starts the repeating poll loop; no-op while one is already live.
    ///
    /// The loop sleeps `interval` first, then awaits `tick()`; a tick
    /// returning `false` ends the loop.
    pub fn start_polling<F, Fut>(&self, interval: Duration, tick: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send,
    {
        let mut slot = lock(&self.polling);
        if let Some(handle) = slot.as_ref() {
            if !handle.is_finished() {
                return;
            }
        }
        *slot = Some(tokio::spawn(async move {
            loop {
                time::sleep(interval).await;
                if !tick().await {
                    break;
                }
            }
        }));
    }

    /// Stops the poll loop if live. Idempotent.
    pub fn stop_polling(&self) {
        if let Some(handle) = lock(&self.polling).take() {
            handle.abort();
        }
    }

    /// True while the poll loop is live.
    pub fn is_polling(&self) -> bool {
        lock(&self.polling)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels all three slots. Safe to call multiple times.
    pub fn dispose(&self) {
        self.cancel_debounce();
        self.clear_timeout();
        self.stop_polling();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_debounce_only_newest_call_fires() {
        let timers = Arc::new(TimerSet::new());
        let window = Duration::from_millis(50);

        let (a, b, c) = tokio::join!(
            timers.debounce(window, || async { 1 }),
            timers.debounce(window, || async { 2 }),
            timers.debounce(window, || async { 3 }),
        );
        assert_eq!(a, None);
        assert_eq!(b, None);
        assert_eq!(c, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_debounce_supersedes_pending_call() {
        let timers = TimerSet::new();
        let pending = timers.debounce(Duration::from_millis(50), || async { 1 });
        tokio::pin!(pending);

        // let the window start ticking, then supersede it
        tokio::select! {
            biased;
            _ = &mut pending => unreachable!("window has not elapsed"),
            _ = time::sleep(Duration::from_millis(10)) => timers.cancel_debounce(),
        }
        assert_eq!(pending.await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires_once_and_restart_replaces() {
        let timers = TimerSet::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let count = fired.clone();
        timers.start_timeout(Duration::from_millis(100), move || {
            count.fetch_add(1, AtomicOrdering::Relaxed);
        });
        // restarting clears the first watchdog before it fires
        let count = fired.clone();
        timers.start_timeout(Duration::from_millis(100), move || {
            count.fetch_add(1, AtomicOrdering::Relaxed);
        });

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(AtomicOrdering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_timeout_prevents_firing() {
        let timers = TimerSet::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let count = fired.clone();
        timers.start_timeout(Duration::from_millis(100), move || {
            count.fetch_add(1, AtomicOrdering::Relaxed);
        });
        timers.clear_timeout();
        timers.clear_timeout();

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(AtomicOrdering::Relaxed), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_is_not_duplicated() {
        let timers = TimerSet::new();
        let ticks = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = ticks.clone();
            timers.start_polling(Duration::from_millis(10), move || {
                let count = count.clone();
                async move {
                    count.fetch_add(1, AtomicOrdering::Relaxed);
                    true
                }
            });
        }
        assert!(timers.is_polling());

        time::sleep(Duration::from_millis(35)).await;
        timers.stop_polling();
        assert!(!timers.is_polling());

        // one loop, one tick per interval
        assert_eq!(ticks.load(AtomicOrdering::Relaxed), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_tick_can_end_the_loop() {
        let timers = TimerSet::new();
        let ticks = Arc::new(AtomicUsize::new(0));

        let count = ticks.clone();
        timers.start_polling(Duration::from_millis(10), move || {
            let count = count.clone();
            async move { count.fetch_add(1, AtomicOrdering::Relaxed) < 1 }
        });

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ticks.load(AtomicOrdering::Relaxed), 2);
        assert!(!timers.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_is_idempotent_and_total() {
        let timers = TimerSet::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let count = fired.clone();
        timers.start_timeout(Duration::from_millis(50), move || {
            count.fetch_add(1, AtomicOrdering::Relaxed);
        });
        let count = fired.clone();
        timers.start_polling(Duration::from_millis(10), move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, AtomicOrdering::Relaxed);
                true
            }
        });

        timers.dispose();
        timers.dispose();

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(AtomicOrdering::Relaxed), 0);
        assert!(!timers.is_polling());
    }
}
