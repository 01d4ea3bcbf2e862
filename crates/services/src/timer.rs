//! Cancellable one-second countdown for timed exams.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// A countdown owned by the exam-session runtime.
///
/// Fires `on_tick` immediately with the full duration, then once per second
/// with the remaining seconds. When the count reaches zero the countdown stops
/// and `on_expire` fires. Cancellation only sets a flag, so it is safe from
/// any thread, including the expiry callback's own.
pub struct CountdownTimer {
    cancelled: Arc<AtomicBool>,
}

impl CountdownTimer {
    /// Spawn the countdown thread.
    pub fn start<T, E>(seconds: u32, mut on_tick: T, on_expire: E) -> Self
    where
        T: FnMut(u32) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        thread::spawn(move || {
            on_tick(seconds);
            let mut remaining = seconds;
            while remaining > 0 {
                thread::sleep(Duration::from_secs(1));
                if flag.load(Ordering::SeqCst) {
                    return;
                }
                remaining -= 1;
                on_tick(remaining);
            }
            if !flag.load(Ordering::SeqCst) {
                on_expire();
            }
        });

        Self { cancelled }
    }

    /// Stop the countdown. Idempotent; pending expiry will not fire.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
