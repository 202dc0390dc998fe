//! Time and cancellation primitives used for pacing
//!
//! All waiting in the crawler goes through a [`Clock`], so tests can run the
//! full pacing schedule without real delays. Cancellation is cooperative: a
//! [`CancelFlag`] is checked at loop boundaries and cuts pacing sleeps short.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Source of wall-clock time and sleeping
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Waits for the given duration
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the system time and the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Clock whose time only moves when something sleeps on it
///
/// Every requested sleep is recorded and returns immediately after advancing
/// the clock, which makes pacing observable in tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Every duration slept so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Sum of all recorded sleeps
    pub fn total_slept(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    async fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
        if let Ok(mut now) = self.now.lock() {
            *now += ChronoDuration::from_std(duration).unwrap_or_else(|_| ChronoDuration::zero());
        }
    }
}

/// Shared cooperative cancellation signal
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation and wakes every pending pacing sleep
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Sleeps on `clock` unless cancellation arrives first
    ///
    /// Returns `false` when the sleep was cut short by cancellation.
    pub async fn sleep(&self, clock: &dyn Clock, duration: Duration) -> bool {
        // Registered before the flag check so a concurrent cancel is not missed
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return false;
        }

        tokio::select! {
            _ = clock.sleep(duration) => true,
            _ = notified => false,
        }
    }
}
