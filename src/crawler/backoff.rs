//! Fixed-cooldown handling of HTTP 429 responses
//!
//! The cooldown never grows; the state only counts attempts and the time spent
//! waiting so callers can log it and enforce an optional cap.

use std::time::Duration;

/// Back-off state for one logical request that keeps getting rate limited
#[derive(Debug, Clone)]
pub struct RateLimitBackoff {
    cooldown: Duration,
    max_retries: Option<u32>,
    retries: u32,
    waited: Duration,
}

impl RateLimitBackoff {
    /// Creates back-off state with a fixed cooldown and an optional retry cap
    pub fn new(cooldown: Duration, max_retries: Option<u32>) -> Self {
        Self {
            cooldown,
            max_retries,
            retries: 0,
            waited: Duration::ZERO,
        }
    }

    /// Registers a 429 and returns how long to wait before retrying
    ///
    /// Returns `None` once the configured cap has been used up.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if let Some(max) = self.max_retries {
            if self.retries >= max {
                return None;
            }
        }
        self.retries += 1;
        self.waited += self.cooldown;
        Some(self.cooldown)
    }

    /// Clears the state after a request gets through
    pub fn reset(&mut self) {
        self.retries = 0;
        self.waited = Duration::ZERO;
    }

    /// Consecutive 429s absorbed since the last reset
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Cooldown time accumulated since the last reset
    pub fn waited(&self) -> Duration {
        self.waited
    }
}
