//! Sliding-window rate limiting for safety-critical operations.
//!
//! Each key tracks the timestamps of its recent calls. A call is allowed
//! only while the count within the trailing window stays below the maximum.
//! Prune, check, and append happen under one lock so two concurrent calls
//! can never both pass a boundary check.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

/// Sliding-window limiter keyed by operation name.
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_calls` per trailing `window`.
    #[must_use]
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Check-and-record one call for `key` at the current time.
    ///
    /// Returns `false` (and records nothing) when the window is full.
    pub fn is_allowed(&self, key: &str) -> bool {
        self.is_allowed_at(key, Instant::now())
    }

    /// Check-and-record with an explicit timestamp.
    ///
    /// Exposed so window expiry is testable without real waiting; `now` must
    /// be monotonically non-decreasing per key for the pruning to hold.
    pub fn is_allowed_at(&self, key: &str, now: Instant) -> bool {
        let mut attempts = self.attempts.lock();
        let timestamps = attempts.entry(key.to_owned()).or_default();

        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_calls {
            debug!(
                key,
                current = timestamps.len(),
                max = self.max_calls,
                "rate limited"
            );
            return false;
        }

        timestamps.push(now);
        true
    }

    /// Forget all recorded calls for `key`.
    pub fn reset(&self, key: &str) {
        let _ = self.attempts.lock().remove(key);
    }

    /// The configured per-window maximum.
    #[must_use]
    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    /// The configured window length.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_max_within_window() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        let base = Instant::now();

        for i in 0..10 {
            assert!(
                limiter.is_allowed_at("cloud", base + Duration::from_secs(i)),
                "call {i} should pass"
            );
        }
        // the 11th call within the window is rejected
        assert!(!limiter.is_allowed_at("cloud", base + Duration::from_secs(30)));
    }

    #[test]
    fn capacity_frees_after_window_expiry() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        let base = Instant::now();

        for _ in 0..10 {
            assert!(limiter.is_allowed_at("cloud", base));
        }
        assert!(!limiter.is_allowed_at("cloud", base + Duration::from_secs(59)));

        // after the window elapses from the earliest call, a new call passes
        assert!(limiter.is_allowed_at("cloud", base + Duration::from_secs(60)));
    }

    #[test]
    fn rejected_calls_are_not_recorded() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let base = Instant::now();

        assert!(limiter.is_allowed_at("op", base));
        // rejected attempts must not extend the window
        for i in 1..5 {
            assert!(!limiter.is_allowed_at("op", base + Duration::from_secs(i)));
        }
        assert!(limiter.is_allowed_at("op", base + Duration::from_secs(10)));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let base = Instant::now();

        assert!(limiter.is_allowed_at("a", base));
        assert!(limiter.is_allowed_at("b", base));
        assert!(!limiter.is_allowed_at("a", base));
    }

    #[test]
    fn reset_clears_one_key() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let base = Instant::now();

        assert!(limiter.is_allowed_at("a", base));
        assert!(limiter.is_allowed_at("b", base));
        limiter.reset("a");

        assert!(limiter.is_allowed_at("a", base));
        assert!(!limiter.is_allowed_at("b", base));
    }

    #[test]
    fn wall_clock_entry_point_works() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.is_allowed("op"));
        assert!(limiter.is_allowed("op"));
        assert!(!limiter.is_allowed("op"));
    }

    #[test]
    fn accessors_expose_config() {
        let limiter = RateLimiter::new(20, Duration::from_secs(300));
        assert_eq!(limiter.max_calls(), 20);
        assert_eq!(limiter.window(), Duration::from_secs(300));
    }
}
