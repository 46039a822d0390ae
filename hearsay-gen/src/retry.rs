//! Retry policy and circuit breaker for narration backends.
//!
//! Transient failures are retried with exponential backoff plus jitter so
//! the retries of parallel workers don't land in lockstep. Repeated
//! failures open a circuit breaker that rejects calls outright until a
//! reset window has passed.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use rand::Rng;

/// Exponential backoff schedule with random jitter.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Base delay in milliseconds; doubles per attempt.
    pub base_backoff_ms: u64,
    /// Cap on the computed delay.
    pub max_backoff_ms: u64,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            base_backoff_ms: 250,
            max_backoff_ms: 10_000,
        }
    }
}

impl ExponentialBackoff {
    /// Delay before the given retry attempt (0-based), jittered ±25%.
    #[must_use]
    pub fn delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let base = self.base_backoff_ms.saturating_mul(1 << attempt.min(10));
        let capped = base.min(self.max_backoff_ms);
        let jitter = rng.gen_range(0.75..=1.25);
        Duration::from_millis((capped as f64 * jitter) as u64)
    }
}

/// Trips after a run of consecutive failures; rejects calls until the
/// reset timeout elapses.
#[derive(Debug)]
pub struct CircuitBreaker {
    failures: AtomicUsize,
    open_until: AtomicU64,
    threshold: usize,
    reset_timeout_ms: u64,
}

impl CircuitBreaker {
    /// Create a breaker that opens after `threshold` consecutive failures
    /// and stays open for `reset_timeout_ms`.
    #[must_use]
    pub fn new(threshold: usize, reset_timeout_ms: u64) -> Self {
        Self {
            failures: AtomicUsize::new(0),
            open_until: AtomicU64::new(0),
            threshold,
            reset_timeout_ms,
        }
    }

    fn now_ms() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    /// Whether calls should currently be rejected.
    ///
    /// Once the reset window elapses the failure run is cleared, letting
    /// trial calls through to probe the backend.
    #[must_use]
    pub fn is_open(&self) -> bool {
        let open_until = self.open_until.load(Ordering::Relaxed);
        if open_until == 0 {
            return false;
        }
        if Self::now_ms() < open_until {
            return true;
        }
        self.open_until.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        false
    }

    /// A successful call closes the circuit and clears the failure run.
    pub fn record_success(&self) {
        self.failures.store(0, Ordering::Relaxed);
        self.open_until.store(0, Ordering::Relaxed);
    }

    /// A failed call; opens the circuit once the threshold is reached.
    pub fn record_failure(&self) {
        let failures = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= self.threshold {
            self.open_until
                .store(Self::now_ms() + self.reset_timeout_ms, Ordering::Relaxed);
            tracing::warn!(failures, "circuit breaker opened");
        }
    }
}
