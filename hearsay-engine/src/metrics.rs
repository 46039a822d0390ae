//! Runtime counters.
//!
//! Lock-free `AtomicU64` counters incremented on the hot path and read on
//! demand for dashboards and tests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for engine activity.
pub struct EngineCounters {
    /// Events accepted into the queue.
    pub events_enqueued: AtomicU64,
    /// Events skipped because validation failed.
    pub events_invalid: AtomicU64,
    /// Rumors created from events.
    pub rumors_created: AtomicU64,
    /// Duplicate events folded into an existing rumor.
    pub events_deduplicated: AtomicU64,
    /// Successful retellings.
    pub retellings: AtomicU64,
    /// Retellings where the mutation roll fired.
    pub mutations_applied: AtomicU64,
    /// Narrations that fell back to the raw event summary.
    pub narration_fallbacks: AtomicU64,
    /// Contradiction events applied.
    pub contradictions: AtomicU64,
    /// Decay passes completed.
    pub decay_passes: AtomicU64,
    /// Memories newly flipped to forgotten.
    pub memories_forgotten: AtomicU64,
}

impl EngineCounters {
    /// Zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events_enqueued: AtomicU64::new(0),
            events_invalid: AtomicU64::new(0),
            rumors_created: AtomicU64::new(0),
            events_deduplicated: AtomicU64::new(0),
            retellings: AtomicU64::new(0),
            mutations_applied: AtomicU64::new(0),
            narration_fallbacks: AtomicU64::new(0),
            contradictions: AtomicU64::new(0),
            decay_passes: AtomicU64::new(0),
            memories_forgotten: AtomicU64::new(0),
        }
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            events_enqueued: self.events_enqueued.load(Ordering::Relaxed),
            events_invalid: self.events_invalid.load(Ordering::Relaxed),
            rumors_created: self.rumors_created.load(Ordering::Relaxed),
            events_deduplicated: self.events_deduplicated.load(Ordering::Relaxed),
            retellings: self.retellings.load(Ordering::Relaxed),
            mutations_applied: self.mutations_applied.load(Ordering::Relaxed),
            narration_fallbacks: self.narration_fallbacks.load(Ordering::Relaxed),
            contradictions: self.contradictions.load(Ordering::Relaxed),
            decay_passes: self.decay_passes.load(Ordering::Relaxed),
            memories_forgotten: self.memories_forgotten.load(Ordering::Relaxed),
        }
    }
}

impl Default for EngineCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter values at a point in time.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[allow(missing_docs)]
pub struct CounterSnapshot {
    pub events_enqueued: u64,
    pub events_invalid: u64,
    pub rumors_created: u64,
    pub events_deduplicated: u64,
    pub retellings: u64,
    pub mutations_applied: u64,
    pub narration_fallbacks: u64,
    pub contradictions: u64,
    pub decay_passes: u64,
    pub memories_forgotten: u64,
}
