//! Narration cache and request throttle.
//!
//! Generated narration is memoized write-once per structural cache key, so
//! an identical event narrated twice costs one backend call. The throttle
//! serialises backend calls globally, spacing them by a minimum interval
//! regardless of how many workers are generating.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Structural identity of a narration request.
///
/// Distortion participates in permille so that keys are hashable; two
/// requests whose distortion differs by less than 0.001 share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Event type, e.g. "guard_change".
    pub event_type: String,
    /// Participating entities, sorted for order-independence.
    pub actors: Vec<String>,
    /// Where it happened, if anywhere in particular.
    pub location: Option<String>,
    /// Free-form event context; two events with different context narrate
    /// differently and must not share an entry.
    pub context: Option<String>,
    /// Distortion level ×1000, rounded.
    pub distortion_permille: u32,
}

impl CacheKey {
    /// Build a key; actor order does not matter.
    #[must_use]
    pub fn new(
        event_type: impl Into<String>,
        mut actors: Vec<String>,
        location: Option<String>,
        context: Option<String>,
        distortion_level: f32,
    ) -> Self {
        actors.sort_unstable();
        Self {
            event_type: event_type.into(),
            actors,
            location,
            context,
            distortion_permille: (distortion_level.clamp(0.0, 1.0) * 1000.0).round() as u32,
        }
    }
}

/// Counters describing cache behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Live entries.
    pub entries: usize,
    /// Lookups that found a usable entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Entries evicted because their stored text was empty.
    pub corruption_evictions: u64,
}

struct CacheInner {
    map: HashMap<CacheKey, String>,
    hits: u64,
    misses: u64,
    corruption_evictions: u64,
}

/// Write-once memoization of generated narration text.
pub struct TransformationCache {
    inner: Mutex<CacheInner>,
}

impl Default for TransformationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                hits: 0,
                misses: 0,
                corruption_evictions: 0,
            }),
        }
    }

    /// Look up the narration for a key.
    ///
    /// An entry holding an empty string is treated as corrupt: it is
    /// evicted and the lookup reports a miss so the caller regenerates.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut inner = self.inner.lock();
        match inner.map.get(key) {
            Some(text) if text.is_empty() => {
                warn!(event_type = %key.event_type, "evicting empty cache entry");
                inner.map.remove(key);
                inner.corruption_evictions += 1;
                inner.misses += 1;
                None
            }
            Some(text) => {
                let text = text.clone();
                inner.hits += 1;
                Some(text)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store narration for a key. Write-once: an occupied entry is never
    /// overwritten, and empty text is never stored.
    pub fn insert(&self, key: CacheKey, text: String) {
        if text.is_empty() {
            warn!(event_type = %key.event_type, "refusing to cache empty narration");
            return;
        }
        let mut inner = self.inner.lock();
        if let Entry::Vacant(slot) = inner.map.entry(key) {
            slot.insert(text);
        } else {
            debug!("cache entry already populated, keeping the original");
        }
    }

    /// Snapshot the counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.map.len(),
            hits: inner.hits,
            misses: inner.misses,
            corruption_evictions: inner.corruption_evictions,
        }
    }
}

/// Global minimum spacing between backend calls.
///
/// Callers await [`Throttle::acquire`] before each call; the lock makes the
/// spacing hold across every worker sharing the throttle.
pub struct Throttle {
    last_call: tokio::sync::Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl Throttle {
    /// Create a throttle with the given minimum interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: tokio::sync::Mutex::new(None),
            min_interval,
        }
    }

    /// Wait until a call is permitted, then claim the slot.
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
