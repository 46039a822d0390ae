//! Bounded event intake queue.
//!
//! Cloning the queue shares the same buffer; game threads push events,
//! the processing loop drains them in batches. The queue never blocks:
//! overflow either drops the oldest entry or rejects the newcomer,
//! depending on policy.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use hearsay_core::config::OverflowPolicy;

use crate::events::WorldEvent;

/// Thread-safe bounded queue of pending world events.
#[derive(Clone)]
pub struct EventQueue {
    inner: Arc<Mutex<QueueInner>>,
}

struct QueueInner {
    deque: VecDeque<WorldEvent>,
    capacity: usize,
    policy: OverflowPolicy,
    total_enqueued: u64,
    total_dropped: u64,
    total_rejected: u64,
}

/// Point-in-time queue statistics.
#[derive(Debug, Clone, Copy)]
pub struct QueueStats {
    /// Events currently waiting.
    pub depth: usize,
    /// Capacity of the buffer.
    pub capacity: usize,
    /// Accepted since startup.
    pub total_enqueued: u64,
    /// Evicted to make room (DropOldest policy).
    pub total_dropped: u64,
    /// Turned away at the door (Reject policy).
    pub total_rejected: u64,
}

impl EventQueue {
    /// Create a queue with the given capacity and overflow policy.
    #[must_use]
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner {
                deque: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
                policy,
                total_enqueued: 0,
                total_dropped: 0,
                total_rejected: 0,
            })),
        }
    }

    /// Enqueue an event. Returns `false` if the event was rejected.
    pub fn push(&self, event: WorldEvent) -> bool {
        let mut inner = self.inner.lock();
        if inner.deque.len() >= inner.capacity {
            match inner.policy {
                OverflowPolicy::DropOldest => {
                    if let Some(dropped) = inner.deque.pop_front() {
                        warn!(event_type = %dropped.event_type, "queue full, dropping oldest event");
                        inner.total_dropped += 1;
                    }
                }
                OverflowPolicy::Reject => {
                    warn!(event_type = %event.event_type, "queue full, rejecting event");
                    inner.total_rejected += 1;
                    return false;
                }
            }
        }
        inner.deque.push_back(event);
        inner.total_enqueued += 1;
        true
    }

    /// Remove and return up to `max` events, oldest first.
    #[must_use]
    pub fn drain(&self, max: usize) -> Vec<WorldEvent> {
        let mut inner = self.inner.lock();
        let take = max.min(inner.deque.len());
        inner.deque.drain(..take).collect()
    }

    /// Current queue depth.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().deque.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().deque.is_empty()
    }

    /// Snapshot the counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        let inner = self.inner.lock();
        QueueStats {
            depth: inner.deque.len(),
            capacity: inner.capacity,
            total_enqueued: inner.total_enqueued,
            total_dropped: inner.total_dropped,
            total_rejected: inner.total_rejected,
        }
    }
}
