//! Memory decay, reinforcement, and contradiction.
//!
//! Each decay tick drains `base_decay_rate / importance` from every living
//! memory, so important rumors persist longer. The surrounding evidence
//! climate scales the drain; reinforcement pushes strength back up with
//! diminishing returns; contradictions knock it down with jitter. Once
//! strength crosses the forgotten threshold the memory flips to forgotten
//! but is never deleted.

use rand::Rng;

use crate::config::DecayConfig;
use crate::memory::{MemoryLedger, RumorMemory};
use crate::types::{GameTimestamp, RumorId};

/// The informational environment a rumor currently sits in.
///
/// Multiplies the per-tick decay delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvidenceClimate {
    /// Nothing pushing either way.
    #[default]
    Neutral,
    /// Conflicting accounts are circulating — memories erode faster.
    Conflicting,
    /// An authority has publicly contradicted the rumor.
    AuthorityContradiction,
    /// Corroborating evidence keeps the rumor alive.
    Supporting,
}

impl EvidenceClimate {
    /// Decay multiplier for this climate.
    #[must_use]
    pub fn modifier(self) -> f32 {
        match self {
            Self::Neutral => 1.0,
            Self::Conflicting => 1.5,
            Self::AuthorityContradiction => 2.0,
            Self::Supporting => 0.5,
        }
    }
}

/// Ages per-entity memories and applies reinforcement/contradiction.
#[derive(Debug, Clone)]
pub struct DecayScheduler {
    config: DecayConfig,
}

impl DecayScheduler {
    /// Create a scheduler with the given tuning.
    #[must_use]
    pub fn new(config: DecayConfig) -> Self {
        Self { config }
    }

    /// Whether forgotten rumors may be relearned.
    #[must_use]
    pub fn allows_relearning(&self) -> bool {
        self.config.allow_relearning
    }

    /// Apply one decay tick to a single memory.
    ///
    /// Returns `true` if this tick flipped the memory to forgotten.
    /// Already-forgotten memories are left untouched.
    pub fn decay_tick(
        &self,
        memory: &mut RumorMemory,
        importance: f32,
        climate: EvidenceClimate,
    ) -> bool {
        if memory.is_forgotten {
            return false;
        }
        let importance = importance.clamp(0.01, 1.0);
        let delta = (self.config.base_decay_rate / importance) * climate.modifier();
        memory.strength = (memory.strength - delta).max(0.0);

        if memory.strength < self.config.forgotten_threshold {
            memory.is_forgotten = true;
            return true;
        }
        false
    }

    /// Reinforce a memory (the entity retold or re-heard the rumor).
    ///
    /// The base boost halves for every successive reinforcement inside the
    /// configured window; the streak resets once the window elapses.
    /// Returns the boost actually applied.
    pub fn reinforce(&self, memory: &mut RumorMemory, now: GameTimestamp) -> f32 {
        let within_window =
            now.seconds_since(&memory.last_reinforced_at) <= self.config.reinforcement_window_secs;
        if within_window {
            memory.reinforcement_streak = memory.reinforcement_streak.saturating_add(1);
        } else {
            memory.reinforcement_streak = 0;
        }

        let halvings = memory.reinforcement_streak.min(16);
        let boost = self.config.reinforcement_boost * 0.5_f32.powi(halvings as i32);
        memory.strength = (memory.strength + boost).min(1.0);
        memory.last_reinforced_at = now;
        boost
    }

    /// Apply an explicit contradiction: `base × U[0.7, 1.3]` off the strength.
    ///
    /// Returns `true` if the contradiction pushed the memory to forgotten.
    pub fn contradict<R: Rng>(&self, memory: &mut RumorMemory, rng: &mut R) -> bool {
        if memory.is_forgotten {
            return false;
        }
        let factor = rng.gen_range(0.7..=1.3);
        memory.strength = (memory.strength - self.config.contradiction_base * factor).max(0.0);
        if memory.strength < self.config.forgotten_threshold {
            memory.is_forgotten = true;
            return true;
        }
        false
    }

    /// Reset a forgotten memory after relearning.
    ///
    /// Keeps `learned_at` and the local transformation history; restarts
    /// strength and the reinforcement streak.
    pub fn relearn(&self, memory: &mut RumorMemory, now: GameTimestamp, strength: f32) {
        memory.is_forgotten = false;
        memory.strength = strength.clamp(0.0, 1.0);
        memory.reinforcement_streak = 0;
        memory.last_reinforced_at = now;
    }
}

/// Run one decay tick over a whole ledger.
///
/// `rumor_state` supplies `(importance, climate)` per rumor; entries whose
/// rumor is unknown are skipped. Returns how many memories were newly
/// flipped to forgotten.
pub fn run_decay_pass(
    ledger: &mut MemoryLedger,
    scheduler: &DecayScheduler,
    rumor_state: impl Fn(RumorId) -> Option<(f32, EvidenceClimate)>,
) -> usize {
    let mut newly_forgotten = 0;
    for ((_, rumor_id), memory) in ledger.iter_mut() {
        let Some((importance, climate)) = rumor_state(*rumor_id) else {
            continue;
        };
        if scheduler.decay_tick(memory, importance, climate) {
            newly_forgotten += 1;
        }
    }
    if newly_forgotten > 0 {
        tracing::debug!(newly_forgotten, "decay pass flipped memories to forgotten");
    }
    newly_forgotten
}
