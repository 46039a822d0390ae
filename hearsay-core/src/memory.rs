//! Per-entity rumor memory — who knows what, and how well.
//!
//! A [`RumorMemory`] exists for (entity, rumor) exactly when the entity
//! knows the rumor. Forgetting flips `is_forgotten`; the record itself is
//! never deleted, so historical queries (and relearning, if enabled) keep
//! working.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, GameTimestamp, RumorId, TransformationId};

/// An entity's personal record of knowing a rumor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RumorMemory {
    /// When the entity first learned the rumor.
    pub learned_at: GameTimestamp,
    /// How firmly the rumor is held (0.0–1.0). Decays over time,
    /// boosted by reinforcement, cut by contradiction.
    pub strength: f32,
    /// Terminal marker: strength fell below the forgotten threshold.
    pub is_forgotten: bool,
    /// Transformations this entity personally produced.
    pub local_transformations: Vec<TransformationId>,
    /// Last time the memory was reinforced (retold or heard again).
    pub last_reinforced_at: GameTimestamp,
    /// Consecutive reinforcements inside the diminishing-returns window.
    pub reinforcement_streak: u32,
}

impl RumorMemory {
    /// Create a fresh memory at full strength.
    #[must_use]
    pub fn new(learned_at: GameTimestamp, strength: f32) -> Self {
        Self {
            learned_at,
            strength: strength.clamp(0.0, 1.0),
            is_forgotten: false,
            local_transformations: Vec::new(),
            last_reinforced_at: learned_at,
            reinforcement_streak: 0,
        }
    }

    /// Whether the entity currently knows the rumor.
    #[must_use]
    pub fn knows(&self) -> bool {
        !self.is_forgotten
    }

    /// Record a transformation this entity produced.
    pub fn record_local_transformation(&mut self, id: TransformationId) {
        self.local_transformations.push(id);
    }
}

/// Engine-owned map of all per-entity rumor memories.
///
/// Keyed by (entity, rumor). Only typed operations are exposed; callers
/// never touch the underlying map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    entries: std::collections::HashMap<(EntityId, RumorId), RumorMemory>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a memory.
    #[must_use]
    pub fn get(&self, entity: EntityId, rumor: RumorId) -> Option<&RumorMemory> {
        self.entries.get(&(entity, rumor))
    }

    /// Mutable lookup, for decay/reinforcement/contradiction passes.
    pub fn get_mut(&mut self, entity: EntityId, rumor: RumorId) -> Option<&mut RumorMemory> {
        self.entries.get_mut(&(entity, rumor))
    }

    /// Insert a freshly learned memory. Returns the previous record if the
    /// entity already knew the rumor.
    pub fn learn(
        &mut self,
        entity: EntityId,
        rumor: RumorId,
        memory: RumorMemory,
    ) -> Option<RumorMemory> {
        self.entries.insert((entity, rumor), memory)
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&(EntityId, RumorId), &RumorMemory)> {
        self.entries.iter()
    }

    /// Iterate mutably over all entries (decay pass).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&(EntityId, RumorId), &mut RumorMemory)> {
        self.entries.iter_mut()
    }

    /// All memories for one rumor, with the entity that holds each.
    pub fn for_rumor(&self, rumor: RumorId) -> impl Iterator<Item = (EntityId, &RumorMemory)> {
        self.entries
            .iter()
            .filter(move |((_, r), _)| *r == rumor)
            .map(|((e, _), m)| (*e, m))
    }

    /// All rumors an entity holds a memory of (forgotten ones included).
    pub fn for_entity(&self, entity: EntityId) -> impl Iterator<Item = (RumorId, &RumorMemory)> {
        self.entries
            .iter()
            .filter(move |((e, _), _)| *e == entity)
            .map(|((_, r), m)| (*r, m))
    }

    /// Number of tracked (entity, rumor) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
