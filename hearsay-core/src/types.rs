//! Core type definitions for the hearsay rumor engine.
//!
//! All types are serializable value types; identity is Uuid-based.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for any entity (NPC, player, creature) in the game world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a rumor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RumorId(pub Uuid);

impl RumorId {
    /// Create a new random rumor ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RumorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RumorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an originating world event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new random event ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a single transformation (retelling) of a rumor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformationId(pub Uuid);

impl TransformationId {
    /// Create a new random transformation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransformationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub Uuid);

impl FactionId {
    /// Create a new random faction ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FactionId {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// In-game timestamp measured in simulated seconds since world creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameTimestamp {
    /// Simulated-time tick (monotonically increasing, one tick = one second).
    pub tick: u64,
    /// Corresponding real-world wall-clock time (for save metadata).
    pub real_time: DateTime<Utc>,
}

impl GameTimestamp {
    /// Create a new game timestamp at the current wall-clock time.
    #[must_use]
    pub fn now(tick: u64) -> Self {
        Self {
            tick,
            real_time: Utc::now(),
        }
    }

    /// Simulated seconds elapsed since `other`.
    #[must_use]
    pub fn seconds_since(&self, other: &Self) -> u64 {
        self.tick.saturating_sub(other.tick)
    }
}

// ---------------------------------------------------------------------------
// Personality Traits
// ---------------------------------------------------------------------------

/// Observer traits that modulate how believable a rumor appears.
/// Each ranges 0.0–1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PersonalityTraits {
    /// How easily the entity accepts claims at face value (0 = wary, 1 = credulous).
    pub gullibility: f32,
    /// How strongly the entity discounts unverified claims (0 = trusting, 1 = doubter).
    pub skepticism: f32,
    /// How drawn the entity is to novel information (0 = indifferent, 1 = nosy).
    pub curiosity: f32,
}

impl PersonalityTraits {
    /// Create traits, clamping each value to [0, 1].
    #[must_use]
    pub fn new(gullibility: f32, skepticism: f32, curiosity: f32) -> Self {
        Self {
            gullibility: gullibility.clamp(0.0, 1.0),
            skepticism: skepticism.clamp(0.0, 1.0),
            curiosity: curiosity.clamp(0.0, 1.0),
        }
    }
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            gullibility: 0.5,
            skepticism: 0.5,
            curiosity: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Factions
// ---------------------------------------------------------------------------

/// Standing between two factions, as seen by a believer toward a rumor source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactionRelation {
    /// Factions are allied — claims from the other side gain credit.
    Allied,
    /// Factions are hostile — claims from the other side lose credit.
    Hostile,
    /// No particular standing.
    Neutral,
}

/// Symmetric relationship map between factions.
///
/// Unknown pairs are [`FactionRelation::Neutral`]; a faction is always
/// allied with itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionGraph {
    relations: HashMap<(FactionId, FactionId), FactionRelation>,
}

impl FactionGraph {
    /// Create an empty faction graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a symmetric relationship between two factions.
    pub fn set_relation(&mut self, a: FactionId, b: FactionId, relation: FactionRelation) {
        self.relations.insert((a, b), relation);
        self.relations.insert((b, a), relation);
    }

    /// Look up the relationship between two factions.
    #[must_use]
    pub fn relation(&self, a: FactionId, b: FactionId) -> FactionRelation {
        if a == b {
            return FactionRelation::Allied;
        }
        self.relations
            .get(&(a, b))
            .copied()
            .unwrap_or(FactionRelation::Neutral)
    }
}

// ---------------------------------------------------------------------------
// Entity Profile
// ---------------------------------------------------------------------------

/// What the engine knows about an observer: personality and allegiance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EntityProfile {
    /// Believability-relevant personality traits.
    pub traits: PersonalityTraits,
    /// Faction membership, if any.
    pub faction: Option<FactionId>,
}

impl EntityProfile {
    /// Profile with the given traits and no faction.
    #[must_use]
    pub fn with_traits(traits: PersonalityTraits) -> Self {
        Self {
            traits,
            faction: None,
        }
    }
}
