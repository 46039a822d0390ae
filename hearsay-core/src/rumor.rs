//! The rumor itself — canonical content, origin, and retelling history.
//!
//! A `Rumor` is created once per distinct originating world event. Its
//! canonical text never changes; every retelling appends a
//! [`RumorTransformation`] instead.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, EventId, GameTimestamp, RumorId, TransformationId};

/// Where a rumor came from: the witnessing entity and the triggering event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RumorOrigin {
    /// Entity that originated the rumor (first witness or narrator).
    pub entity: EntityId,
    /// World event the rumor was distilled from.
    pub event: EventId,
    /// When the rumor entered circulation.
    pub timestamp: GameTimestamp,
}

impl RumorOrigin {
    /// Origin for a rumor whose triggering event has no record of its own.
    #[must_use]
    pub fn from_entity(entity: EntityId, timestamp: GameTimestamp) -> Self {
        Self {
            entity,
            event: EventId::new(),
            timestamp,
        }
    }
}

/// What kind of distortion a retelling applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformationKind {
    /// Faithful retelling, no category fired.
    Retell,
    /// Uncertainty injected ("supposedly", "allegedly").
    Hedge,
    /// Location made vague ("somewhere near").
    ObscureLocation,
    /// Intensity amplified ("definitely", "absolutely").
    Exaggerate,
    /// Intensity diminished ("might have", "possibly").
    Diminish,
    /// Deliberate correction toward the canonical account.
    Clarify,
}

/// One retelling of a rumor by one entity, with the text it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RumorTransformation {
    /// Unique identifier for this transformation.
    pub id: TransformationId,
    /// Who retold the rumor.
    pub entity: EntityId,
    /// When the retelling happened.
    pub timestamp: GameTimestamp,
    /// Which distortion category applied.
    pub kind: TransformationKind,
    /// The text this retelling produced.
    pub resulting_content: String,
    /// How far the text has drifted from the canonical account.
    /// 0.0 = faithful, 1.0 = unrecognizable. Non-decreasing along a chain.
    pub distortion_level: f32,
}

impl RumorTransformation {
    /// Create a transformation record, clamping distortion to [0, 1].
    #[must_use]
    pub fn new(
        entity: EntityId,
        timestamp: GameTimestamp,
        kind: TransformationKind,
        resulting_content: impl Into<String>,
        distortion_level: f32,
    ) -> Self {
        Self {
            id: TransformationId::new(),
            entity,
            timestamp,
            kind,
            resulting_content: resulting_content.into(),
            distortion_level: distortion_level.clamp(0.0, 1.0),
        }
    }
}

/// A piece of world-derived narrative information propagated through retellings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rumor {
    /// Unique identifier.
    pub id: RumorId,
    /// Canonical text, fixed at creation.
    pub core_content: String,
    /// How true the rumor actually is, if known (0.0–1.0).
    pub truth_value: Option<f32>,
    /// Originating entity, event, and time.
    pub origin: RumorOrigin,
    /// How much the world cares (0.0–1.0); higher importance decays slower.
    pub importance: f32,
    /// Append-only record of every retelling.
    pub history: Vec<RumorTransformation>,
}

impl Rumor {
    /// Create a new rumor. Importance and truth are clamped to [0, 1].
    #[must_use]
    pub fn new(
        core_content: impl Into<String>,
        truth_value: Option<f32>,
        origin: RumorOrigin,
        importance: f32,
    ) -> Self {
        Self {
            id: RumorId::new(),
            core_content: core_content.into(),
            truth_value: truth_value.map(|t| t.clamp(0.0, 1.0)),
            origin,
            // Floor keeps the decay divisor sane for throwaway gossip.
            importance: importance.clamp(0.01, 1.0),
            history: Vec::new(),
        }
    }

    /// Append a retelling to the history and return its ID.
    pub fn record_transformation(&mut self, transformation: RumorTransformation) -> TransformationId {
        let id = transformation.id;
        self.history.push(transformation);
        id
    }

    /// The most recent retelling by the given entity, if any.
    #[must_use]
    pub fn latest_by(&self, entity: EntityId) -> Option<&RumorTransformation> {
        self.history.iter().rev().find(|t| t.entity == entity)
    }

    /// The text an entity would pass on: its own latest variant, or the
    /// canonical content if it never retold the rumor.
    #[must_use]
    pub fn content_for(&self, entity: EntityId) -> &str {
        self.latest_by(entity)
            .map_or(self.core_content.as_str(), |t| t.resulting_content.as_str())
    }

    /// Distortion level the given entity last passed on (0.0 if never retold).
    #[must_use]
    pub fn distortion_for(&self, entity: EntityId) -> f32 {
        self.latest_by(entity).map_or(0.0, |t| t.distortion_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> RumorOrigin {
        RumorOrigin {
            entity: EntityId::new(),
            event: EventId::new(),
            timestamp: GameTimestamp::now(100),
        }
    }

    #[test]
    fn truth_and_importance_are_clamped() {
        let rumor = Rumor::new("a coin was stolen", Some(1.5), origin(), -3.0);
        assert_eq!(rumor.truth_value, Some(1.0));
        assert!(rumor.importance > 0.0);
    }

    #[test]
    fn history_is_append_only_and_core_unchanged() {
        let mut rumor = Rumor::new("a coin was stolen", None, origin(), 0.5);
        let teller = EntityId::new();
        rumor.record_transformation(RumorTransformation::new(
            teller,
            GameTimestamp::now(200),
            TransformationKind::Hedge,
            "supposedly a coin was stolen",
            0.2,
        ));

        assert_eq!(rumor.core_content, "a coin was stolen");
        assert_eq!(rumor.history.len(), 1);
        assert_eq!(rumor.content_for(teller), "supposedly a coin was stolen");
    }

    #[test]
    fn content_for_unknown_teller_is_canonical() {
        let rumor = Rumor::new("a coin was stolen", None, origin(), 0.5);
        assert_eq!(rumor.content_for(EntityId::new()), "a coin was stolen");
        assert_eq!(rumor.distortion_for(EntityId::new()), 0.0);
    }

    #[test]
    fn latest_by_picks_most_recent() {
        let mut rumor = Rumor::new("base", None, origin(), 0.5);
        let teller = EntityId::new();
        rumor.record_transformation(RumorTransformation::new(
            teller,
            GameTimestamp::now(200),
            TransformationKind::Retell,
            "first",
            0.1,
        ));
        rumor.record_transformation(RumorTransformation::new(
            teller,
            GameTimestamp::now(300),
            TransformationKind::Exaggerate,
            "second",
            0.3,
        ));

        assert_eq!(rumor.content_for(teller), "second");
        assert_eq!(rumor.distortion_for(teller), 0.3);
    }
}
