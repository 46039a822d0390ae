//! World events that seed rumors.
//!
//! Game code describes what happened; the engine decides whether it turns
//! into a rumor and what the rumor says. Invalid events are logged and
//! skipped rather than crashing the intake path.

use serde::{Deserialize, Serialize};

use hearsay_core::types::{EntityId, EventId, GameTimestamp};

/// Something that happened in the world and might be worth gossiping about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Stable identity; duplicate submissions of the same id are deduplicated.
    pub id: EventId,
    /// What kind of thing happened ("theft", "duel", "guard_change").
    pub event_type: String,
    /// Everyone involved. Must be non-empty.
    pub actors: Vec<EntityId>,
    /// Human-readable names for the actors, used in narration.
    pub actor_names: Vec<String>,
    /// Where it happened, if anywhere in particular.
    pub location: Option<String>,
    /// When it happened.
    pub timestamp: GameTimestamp,
    /// Free-form extra detail for narration ("over a card game").
    pub context: Option<String>,
    /// The entity that instigated the event, if one did.
    pub source: Option<EntityId>,
    /// The entity on the receiving end, if one was.
    pub target: Option<EntityId>,
    /// How much this matters to the world (0.01–1.0). Drives decay rate.
    pub importance: f32,
    /// Objective accuracy of the seeded rumor, when the producer can
    /// assert one. `None` by default; the engine then estimates a value
    /// from how closely the narration tracks `context`.
    pub truth: Option<f32>,
}

impl WorldEvent {
    /// Build an event with sensible defaults for the optional fields.
    #[must_use]
    pub fn new(
        event_type: impl Into<String>,
        actors: Vec<EntityId>,
        timestamp: GameTimestamp,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type: event_type.into(),
            actors,
            actor_names: Vec::new(),
            location: None,
            timestamp,
            context: None,
            source: None,
            target: None,
            importance: 0.5,
            truth: None,
        }
    }

    /// Set the location.
    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the narration context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the importance.
    #[must_use]
    pub fn with_importance(mut self, importance: f32) -> Self {
        self.importance = importance;
        self
    }

    /// Assert the event's objective accuracy instead of letting the
    /// engine estimate it.
    #[must_use]
    pub fn with_truth(mut self, truth: f32) -> Self {
        self.truth = Some(truth);
        self
    }

    /// Set display names for the actors.
    #[must_use]
    pub fn named(mut self, names: Vec<String>) -> Self {
        self.actor_names = names;
        self
    }

    /// Check the event is well-formed enough to process.
    ///
    /// Returns the reason when it is not.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.event_type.trim().is_empty() {
            return Err("empty event_type");
        }
        if self.actors.is_empty() {
            return Err("no actors");
        }
        if !self.importance.is_finite() || self.importance <= 0.0 {
            return Err("non-positive importance");
        }
        if let Some(truth) = self.truth {
            if !(0.0..=1.0).contains(&truth) {
                return Err("truth outside [0, 1]");
            }
        }
        Ok(())
    }

    /// Plain factual summary, used as narration input and as fallback
    /// rumor text when narration fails.
    #[must_use]
    pub fn summary(&self) -> String {
        let who = if self.actor_names.is_empty() {
            format!("{} people", self.actors.len())
        } else {
            self.actor_names.join(" and ")
        };
        let mut text = format!("{} involving {who}", self.event_type.replace('_', " "));
        if let Some(location) = &self.location {
            text.push_str(&format!(" at {location}"));
        }
        if let Some(context) = &self.context {
            text.push_str(&format!(", {context}"));
        }
        text
    }
}
