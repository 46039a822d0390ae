//! Believability scoring — how credible a rumor looks to one observer.
//!
//! The calculator is a pure function: identical inputs always produce the
//! identical score, and nothing is mutated. Consumers (dialogue, UI) call
//! it on demand.
//!
//! Score composition:
//!   base (truth value, or a neutral default when truth is unknown)
//!   + memory strength × reinforcement weight   (if the observer knows it)
//!   − forgotten penalty                         (if the memory is forgotten)
//!   + gullibility × 0.3 + curiosity × 0.1 − skepticism × 0.3
//!   + faction bias (allied +0.1 / hostile −0.2)
//!   clamped to [0, 1]. All weights come from [`BelievabilityConfig`].

use crate::config::BelievabilityConfig;
use crate::memory::RumorMemory;
use crate::rumor::Rumor;
use crate::types::{EntityProfile, FactionGraph, FactionRelation};

/// Scores rumor credibility for individual observers.
#[derive(Debug, Clone)]
pub struct BelievabilityCalculator {
    config: BelievabilityConfig,
}

impl BelievabilityCalculator {
    /// Create a calculator with the given weights.
    #[must_use]
    pub fn new(config: BelievabilityConfig) -> Self {
        Self { config }
    }

    /// How credible `rumor` is to the observer described by `believer`.
    ///
    /// `memory` is the observer's memory of this rumor, if any;
    /// `origin_profile` is the profile of the rumor's originating entity,
    /// if known (used only for faction bias).
    #[must_use]
    pub fn score(
        &self,
        believer: &EntityProfile,
        rumor: &Rumor,
        memory: Option<&RumorMemory>,
        origin_profile: Option<&EntityProfile>,
        factions: &FactionGraph,
    ) -> f32 {
        let cfg = &self.config;

        let mut score = rumor.truth_value.unwrap_or(cfg.neutral_truth);

        if let Some(memory) = memory {
            score += memory.strength * cfg.reinforcement_weight;
            if memory.is_forgotten {
                score -= cfg.forgotten_penalty;
            }
        }

        let traits = &believer.traits;
        score += traits.gullibility * cfg.gullibility_weight;
        score += traits.curiosity * cfg.curiosity_weight;
        score -= traits.skepticism * cfg.skepticism_weight;

        if let (Some(believer_faction), Some(origin_faction)) = (
            believer.faction,
            origin_profile.and_then(|p| p.faction),
        ) {
            match factions.relation(origin_faction, believer_faction) {
                FactionRelation::Allied => score += cfg.allied_bonus,
                FactionRelation::Hostile => score -= cfg.hostile_penalty,
                FactionRelation::Neutral => {}
            }
        }

        score.clamp(0.0, 1.0)
    }
}
