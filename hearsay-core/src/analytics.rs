//! Population-level rumor analytics.
//!
//! Classifies a rumor's lifecycle stage from how widely it is known and how
//! strongly the knowers remember it.

use crate::memory::MemoryLedger;
use crate::types::RumorId;

/// Lifecycle stage of a rumor across the tracked population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyState {
    /// Effectively dead: almost nobody holds a living memory of it.
    Forgotten,
    /// Just seeded, barely circulating.
    New,
    /// Actively moving through the population.
    Spreading,
    /// Known by a large share, and believed strongly.
    Widespread,
    /// Known by a large share, but conviction is draining away.
    Fading,
}

impl std::fmt::Display for LegacyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Forgotten => "forgotten",
            Self::New => "new",
            Self::Spreading => "spreading",
            Self::Widespread => "widespread",
            Self::Fading => "fading",
        };
        f.write_str(label)
    }
}

/// How far a rumor has spread, and how strongly it is held.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SpreadStats {
    /// Entities holding a living (non-forgotten) memory of the rumor.
    pub known_by: usize,
    /// Total tracked population.
    pub population: usize,
    /// `known_by / population`, or 0 for an empty population.
    pub fraction: f32,
    /// Mean strength across the living memories, or 0 if nobody knows it.
    pub avg_strength: f32,
}

impl SpreadStats {
    /// Measure a rumor against the ledger.
    ///
    /// Forgotten memories count toward the population but not toward spread
    /// or average strength.
    #[must_use]
    pub fn measure(ledger: &MemoryLedger, rumor: RumorId, population: usize) -> Self {
        let mut known_by = 0_usize;
        let mut total_strength = 0.0_f32;
        for (_, memory) in ledger.for_rumor(rumor) {
            if memory.is_forgotten {
                continue;
            }
            known_by += 1;
            total_strength += memory.strength;
        }

        let fraction = if population == 0 {
            0.0
        } else {
            known_by as f32 / population as f32
        };
        let avg_strength = if known_by == 0 {
            0.0
        } else {
            total_strength / known_by as f32
        };
        Self {
            known_by,
            population,
            fraction,
            avg_strength,
        }
    }

    /// Classify the rumor's lifecycle stage.
    ///
    /// Buckets on the spread fraction: below 5% forgotten, 5–10% new,
    /// 10–40% spreading, 40%+ widespread while average strength stays above
    /// 0.5 and fading once it drops.
    #[must_use]
    pub fn classify(&self) -> LegacyState {
        if self.fraction < 0.05 {
            LegacyState::Forgotten
        } else if self.fraction < 0.10 {
            LegacyState::New
        } else if self.fraction < 0.40 {
            LegacyState::Spreading
        } else if self.avg_strength > 0.5 {
            LegacyState::Widespread
        } else {
            LegacyState::Fading
        }
    }
}
