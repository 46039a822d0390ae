//! Retelling mutation — template-based distortion of rumor text.
//!
//! Each retelling rolls against a configured probability; when it fires,
//! one or two distortion categories rewrite the text the teller passes on.
//! Distortion only ever accumulates: every hop adds a non-negative
//! perturbation, modeling information degradation along the chain.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::MutationConfig;
use crate::memory::RumorMemory;
use crate::rumor::{Rumor, RumorTransformation, TransformationKind};
use crate::types::{EntityId, GameTimestamp, TransformationId};

/// Uncertainty prefixes — hearsay markers prepended to the claim.
const HEDGE_PREFIXES: &[&str] = &[
    "Supposedly, ",
    "Allegedly, ",
    "Word is that ",
    "They say ",
    "Apparently, ",
];

/// Location vagueness replacements.
const LOCATION_SWAPS: &[(&str, &str)] = &[
    ("at the", "somewhere near the"),
    ("in the", "around the"),
    ("near the", "somewhere close to the"),
];

/// Intensity amplification replacements, with a prefix fallback.
const AMPLIFY_SWAPS: &[(&str, &str)] = &[
    ("was seen", "was definitely seen"),
    ("a few", "dozens of"),
    ("some", "a great many"),
    ("stole", "brazenly stole"),
];
const AMPLIFY_PREFIX: &str = "It is absolutely certain that ";

/// Intensity diminishment replacements, with a prefix fallback.
const DIMINISH_SWAPS: &[(&str, &str)] = &[
    ("definitely", "possibly"),
    ("was", "might have been"),
    ("stole", "might have taken"),
    ("saw", "thought they saw"),
];
const DIMINISH_PREFIX: &str = "It is possible that ";

/// Trailing uncertainty markers, occasionally appended on mutation.
const UNCERTAINTY_MARKERS: &[&str] = &[
    " (or so I heard)",
    " (though no one is certain)",
    " (if the rumors are true)",
    " (allegedly)",
];

/// The distortion categories a mutation can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Hedge,
    ObscureLocation,
    Amplify,
    Diminish,
}

impl Category {
    const ALL: [Self; 4] = [
        Self::Hedge,
        Self::ObscureLocation,
        Self::Amplify,
        Self::Diminish,
    ];

    fn kind(self) -> TransformationKind {
        match self {
            Self::Hedge => TransformationKind::Hedge,
            Self::ObscureLocation => TransformationKind::ObscureLocation,
            Self::Amplify => TransformationKind::Exaggerate,
            Self::Diminish => TransformationKind::Diminish,
        }
    }
}

/// Applies template-based distortion when a rumor is retold.
#[derive(Debug, Clone)]
pub struct MutationEngine {
    config: MutationConfig,
}

impl MutationEngine {
    /// Create a mutation engine with the given tuning.
    #[must_use]
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    /// Retell `rumor` as `teller`, appending exactly one transformation to
    /// the rumor's history and to the teller's local transformations.
    ///
    /// `base_distortion` is the distortion the circulating story has
    /// accumulated so far, normally the level of the most recent
    /// transformation in the rumor's history regardless of who produced
    /// it. The new transformation's distortion is that base plus a
    /// non-negative random perturbation, clamped to [0, 1], so distortion
    /// never decreases along a retelling chain even when the teller's own
    /// text is still close to canonical.
    pub fn mutate<R: Rng>(
        &self,
        rumor: &mut Rumor,
        teller_memory: &mut RumorMemory,
        teller: EntityId,
        base_distortion: f32,
        now: GameTimestamp,
        rng: &mut R,
    ) -> TransformationId {
        let source = rumor.content_for(teller).to_string();

        let (kind, content, distortion) = if rng.gen_bool(f64::from(
            self.config.mutation_probability.clamp(0.0, 1.0),
        )) {
            let (kind, mut text) = self.distort(&source, rng);
            if rng.gen_bool(f64::from(
                self.config.uncertainty_marker_probability.clamp(0.0, 1.0),
            )) {
                text.push_str(
                    UNCERTAINTY_MARKERS
                        .choose(rng)
                        .copied()
                        .unwrap_or_default(),
                );
            }
            let perturbation = rng.gen_range(0.0..=self.config.distortion_jitter_max.max(0.0));
            (kind, text, (base_distortion + perturbation).clamp(0.0, 1.0))
        } else {
            // Faithful retelling: text and distortion carry over unchanged.
            (
                TransformationKind::Retell,
                source,
                base_distortion.clamp(0.0, 1.0),
            )
        };

        let transformation = RumorTransformation::new(teller, now, kind, content, distortion);
        let id = rumor.record_transformation(transformation);
        teller_memory.record_local_transformation(id);
        id
    }

    /// Restate the canonical account, appending a `Clarify` transformation.
    ///
    /// Clarification resets the *text* to the original but never lowers the
    /// recorded distortion level — the chain has still drifted that far.
    pub fn clarify(
        &self,
        rumor: &mut Rumor,
        teller_memory: &mut RumorMemory,
        teller: EntityId,
        now: GameTimestamp,
    ) -> TransformationId {
        let prior = rumor
            .history
            .last()
            .map_or(0.0, |t| t.distortion_level);
        let transformation = RumorTransformation::new(
            teller,
            now,
            TransformationKind::Clarify,
            rumor.core_content.clone(),
            prior,
        );
        let id = rumor.record_transformation(transformation);
        teller_memory.record_local_transformation(id);
        id
    }

    /// Apply one or two distortion categories to the text.
    fn distort<R: Rng>(&self, source: &str, rng: &mut R) -> (TransformationKind, String) {
        let count = rng.gen_range(1..=2usize);
        let mut categories = Category::ALL;
        categories.shuffle(rng);

        let mut text = source.to_string();
        let mut first_kind = None;
        for category in categories.iter().take(count) {
            text = apply_category(*category, &text, rng);
            first_kind.get_or_insert(category.kind());
        }
        (first_kind.unwrap_or(TransformationKind::Retell), text)
    }
}

/// Rewrite the text for a single category.
fn apply_category<R: Rng>(category: Category, text: &str, rng: &mut R) -> String {
    match category {
        Category::Hedge => {
            let prefix = HEDGE_PREFIXES.choose(rng).copied().unwrap_or("Supposedly, ");
            format!("{prefix}{text}")
        }
        Category::ObscureLocation => swap_or_keep(text, LOCATION_SWAPS, rng),
        Category::Amplify => swap_or_prefix(text, AMPLIFY_SWAPS, AMPLIFY_PREFIX, rng),
        Category::Diminish => swap_or_prefix(text, DIMINISH_SWAPS, DIMINISH_PREFIX, rng),
    }
}

/// Replace the first matching phrase pair; leave the text alone otherwise.
fn swap_or_keep<R: Rng>(text: &str, swaps: &[(&str, &str)], rng: &mut R) -> String {
    let mut candidates: Vec<&(&str, &str)> = swaps.iter().filter(|(from, _)| text.contains(from)).collect();
    candidates.shuffle(rng);
    match candidates.first() {
        Some((from, to)) => text.replacen(from, to, 1),
        None => text.to_string(),
    }
}

/// Replace the first matching phrase pair, falling back to a prefix.
fn swap_or_prefix<R: Rng>(
    text: &str,
    swaps: &[(&str, &str)],
    fallback_prefix: &str,
    rng: &mut R,
) -> String {
    let mut candidates: Vec<&(&str, &str)> = swaps.iter().filter(|(from, _)| text.contains(from)).collect();
    candidates.shuffle(rng);
    match candidates.first() {
        Some((from, to)) => text.replacen(from, to, 1),
        None => format!("{fallback_prefix}{text}"),
    }
}
