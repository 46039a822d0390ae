//! Property-based tests for the rumor model.
//!
//! Uses `proptest` to hammer the pure kernels with random inputs: scores
//! stay clamped, distortion never goes backwards, decay is monotone, and
//! the lifecycle classifier is total.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use hearsay_core::analytics::{LegacyState, SpreadStats};
use hearsay_core::believability::BelievabilityCalculator;
use hearsay_core::config::{BelievabilityConfig, DecayConfig, MutationConfig};
use hearsay_core::decay::{DecayScheduler, EvidenceClimate};
use hearsay_core::memory::{MemoryLedger, RumorMemory};
use hearsay_core::mutation::MutationEngine;
use hearsay_core::rumor::{Rumor, RumorOrigin};
use hearsay_core::types::{
    EntityId, FactionGraph, GameTimestamp, PersonalityTraits, EntityProfile,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_traits() -> impl Strategy<Value = PersonalityTraits> {
    (0.0..=1.0f32, 0.0..=1.0f32, 0.0..=1.0f32)
        .prop_map(|(g, s, c)| PersonalityTraits::new(g, s, c))
}

fn arb_rumor() -> impl Strategy<Value = Rumor> {
    (proptest::option::of(0.0..=1.0f32), 0.01..=1.0f32).prop_map(|(truth, importance)| {
        Rumor::new(
            "a stranger was seen near the old mill",
            truth,
            RumorOrigin::from_entity(EntityId::new(), GameTimestamp::now(0)),
            importance,
        )
    })
}

fn arb_memory() -> impl Strategy<Value = RumorMemory> {
    (0.0..=1.0f32, proptest::bool::ANY).prop_map(|(strength, forgotten)| {
        let mut m = RumorMemory::new(GameTimestamp::now(0), strength);
        m.is_forgotten = forgotten;
        m
    })
}

// ---------------------------------------------------------------------------
// Property: believability is always in [0, 1] and pure
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn believability_always_clamped(
        traits in arb_traits(),
        rumor in arb_rumor(),
        memory in arb_memory(),
    ) {
        let calc = BelievabilityCalculator::new(BelievabilityConfig::default());
        let believer = EntityProfile::with_traits(traits);
        let factions = FactionGraph::new();

        let score = calc.score(&believer, &rumor, Some(&memory), None, &factions);
        prop_assert!((0.0..=1.0).contains(&score));

        // Scoring twice with identical inputs yields identical output.
        let again = calc.score(&believer, &rumor, Some(&memory), None, &factions);
        prop_assert_eq!(score, again);
    }
}

// ---------------------------------------------------------------------------
// Property: distortion never decreases along a retelling chain
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn distortion_is_monotone_across_retellings(seed in any::<u64>(), hops in 1_usize..40) {
        let engine = MutationEngine::new(MutationConfig::default());
        let mut rng = StdRng::seed_from_u64(seed);
        let mut rumor = Rumor::new(
            "the baron hoards grain in the cellar",
            Some(0.8),
            RumorOrigin::from_entity(EntityId::new(), GameTimestamp::now(0)),
            0.5,
        );

        let mut previous = 0.0f32;
        for hop in 0..hops {
            let teller = EntityId::new();
            let mut memory = RumorMemory::new(GameTimestamp::now(hop as u64), 1.0);
            engine.mutate(
                &mut rumor,
                &mut memory,
                teller,
                previous,
                GameTimestamp::now(hop as u64),
                &mut rng,
            );
            let latest = rumor.history.last().map_or(0.0, |t| t.distortion_level);
            prop_assert!(latest >= previous - 1e-6);
            prop_assert!((0.0..=1.0).contains(&latest));
            previous = latest;
        }
        prop_assert_eq!(rumor.history.len(), hops);
    }
}

// ---------------------------------------------------------------------------
// Property: decay is monotone and forgotten is absorbing
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn decay_never_raises_strength(
        start in 0.0..=1.0f32,
        importance in 0.01..=1.0f32,
        ticks in 1_usize..100,
    ) {
        let scheduler = DecayScheduler::new(DecayConfig::default());
        let mut memory = RumorMemory::new(GameTimestamp::now(0), start);
        let mut previous = memory.strength;
        let mut was_forgotten = memory.is_forgotten;
        for _ in 0..ticks {
            scheduler.decay_tick(&mut memory, importance, EvidenceClimate::Neutral);
            prop_assert!(memory.strength <= previous);
            prop_assert!(memory.strength >= 0.0);
            // Once forgotten, a memory never silently revives.
            if was_forgotten {
                prop_assert!(memory.is_forgotten);
            }
            previous = memory.strength;
            was_forgotten = memory.is_forgotten;
        }
    }
}

// ---------------------------------------------------------------------------
// Property: the lifecycle classifier is total and consistent
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn classifier_is_total(
        knowers in 0_usize..60,
        population in 1_usize..60,
        strength in 0.0..=1.0f32,
    ) {
        let rumor = hearsay_core::types::RumorId::new();
        let mut ledger = MemoryLedger::new();
        for _ in 0..knowers {
            ledger.learn(EntityId::new(), rumor, RumorMemory::new(GameTimestamp::now(0), strength));
        }
        let stats = SpreadStats::measure(&ledger, rumor, population);
        let state = stats.classify();

        if stats.fraction < 0.05 {
            prop_assert_eq!(state, LegacyState::Forgotten);
        }
        if stats.fraction >= 0.40 {
            prop_assert!(matches!(state, LegacyState::Widespread | LegacyState::Fading));
        }
    }
}
