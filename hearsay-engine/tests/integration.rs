//! End-to-end scenarios driving the engine through its public handle.

use hearsay_core::HearsayConfig;
use hearsay_core::analytics::LegacyState;
use hearsay_core::decay::EvidenceClimate;
use hearsay_core::error::HearsayError;
use hearsay_core::types::{EntityId, EntityProfile, GameTimestamp, PersonalityTraits};
use hearsay_engine::{RumorEngine, WorldEvent, runtime};
use hearsay_gen::{NarrationBackend, NarratorClient};

fn test_config() -> HearsayConfig {
    let mut config = HearsayConfig::default();
    // No spacing between narration calls in tests.
    config.generation.min_request_interval_ms = 0;
    config
}

fn engine(seed: u64) -> RumorEngine {
    RumorEngine::with_seed(test_config(), NarratorClient::template(), seed)
}

#[tokio::test]
async fn event_becomes_a_narrated_rumor_known_by_witnesses() {
    let engine = engine(1);
    let mira = EntityId::new();
    let aldous = EntityId::new();

    let event = WorldEvent::new("tavern_brawl", vec![mira, aldous], GameTimestamp::now(0))
        .named(vec!["Mira".into(), "Aldous".into()])
        .at("the Drowned Rat");
    let event_id = event.id;
    assert!(engine.submit_event(event));

    let processed = engine.process_batch(GameTimestamp::now(1)).await;
    assert_eq!(processed, 1);

    let rumor_id = engine.rumor_for_event(event_id).expect("rumor created");
    let rumor = engine.rumor(rumor_id).expect("rumor exists");
    assert!(rumor.core_content.contains("Mira"));
    assert!(rumor.core_content.contains("Drowned Rat"));

    // Both witnesses hold full-strength memories.
    for witness in [mira, aldous] {
        let memory = engine.memory(witness, rumor_id).expect("witness knows");
        assert_eq!(memory.strength, 1.0);
    }
    assert_eq!(engine.counters().rumors_created, 1);
}

#[tokio::test]
async fn invalid_events_are_skipped_not_fatal() {
    let engine = engine(2);
    let event = WorldEvent::new("", vec![EntityId::new()], GameTimestamp::now(0));
    assert!(!engine.submit_event(event));
    assert_eq!(engine.counters().events_invalid, 1);
    assert_eq!(engine.process_batch(GameTimestamp::now(1)).await, 0);
}

#[tokio::test]
async fn duplicate_event_ids_fold_into_one_rumor() {
    let engine = engine(3);
    let witness = EntityId::new();
    let event = WorldEvent::new("duel", vec![witness], GameTimestamp::now(0));
    let copy = event.clone();
    engine.submit_event(event);
    engine.submit_event(copy);

    engine.process_batch(GameTimestamp::now(1)).await;
    assert_eq!(engine.counters().rumors_created, 1);
    assert_eq!(engine.counters().events_deduplicated, 1);
}

#[tokio::test]
async fn structurally_identical_events_reuse_cached_narration() {
    let engine = engine(4);
    let first = WorldEvent::new("guard_change", vec![EntityId::new()], GameTimestamp::now(0))
        .named(vec!["Captain Hale".into()])
        .at("north gate");
    let second = WorldEvent::new("guard_change", vec![EntityId::new()], GameTimestamp::now(0))
        .named(vec!["Captain Hale".into()])
        .at("north gate");
    let (first_id, second_id) = (first.id, second.id);
    engine.submit_event(first);
    engine.submit_event(second);
    engine.process_batch(GameTimestamp::now(1)).await;

    let a = engine.rumor(engine.rumor_for_event(first_id).unwrap()).unwrap();
    let b = engine.rumor(engine.rumor_for_event(second_id).unwrap()).unwrap();
    assert_eq!(a.core_content, b.core_content);
    assert_eq!(engine.cache_stats().hits, 1);
    assert_eq!(engine.cache_stats().entries, 1);
}

#[tokio::test]
async fn unverified_events_get_an_estimated_truth_value() {
    let engine = engine(16);
    let a = EntityId::new();
    let b = EntityId::new();
    let event = WorldEvent::new("gossip", vec![a, b], GameTimestamp::now(0))
        .at("the tavern")
        .with_context("a coin was stolen from the card table");
    let event_id = event.id;
    engine.submit_event(event);
    engine.process_batch(GameTimestamp::now(1)).await;

    // No producer-asserted truth, so the estimator must have run: the
    // narration wraps the context in attribution phrasing, which keeps
    // token overlap strictly below a perfect score.
    let rumor = engine.rumor(engine.rumor_for_event(event_id).unwrap()).unwrap();
    let truth = rumor.truth_value.expect("estimated from context");
    assert!(truth > 0.0 && truth < 1.0);
    for witness in [a, b] {
        let memory = engine.memory(witness, rumor.id).expect("witness knows");
        assert!(memory.knows());
        assert!(memory.strength > 0.0);
    }
}

#[tokio::test]
async fn asserted_truth_skips_estimation_and_no_context_leaves_none() {
    let engine = engine(23);
    let witness = EntityId::new();

    let vouched = WorldEvent::new("coronation", vec![witness], GameTimestamp::now(0))
        .with_context("the crown passed to the second heir")
        .with_truth(1.0);
    let vouched_id = vouched.id;
    engine.submit_event(vouched);

    let blind = WorldEvent::new("strange_lights", vec![witness], GameTimestamp::now(0));
    let blind_id = blind.id;
    engine.submit_event(blind);

    engine.process_batch(GameTimestamp::now(1)).await;

    let vouched_rumor = engine.rumor(engine.rumor_for_event(vouched_id).unwrap()).unwrap();
    assert_eq!(vouched_rumor.truth_value, Some(1.0));

    let blind_rumor = engine.rumor(engine.rumor_for_event(blind_id).unwrap()).unwrap();
    assert_eq!(blind_rumor.truth_value, None);
}

#[tokio::test]
async fn narration_failure_falls_back_to_the_event_summary() {
    let mut config = test_config();
    config.generation.max_retries = 0;
    let narrator = NarratorClient::new(
        NarrationBackend::None,
        0,
        hearsay_gen::ExponentialBackoff::default(),
        3,
        1000,
    );
    let engine = RumorEngine::with_seed(config, narrator, 5);

    let event = WorldEvent::new("shipwreck", vec![EntityId::new()], GameTimestamp::now(0))
        .named(vec!["the Gull".into()]);
    let event_id = event.id;
    engine.submit_event(event);
    engine.process_batch(GameTimestamp::now(1)).await;

    let rumor = engine.rumor(engine.rumor_for_event(event_id).unwrap()).unwrap();
    assert_eq!(rumor.core_content, "shipwreck involving the Gull");
    assert_eq!(engine.counters().narration_fallbacks, 1);
}

#[test]
fn retelling_requires_knowing_the_rumor() {
    let engine = engine(6);
    let stranger = EntityId::new();
    let listener = EntityId::new();
    let origin = EntityId::new();
    let rumor_id = engine.seed_rumor(
        "the mayor skipped the harvest blessing",
        Some(0.9),
        0.5,
        origin,
        GameTimestamp::now(0),
    );

    let err = engine
        .retell(stranger, listener, rumor_id, GameTimestamp::now(1))
        .unwrap_err();
    assert!(matches!(err, HearsayError::UnknownToTeller { .. }));

    // The origin can retell it just fine.
    let heard = engine
        .retell(origin, listener, rumor_id, GameTimestamp::now(1))
        .unwrap();
    assert!(!heard.is_empty());
    assert!(engine.memory(listener, rumor_id).is_some());
}

#[test]
fn distortion_never_decreases_along_a_gossip_chain() {
    let engine = engine(7);
    let origin = EntityId::new();
    let rumor_id = engine.seed_rumor(
        "a wolf was seen by the mill at dusk",
        Some(1.0),
        0.8,
        origin,
        GameTimestamp::now(0),
    );

    let mut teller = origin;
    let mut previous = 0.0f32;
    for hop in 1..=15u64 {
        let listener = EntityId::new();
        engine
            .retell(teller, listener, rumor_id, GameTimestamp::now(hop))
            .unwrap();
        let rumor = engine.rumor(rumor_id).unwrap();
        let latest = rumor.history.last().unwrap().distortion_level;
        assert!(latest >= previous);
        previous = latest;
        teller = listener;
    }
    let rumor = engine.rumor(rumor_id).unwrap();
    assert_eq!(rumor.history.len(), 15);
    // The canonical text never changed underneath the chain.
    assert_eq!(rumor.core_content, "a wolf was seen by the mill at dusk");
}

#[test]
fn a_newcomers_retelling_carries_the_chain_distortion() {
    let mut config = test_config();
    config.mutation.mutation_probability = 1.0;
    let engine = RumorEngine::with_seed(config, NarratorClient::template(), 17);
    let origin = EntityId::new();
    let rumor_id = engine.seed_rumor(
        "the ferry sank by the weir",
        Some(1.0),
        0.5,
        origin,
        GameTimestamp::now(0),
    );

    // Drive the story past what a single hop's jitter could produce on
    // its own.
    let mut teller = origin;
    let mut hop = 1u64;
    loop {
        let rumor = engine.rumor(rumor_id).unwrap();
        let drifted = rumor.history.last().map_or(0.0, |t| t.distortion_level);
        if drifted > 0.15 {
            break;
        }
        assert!(hop < 50, "distortion never accumulated");
        let listener = EntityId::new();
        engine
            .retell(teller, listener, rumor_id, GameTimestamp::now(hop))
            .unwrap();
        teller = listener;
        hop += 1;
    }
    let drifted = engine
        .rumor(rumor_id)
        .unwrap()
        .history
        .last()
        .unwrap()
        .distortion_level;

    // `teller` heard the story last hop and has never retold anything, so
    // their own text is still near canonical. Their retelling must still
    // be recorded at or above the chain's level, not restart from zero.
    engine
        .retell(teller, EntityId::new(), rumor_id, GameTimestamp::now(hop))
        .unwrap();
    let latest = engine
        .rumor(rumor_id)
        .unwrap()
        .history
        .last()
        .unwrap()
        .distortion_level;
    assert!(latest >= drifted);
    assert!(latest > 0.15);
}

#[test]
fn forgotten_listeners_relearn_when_allowed() {
    let engine = engine(8);
    let teller = EntityId::new();
    let listener = EntityId::new();
    let sink = EntityId::new();
    let rumor_id = engine.seed_rumor(
        "the well on cooper street ran dry",
        None,
        0.5,
        teller,
        GameTimestamp::now(0),
    );
    engine
        .retell(teller, listener, rumor_id, GameTimestamp::now(1))
        .unwrap();

    // The teller keeps gossiping (reinforcing themselves) while the
    // listener's memory decays untouched.
    let mut listener_forgot = false;
    for _ in 0..25 {
        let now = engine.advance_tick();
        engine.retell(teller, sink, rumor_id, now).unwrap();
        engine.decay_pass();
        if engine.memory(listener, rumor_id).unwrap().is_forgotten {
            listener_forgot = true;
            break;
        }
    }
    assert!(listener_forgot, "listener never forgot the rumor");
    assert!(engine.memory(teller, rumor_id).unwrap().knows());

    // Hearing it again brings the memory back; the record was never deleted.
    let now = engine.advance_tick();
    engine.retell(teller, listener, rumor_id, now).unwrap();
    let memory = engine.memory(listener, rumor_id).unwrap();
    assert!(memory.knows());
    assert!(memory.strength > 0.0);
}

#[test]
fn relearning_can_be_disabled() {
    let mut config = test_config();
    config.decay.allow_relearning = false;
    let engine = RumorEngine::with_seed(config, NarratorClient::template(), 9);

    let teller = EntityId::new();
    let listener = EntityId::new();
    let sink = EntityId::new();
    let rumor_id = engine.seed_rumor(
        "a comet fell behind the ridge",
        None,
        0.5,
        teller,
        GameTimestamp::now(0),
    );
    engine
        .retell(teller, listener, rumor_id, GameTimestamp::now(1))
        .unwrap();
    for _ in 0..25 {
        let now = engine.advance_tick();
        engine.retell(teller, sink, rumor_id, now).unwrap();
        engine.decay_pass();
        if engine.memory(listener, rumor_id).unwrap().is_forgotten {
            break;
        }
    }
    assert!(engine.memory(listener, rumor_id).unwrap().is_forgotten);

    let now = engine.advance_tick();
    engine.retell(teller, listener, rumor_id, now).unwrap();
    assert!(engine.memory(listener, rumor_id).unwrap().is_forgotten);
}

#[test]
fn contradiction_weakens_every_living_memory() {
    let engine = engine(10);
    let origin = EntityId::new();
    let rumor_id = engine.seed_rumor(
        "the smith sells stolen horseshoes",
        Some(0.2),
        0.9,
        origin,
        GameTimestamp::now(0),
    );
    let mut listeners = Vec::new();
    for hop in 1..=5u64 {
        let listener = EntityId::new();
        engine
            .retell(origin, listener, rumor_id, GameTimestamp::now(hop))
            .unwrap();
        listeners.push(listener);
    }

    let before: Vec<f32> = listeners
        .iter()
        .map(|l| engine.memory(*l, rumor_id).unwrap().strength)
        .collect();
    let affected = engine.contradict(rumor_id).unwrap();
    assert_eq!(affected, 6); // origin plus five listeners
    for (listener, old) in listeners.iter().zip(before) {
        let new = engine.memory(*listener, rumor_id).unwrap().strength;
        assert!(new < old);
    }
    assert_eq!(engine.counters().contradictions, 1);
}

#[tokio::test]
async fn widely_known_strong_rumor_classifies_as_widespread() {
    let engine = engine(11);
    let population: Vec<EntityId> = (0..10).map(|_| EntityId::new()).collect();
    for entity in &population {
        engine.register_entity(*entity, EntityProfile::default());
    }

    let event = WorldEvent::new(
        "bridge_collapse",
        population[..4].to_vec(),
        GameTimestamp::now(0),
    )
    .with_importance(0.9);
    let event_id = event.id;
    engine.submit_event(event);
    engine.process_batch(GameTimestamp::now(1)).await;

    let rumor_id = engine.rumor_for_event(event_id).unwrap();
    let stats = engine.spread(rumor_id).unwrap();
    assert_eq!(stats.known_by, 4);
    assert_eq!(stats.population, 10);
    assert_eq!(engine.classify(rumor_id).unwrap(), LegacyState::Widespread);
}

#[test]
fn evidence_climate_speeds_up_forgetting() {
    let contested = engine(12);
    let quiet = engine(12);
    let mut strengths = Vec::new();
    for (engine, climate) in [
        (&contested, EvidenceClimate::AuthorityContradiction),
        (&quiet, EvidenceClimate::Supporting),
    ] {
        let origin = EntityId::new();
        let rumor_id = engine.seed_rumor(
            "the granary count came up short",
            Some(1.0),
            0.5,
            origin,
            GameTimestamp::now(0),
        );
        engine.set_evidence(rumor_id, climate).unwrap();
        for _ in 0..4 {
            engine.decay_pass();
        }
        strengths.push(engine.memory(origin, rumor_id).unwrap().strength);
    }
    assert!(strengths[0] < strengths[1]);
}

#[test]
fn gullible_entities_rank_rumors_higher_than_skeptics() {
    let engine = engine(13);
    let gullible = EntityId::new();
    let skeptic = EntityId::new();
    engine.register_entity(
        gullible,
        EntityProfile::with_traits(PersonalityTraits::new(1.0, 0.0, 0.5)),
    );
    engine.register_entity(
        skeptic,
        EntityProfile::with_traits(PersonalityTraits::new(0.0, 1.0, 0.5)),
    );

    let origin = EntityId::new();
    let rumor_id = engine.seed_rumor(
        "a dragon nests in the old quarry",
        None,
        0.5,
        origin,
        GameTimestamp::now(0),
    );
    engine
        .retell(origin, gullible, rumor_id, GameTimestamp::now(1))
        .unwrap();
    engine
        .retell(gullible, skeptic, rumor_id, GameTimestamp::now(2))
        .unwrap();

    let credulous_score = engine.believability(gullible, rumor_id).unwrap();
    let doubting_score = engine.believability(skeptic, rumor_id).unwrap();
    assert!(credulous_score > doubting_score);

    let known = engine.rumors_known_by(gullible);
    assert_eq!(known.len(), 1);
    assert_eq!(known[0].0, rumor_id);
}

#[test]
fn clarification_restores_the_canonical_text() {
    let engine = engine(14);
    let origin = EntityId::new();
    let rumor_id = engine.seed_rumor(
        "two carts collided on market day",
        Some(1.0),
        0.5,
        origin,
        GameTimestamp::now(0),
    );
    let mut teller = origin;
    for hop in 1..=8u64 {
        let listener = EntityId::new();
        engine
            .retell(teller, listener, rumor_id, GameTimestamp::now(hop))
            .unwrap();
        teller = listener;
    }
    let drifted = engine.content_fidelity(rumor_id).unwrap();

    let text = engine.clarify(origin, rumor_id, GameTimestamp::now(9)).unwrap();
    assert_eq!(text, "two carts collided on market day");
    let restored = engine.content_fidelity(rumor_id).unwrap();
    assert!(restored >= drifted);
    assert!((restored - 1.0).abs() < 1e-6);

    // Clarification does not rewind the distortion meter.
    let rumor = engine.rumor(rumor_id).unwrap();
    let last_two: Vec<f32> = rumor
        .history
        .iter()
        .rev()
        .take(2)
        .map(|t| t.distortion_level)
        .collect();
    assert_eq!(last_two[0], last_two[1]);
}

#[test]
fn engine_builds_from_a_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hearsay.toml");
    std::fs::write(
        &path,
        r#"
        [engine]
        max_batch_size = 2
        queue_capacity = 4
        overflow_policy = "reject"

        [generation]
        min_request_interval_ms = 0

        [decay]
        allow_relearning = false
        "#,
    )
    .unwrap();

    let config = HearsayConfig::from_file(&path).unwrap();
    let engine = RumorEngine::with_seed(config, NarratorClient::template(), 99);
    assert_eq!(engine.config().engine.max_batch_size, 2);
    assert_eq!(engine.config().engine.queue_capacity, 4);
    assert!(!engine.config().decay.allow_relearning);
}

#[tokio::test(start_paused = true)]
async fn processing_loop_drives_the_whole_lifecycle() {
    let mut config = test_config();
    config.engine.process_interval_ms = 1000;
    let engine = RumorEngine::with_seed(config, NarratorClient::template(), 15);
    let witness = EntityId::new();

    let event = WorldEvent::new("masked_rider", vec![witness], GameTimestamp::now(0));
    let event_id = event.id;
    engine.submit_event(event);

    let handle = runtime::spawn(engine.clone());
    tokio::time::sleep(std::time::Duration::from_millis(3500)).await;
    handle.stop().await;

    let rumor_id = engine.rumor_for_event(event_id).expect("loop processed the event");
    assert!(engine.memory(witness, rumor_id).is_some());
    assert!(engine.counters().decay_passes >= 1);
}
