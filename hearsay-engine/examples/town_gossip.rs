//! A small town spreads a rumor.
//!
//! Seeds one event, lets the processing loop narrate it, then walks the
//! rumor through a gossip chain, a public contradiction, and decay, printing
//! the lifecycle stage as it goes.
//!
//! Run with: `cargo run --example town_gossip`

use anyhow::Result;
use hearsay_core::HearsayConfig;
use hearsay_core::types::{EntityId, EntityProfile, GameTimestamp, PersonalityTraits};
use hearsay_engine::{RumorEngine, WorldEvent, runtime};
use hearsay_gen::NarratorClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config = HearsayConfig::default();
    config.generation.min_request_interval_ms = 0;
    let engine = RumorEngine::new(config, NarratorClient::template());
    let handle = runtime::spawn(engine.clone());

    // Ten townsfolk with varied dispositions.
    let town: Vec<EntityId> = (0..10).map(|_| EntityId::new()).collect();
    for (i, entity) in town.iter().enumerate() {
        let gullibility = i as f32 / 10.0;
        engine.register_entity(
            *entity,
            EntityProfile::with_traits(PersonalityTraits::new(gullibility, 0.3, 0.6)),
        );
    }

    let event = WorldEvent::new("tavern_brawl", vec![town[0], town[1]], GameTimestamp::now(0))
        .named(vec!["Mira".into(), "Aldous".into()])
        .at("the Drowned Rat")
        .with_context("over a card game")
        .with_importance(0.7);
    let event_id = event.id;
    engine.submit_event(event);

    // Let the loop pick the event up.
    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
    let rumor_id = engine
        .rumor_for_event(event_id)
        .ok_or_else(|| anyhow::anyhow!("event was not processed"))?;
    let rumor = engine.rumor(rumor_id).expect("rumor exists");
    println!("canonical: {}", rumor.core_content);

    // Gossip spreads down the line.
    let mut teller = town[0];
    for (hop, listener) in town.iter().skip(2).enumerate() {
        let now = engine.advance_tick();
        let heard = engine.retell(teller, *listener, rumor_id, now)?;
        println!("hop {}: {heard}", hop + 1);
        teller = *listener;
    }
    println!("stage: {}", engine.classify(rumor_id)?);
    println!("fidelity: {:.2}", engine.content_fidelity(rumor_id)?);

    // The barkeep publicly sets the record straight.
    engine.contradict(rumor_id)?;
    for _ in 0..10 {
        engine.advance_tick();
        engine.decay_pass();
    }
    println!("after contradiction and a quiet week: {}", engine.classify(rumor_id)?);
    println!("{:#?}", engine.counters());

    handle.stop().await;
    Ok(())
}
