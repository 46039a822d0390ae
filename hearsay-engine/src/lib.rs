//! # hearsay-engine — async rumor propagation engine
//!
//! Ties the pure rumor model from `hearsay-core` to the narration backends
//! in `hearsay-gen`. Game code pushes [`WorldEvent`]s into a bounded queue;
//! a background [`runtime`] loop drains them in batches, narrates them into
//! rumors, and ages everyone's memories. All queries go through the
//! clone-shareable [`RumorEngine`] handle.
//!
//! ```no_run
//! use hearsay_core::HearsayConfig;
//! use hearsay_core::types::{EntityId, GameTimestamp};
//! use hearsay_engine::{RumorEngine, WorldEvent, runtime};
//! use hearsay_gen::NarratorClient;
//!
//! # #[tokio::main] async fn main() {
//! let engine = RumorEngine::new(HearsayConfig::default(), NarratorClient::template());
//! let handle = runtime::spawn(engine.clone());
//!
//! let witness = EntityId::new();
//! engine.submit_event(WorldEvent::new(
//!     "tavern_brawl",
//!     vec![witness],
//!     GameTimestamp::now(0),
//! ));
//! # handle.stop().await;
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod engine;
pub mod events;
pub mod metrics;
pub mod queue;
pub mod runtime;
pub mod truth;

pub use engine::{RumorEngine, narrator_from_config};
pub use events::WorldEvent;
pub use metrics::{CounterSnapshot, EngineCounters};
pub use queue::{EventQueue, QueueStats};
pub use truth::{TokenOverlap, TruthEstimator};
