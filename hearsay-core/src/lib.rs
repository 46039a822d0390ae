//! # Hearsay Core
//!
//! Engine-agnostic rumor propagation model. A [`Rumor`] is an immutable core
//! fact plus an append-only chain of [`RumorTransformation`]s; every entity
//! that hears it holds a private [`RumorMemory`] that strengthens with
//! retellings and decays over time.
//!
//! The crate is split along the rumor lifecycle:
//!
//! - **Mutation** — each retelling may distort the content ([`MutationEngine`])
//! - **Believability** — pure scoring of how much an entity buys a rumor
//! - **Decay** — per-tick erosion, reinforcement, contradiction ([`DecayScheduler`])
//! - **Analytics** — population-level lifecycle classification ([`SpreadStats`])
//!
//! Everything here is synchronous and deterministic given an RNG; the async
//! runtime, event queue, and narration backends live in the companion crates.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod analytics;
pub mod believability;
pub mod config;
pub mod decay;
pub mod error;
pub mod memory;
pub mod mutation;
pub mod rumor;
pub mod types;

pub use analytics::{LegacyState, SpreadStats};
pub use believability::BelievabilityCalculator;
pub use config::HearsayConfig;
pub use decay::{DecayScheduler, EvidenceClimate, run_decay_pass};
pub use error::{HearsayError, Result};
pub use memory::{MemoryLedger, RumorMemory};
pub use mutation::MutationEngine;
pub use rumor::{Rumor, RumorOrigin, RumorTransformation, TransformationKind};
pub use types::*;
