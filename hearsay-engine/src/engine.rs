//! The rumor engine — owns all rumor state and wires the pieces together.
//!
//! `RumorEngine` is a cheap-to-clone handle; clones share the same state.
//! Game threads submit events and ask questions; the processing loop drains
//! the queue and runs decay. The state lock is never held across an await:
//! narration happens first, then a short write commits the result.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use hearsay_core::analytics::{LegacyState, SpreadStats};
use hearsay_core::believability::BelievabilityCalculator;
use hearsay_core::config::HearsayConfig;
use hearsay_core::decay::{DecayScheduler, EvidenceClimate, run_decay_pass};
use hearsay_core::memory::{MemoryLedger, RumorMemory};
use hearsay_core::mutation::MutationEngine;
use hearsay_core::rumor::{Rumor, RumorOrigin, TransformationKind};
use hearsay_core::types::{
    EntityId, EntityProfile, EventId, FactionGraph, FactionId, FactionRelation, GameTimestamp,
    RumorId,
};
use hearsay_core::{HearsayError, Result};
use hearsay_gen::{
    CacheKey, CacheStats, NarrationParams, NarrationRequest, NarratorClient, Throttle,
    TransformationCache,
};

use crate::events::WorldEvent;
use crate::metrics::EngineCounters;
use crate::queue::{EventQueue, QueueStats};
use crate::truth::{TokenOverlap, TruthEstimator};

struct EngineState {
    rumors: HashMap<RumorId, Rumor>,
    by_event: HashMap<EventId, RumorId>,
    ledger: MemoryLedger,
    profiles: HashMap<EntityId, EntityProfile>,
    factions: FactionGraph,
    climates: HashMap<RumorId, EvidenceClimate>,
    tick: u64,
    rng: StdRng,
}

/// Shared handle to the rumor engine.
#[derive(Clone)]
pub struct RumorEngine {
    inner: Arc<RwLock<EngineState>>,
    queue: EventQueue,
    narrator: Arc<NarratorClient>,
    cache: Arc<TransformationCache>,
    throttle: Arc<Throttle>,
    counters: Arc<EngineCounters>,
    config: Arc<HearsayConfig>,
    mutation: MutationEngine,
    believability: BelievabilityCalculator,
    decay: DecayScheduler,
    truth: Arc<dyn TruthEstimator>,
}

impl RumorEngine {
    /// Create an engine with a fresh entropy-seeded RNG.
    #[must_use]
    pub fn new(config: HearsayConfig, narrator: NarratorClient) -> Self {
        Self::with_seed(config, narrator, rand::random::<u64>())
    }

    /// Create an engine with a fixed RNG seed for reproducible runs.
    #[must_use]
    pub fn with_seed(config: HearsayConfig, narrator: NarratorClient, seed: u64) -> Self {
        let queue = EventQueue::new(
            config.engine.queue_capacity,
            config.engine.overflow_policy,
        );
        let throttle = Throttle::new(std::time::Duration::from_millis(
            config.generation.min_request_interval_ms,
        ));
        Self {
            inner: Arc::new(RwLock::new(EngineState {
                rumors: HashMap::new(),
                by_event: HashMap::new(),
                ledger: MemoryLedger::new(),
                profiles: HashMap::new(),
                factions: FactionGraph::new(),
                climates: HashMap::new(),
                tick: 0,
                rng: StdRng::seed_from_u64(seed),
            })),
            queue,
            narrator: Arc::new(narrator),
            cache: Arc::new(TransformationCache::new()),
            throttle: Arc::new(throttle),
            counters: Arc::new(EngineCounters::new()),
            mutation: MutationEngine::new(config.mutation.clone()),
            believability: BelievabilityCalculator::new(config.believability.clone()),
            decay: DecayScheduler::new(config.decay.clone()),
            truth: Arc::new(TokenOverlap),
            config: Arc::new(config),
        }
    }

    /// Swap in a different content-fidelity estimator.
    #[must_use]
    pub fn with_truth_estimator(mut self, estimator: Arc<dyn TruthEstimator>) -> Self {
        self.truth = estimator;
        self
    }

    // -----------------------------------------------------------------------
    // World setup
    // -----------------------------------------------------------------------

    /// Register an entity's personality and faction.
    pub fn register_entity(&self, entity: EntityId, profile: EntityProfile) {
        self.inner.write().profiles.insert(entity, profile);
    }

    /// Look up a registered entity's profile.
    pub fn entity_profile(&self, entity: EntityId) -> Result<EntityProfile> {
        self.inner
            .read()
            .profiles
            .get(&entity)
            .copied()
            .ok_or(HearsayError::EntityNotFound(entity))
    }

    /// Declare the relation between two factions (symmetric).
    pub fn set_relation(&self, a: FactionId, b: FactionId, relation: FactionRelation) {
        self.inner.write().factions.set_relation(a, b, relation);
    }

    /// Set the evidence climate around a rumor.
    pub fn set_evidence(&self, rumor: RumorId, climate: EvidenceClimate) -> Result<()> {
        let mut state = self.inner.write();
        if !state.rumors.contains_key(&rumor) {
            return Err(HearsayError::RumorNotFound(rumor));
        }
        state.climates.insert(rumor, climate);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Event intake and processing
    // -----------------------------------------------------------------------

    /// Submit a world event for asynchronous processing.
    ///
    /// Invalid events are logged and skipped; a full queue behaves per the
    /// configured overflow policy. Returns whether the event was accepted.
    pub fn submit_event(&self, event: WorldEvent) -> bool {
        if let Err(reason) = event.validate() {
            warn!(event_type = %event.event_type, reason, "skipping invalid event");
            self.counters.events_invalid.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        if self.queue.push(event) {
            self.counters
                .events_enqueued
                .fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Drain and process up to one batch of queued events.
    ///
    /// Returns how many events were processed.
    pub async fn process_batch(&self, now: GameTimestamp) -> usize {
        let batch = self.queue.drain(self.config.engine.max_batch_size);
        let count = batch.len();
        for event in batch {
            self.process_event(event, now).await;
        }
        count
    }

    async fn process_event(&self, event: WorldEvent, now: GameTimestamp) {
        if self.inner.read().by_event.contains_key(&event.id) {
            debug!(event_type = %event.event_type, "duplicate event, folding into existing rumor");
            self.counters
                .events_deduplicated
                .fetch_add(1, Ordering::Relaxed);
            return;
        }

        let text = self.narrate_event(&event, now).await;

        let mut state = self.inner.write();
        // A racing worker may have committed the same event while we were
        // narrating; the second writer backs off.
        if state.by_event.contains_key(&event.id) {
            self.counters
                .events_deduplicated
                .fetch_add(1, Ordering::Relaxed);
            return;
        }

        let originator = event.source.or_else(|| event.actors.first().copied());
        let Some(originator) = originator else {
            return;
        };
        // Without an explicit truth value, estimate one from how closely the
        // narration tracks the event's ground-truth context.
        let truth = event.truth.or_else(|| {
            event
                .context
                .as_ref()
                .map(|context| self.truth.similarity(context, &text))
        });
        let rumor = Rumor::new(
            text,
            truth,
            RumorOrigin {
                entity: originator,
                event: event.id,
                timestamp: event.timestamp,
            },
            event.importance,
        );
        let rumor_id = rumor.id;
        state.rumors.insert(rumor_id, rumor);
        state.by_event.insert(event.id, rumor_id);
        // Everyone present remembers what they saw at full strength.
        let mut witnesses = event.actors.clone();
        for extra in [event.source, event.target].into_iter().flatten() {
            if !witnesses.contains(&extra) {
                witnesses.push(extra);
            }
        }
        for witness in witnesses {
            state
                .ledger
                .learn(witness, rumor_id, RumorMemory::new(now, 1.0));
        }
        drop(state);

        self.counters.rumors_created.fetch_add(1, Ordering::Relaxed);
        info!(%rumor_id, event_type = %event.event_type, "rumor created");
    }

    async fn narrate_event(&self, event: &WorldEvent, now: GameTimestamp) -> String {
        let elapsed = now.seconds_since(&event.timestamp);
        let params = NarrationParams {
            distortion_level: self.config.generation.default_distortion_level,
            theme: self.config.generation.default_theme.clone(),
            npc_personality: self.config.generation.default_npc_personality.clone(),
            retelling_count: self.config.generation.default_retelling_count,
            // Same-tick events have no meaningful age yet.
            time_since_event_secs: if elapsed == 0 {
                self.config.generation.default_time_since_event_secs
            } else {
                elapsed
            },
        };
        let key = CacheKey::new(
            event.event_type.clone(),
            if event.actor_names.is_empty() {
                event.actors.iter().map(ToString::to_string).collect()
            } else {
                event.actor_names.clone()
            },
            event.location.clone(),
            event.context.clone(),
            params.distortion_level,
        );

        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        self.throttle.acquire().await;
        let request = NarrationRequest::new(event.summary(), params)
            .with_timeout(self.config.generation.request_timeout_ms);
        match self.narrator.narrate(&request).await {
            Ok(response) => {
                self.cache.insert(key, response.text.clone());
                response.text
            }
            Err(err) => {
                warn!(error = %err, "narration failed, falling back to event summary");
                self.counters
                    .narration_fallbacks
                    .fetch_add(1, Ordering::Relaxed);
                event.summary()
            }
        }
    }

    /// Seed a rumor directly, bypassing the event pipeline.
    pub fn seed_rumor(
        &self,
        content: impl Into<String>,
        truth_value: Option<f32>,
        importance: f32,
        origin: EntityId,
        now: GameTimestamp,
    ) -> RumorId {
        let rumor = Rumor::new(
            content,
            truth_value,
            RumorOrigin::from_entity(origin, now),
            importance,
        );
        let rumor_id = rumor.id;
        let mut state = self.inner.write();
        state.rumors.insert(rumor_id, rumor);
        state.ledger.learn(origin, rumor_id, RumorMemory::new(now, 1.0));
        drop(state);
        self.counters.rumors_created.fetch_add(1, Ordering::Relaxed);
        rumor_id
    }

    // -----------------------------------------------------------------------
    // Propagation
    // -----------------------------------------------------------------------

    /// `teller` retells a rumor to `listener`.
    ///
    /// The teller must currently know the rumor. Exactly one transformation
    /// is appended; the teller's memory is reinforced; the listener learns
    /// the rumor (or is reinforced, or relearns it if that is allowed).
    /// Returns the text the listener heard.
    pub fn retell(
        &self,
        teller: EntityId,
        listener: EntityId,
        rumor_id: RumorId,
        now: GameTimestamp,
    ) -> Result<String> {
        let state = &mut *self.inner.write();
        let rumor = state
            .rumors
            .get_mut(&rumor_id)
            .ok_or(HearsayError::RumorNotFound(rumor_id))?;
        let teller_memory = state
            .ledger
            .get_mut(teller, rumor_id)
            .filter(|m| m.knows())
            .ok_or(HearsayError::UnknownToTeller {
                entity: teller,
                rumor: rumor_id,
            })?;

        // Distortion is a property of the circulating story, not of any one
        // teller: each retelling starts from the chain's latest level, so a
        // newcomer passing on near-canonical text still inherits the drift
        // the story has accumulated. This keeps distortion non-decreasing
        // along the whole retelling chain.
        let base_distortion = rumor.history.last().map_or(0.0, |t| t.distortion_level);
        self.mutation
            .mutate(rumor, teller_memory, teller, base_distortion, now, &mut state.rng);
        self.decay.reinforce(teller_memory, now);

        let mutated = rumor
            .history
            .last()
            .is_some_and(|t| t.kind != TransformationKind::Retell);
        let heard = rumor.content_for(teller).to_string();

        // How much the listener buys it decides their initial memory strength.
        let listener_profile = state.profiles.get(&listener).copied().unwrap_or_default();
        let origin_profile = state.profiles.get(&rumor.origin.entity).copied();
        let score = self.believability.score(
            &listener_profile,
            rumor,
            state.ledger.get(listener, rumor_id),
            origin_profile.as_ref(),
            &state.factions,
        );

        match state.ledger.get_mut(listener, rumor_id) {
            Some(memory) if memory.knows() => {
                self.decay.reinforce(memory, now);
            }
            Some(memory) => {
                if self.decay.allows_relearning() {
                    self.decay.relearn(memory, now, score);
                } else {
                    debug!(%listener, %rumor_id, "listener has forgotten this rumor and relearning is off");
                }
            }
            None => {
                state
                    .ledger
                    .learn(listener, rumor_id, RumorMemory::new(now, score));
            }
        }

        self.counters.retellings.fetch_add(1, Ordering::Relaxed);
        if mutated {
            self.counters
                .mutations_applied
                .fetch_add(1, Ordering::Relaxed);
        }
        Ok(heard)
    }

    /// An entity restates the canonical account.
    ///
    /// Returns the canonical text. The clarifier must know the rumor.
    pub fn clarify(&self, entity: EntityId, rumor_id: RumorId, now: GameTimestamp) -> Result<String> {
        let state = &mut *self.inner.write();
        let rumor = state
            .rumors
            .get_mut(&rumor_id)
            .ok_or(HearsayError::RumorNotFound(rumor_id))?;
        let memory = state
            .ledger
            .get_mut(entity, rumor_id)
            .filter(|m| m.knows())
            .ok_or(HearsayError::UnknownToTeller {
                entity,
                rumor: rumor_id,
            })?;
        self.mutation.clarify(rumor, memory, entity, now);
        Ok(rumor.core_content.clone())
    }

    /// Publicly contradict a rumor, weakening every living memory of it.
    ///
    /// Returns how many memories were affected.
    pub fn contradict(&self, rumor_id: RumorId) -> Result<usize> {
        let state = &mut *self.inner.write();
        if !state.rumors.contains_key(&rumor_id) {
            return Err(HearsayError::RumorNotFound(rumor_id));
        }
        let mut affected = 0;
        let mut newly_forgotten = 0;
        for ((_, rumor), memory) in state.ledger.iter_mut() {
            if *rumor != rumor_id || memory.is_forgotten {
                continue;
            }
            if self.decay.contradict(memory, &mut state.rng) {
                newly_forgotten += 1;
            }
            affected += 1;
        }
        self.counters
            .contradictions
            .fetch_add(1, Ordering::Relaxed);
        self.counters
            .memories_forgotten
            .fetch_add(newly_forgotten, Ordering::Relaxed);
        Ok(affected)
    }

    /// Run one decay tick over every memory. Returns newly forgotten count.
    pub fn decay_pass(&self) -> usize {
        let state = &mut *self.inner.write();
        let rumors = &state.rumors;
        let climates = &state.climates;
        let newly_forgotten = run_decay_pass(&mut state.ledger, &self.decay, |id| {
            rumors
                .get(&id)
                .map(|r| (r.importance, climates.get(&id).copied().unwrap_or_default()))
        });
        self.counters.decay_passes.fetch_add(1, Ordering::Relaxed);
        self.counters
            .memories_forgotten
            .fetch_add(newly_forgotten as u64, Ordering::Relaxed);
        newly_forgotten
    }

    /// Advance the simulation clock by one tick and return the new time.
    pub fn advance_tick(&self) -> GameTimestamp {
        let mut state = self.inner.write();
        state.tick += 1;
        GameTimestamp::now(state.tick)
    }

    /// Current simulation time.
    #[must_use]
    pub fn current_time(&self) -> GameTimestamp {
        GameTimestamp::now(self.inner.read().tick)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Snapshot a rumor by id.
    #[must_use]
    pub fn rumor(&self, rumor_id: RumorId) -> Option<Rumor> {
        self.inner.read().rumors.get(&rumor_id).cloned()
    }

    /// The rumor created for a given event, if any.
    #[must_use]
    pub fn rumor_for_event(&self, event: EventId) -> Option<RumorId> {
        self.inner.read().by_event.get(&event).copied()
    }

    /// Snapshot an entity's memory of a rumor.
    #[must_use]
    pub fn memory(&self, entity: EntityId, rumor_id: RumorId) -> Option<RumorMemory> {
        self.inner.read().ledger.get(entity, rumor_id).cloned()
    }

    /// How much `entity` believes `rumor_id` right now.
    pub fn believability(&self, entity: EntityId, rumor_id: RumorId) -> Result<f32> {
        let state = self.inner.read();
        let rumor = state
            .rumors
            .get(&rumor_id)
            .ok_or(HearsayError::RumorNotFound(rumor_id))?;
        let profile = state.profiles.get(&entity).copied().unwrap_or_default();
        let origin_profile = state.profiles.get(&rumor.origin.entity).copied();
        Ok(self.believability.score(
            &profile,
            rumor,
            state.ledger.get(entity, rumor_id),
            origin_profile.as_ref(),
            &state.factions,
        ))
    }

    /// Spread statistics for a rumor across the registered population.
    pub fn spread(&self, rumor_id: RumorId) -> Result<SpreadStats> {
        let state = self.inner.read();
        if !state.rumors.contains_key(&rumor_id) {
            return Err(HearsayError::RumorNotFound(rumor_id));
        }
        let population = if state.profiles.is_empty() {
            state
                .ledger
                .iter()
                .map(|((entity, _), _)| *entity)
                .collect::<std::collections::HashSet<_>>()
                .len()
        } else {
            state.profiles.len()
        };
        Ok(SpreadStats::measure(&state.ledger, rumor_id, population))
    }

    /// Lifecycle stage of a rumor.
    pub fn classify(&self, rumor_id: RumorId) -> Result<LegacyState> {
        Ok(self.spread(rumor_id)?.classify())
    }

    /// All rumors an entity currently knows, most believable first.
    #[must_use]
    pub fn rumors_known_by(&self, entity: EntityId) -> Vec<(RumorId, f32)> {
        let state = self.inner.read();
        let profile = state.profiles.get(&entity).copied().unwrap_or_default();
        let mut known: Vec<(RumorId, f32)> = state
            .ledger
            .for_entity(entity)
            .filter(|(_, memory)| memory.knows())
            .filter_map(|(rumor_id, memory)| {
                let rumor = state.rumors.get(&rumor_id)?;
                let origin_profile = state.profiles.get(&rumor.origin.entity).copied();
                let score = self.believability.score(
                    &profile,
                    rumor,
                    Some(memory),
                    origin_profile.as_ref(),
                    &state.factions,
                );
                Some((rumor_id, score))
            })
            .collect();
        known.sort_by_key(|(_, score)| std::cmp::Reverse(OrderedFloat(*score)));
        known
    }

    /// How faithful the latest variant is to the canonical text, in [0, 1].
    pub fn content_fidelity(&self, rumor_id: RumorId) -> Result<f32> {
        let state = self.inner.read();
        let rumor = state
            .rumors
            .get(&rumor_id)
            .ok_or(HearsayError::RumorNotFound(rumor_id))?;
        let latest = rumor
            .history
            .last()
            .map_or(rumor.core_content.as_str(), |t| t.resulting_content.as_str());
        Ok(self.truth.similarity(&rumor.core_content, latest))
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Engine counters.
    #[must_use]
    pub fn counters(&self) -> crate::metrics::CounterSnapshot {
        self.counters.snapshot()
    }

    /// Intake queue statistics.
    #[must_use]
    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Narration cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &HearsayConfig {
        &self.config
    }
}

/// Build a narrator client from the generation settings.
#[must_use]
pub fn narrator_from_config(
    backend: hearsay_gen::NarrationBackend,
    config: &hearsay_core::config::GenerationConfig,
) -> NarratorClient {
    NarratorClient::new(
        backend,
        config.max_retries,
        hearsay_gen::ExponentialBackoff {
            base_backoff_ms: config.retry_backoff_ms,
            max_backoff_ms: config.breaker_reset_ms.max(config.retry_backoff_ms),
        },
        config.breaker_threshold,
        config.breaker_reset_ms,
    )
}
