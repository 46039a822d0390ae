//! The background processing loop.
//!
//! Ticks at a fixed interval: each tick advances the simulation clock,
//! drains one batch of queued events, and periodically runs a decay pass.
//! Shutdown is graceful — the in-flight batch finishes, then the task exits.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::RumorEngine;

/// Handle to a running processing loop.
pub struct ProcessingHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ProcessingHandle {
    /// Signal shutdown and wait for the loop to finish its current batch.
    pub async fn stop(self) {
        // Receiver dropping first would make send fail; either way the loop exits.
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Abort without waiting.
    pub fn abort(self) {
        self.task.abort();
    }
}

/// Spawn the processing loop for an engine.
///
/// Interval and batch size come from the engine's configuration.
#[must_use]
pub fn spawn(engine: RumorEngine) -> ProcessingHandle {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run(engine, shutdown_rx));
    ProcessingHandle {
        shutdown: shutdown_tx,
        task,
    }
}

async fn run(engine: RumorEngine, mut shutdown: watch::Receiver<bool>) {
    let interval_ms = engine.config().engine.process_interval_ms;
    let decay_every = engine.config().engine.decay_interval_ticks.max(1);
    let verbose = engine.config().engine.enable_debug_logs;
    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!(interval_ms, decay_every, "processing loop started");
    let mut ticks: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = engine.advance_tick();
                ticks += 1;
                let processed = engine.process_batch(now).await;
                if processed > 0 || verbose {
                    debug!(processed, tick = now.tick, "processed event batch");
                }
                if ticks % decay_every == 0 {
                    engine.decay_pass();
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!(ticks, "processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearsay_core::HearsayConfig;
    use hearsay_core::types::{EntityId, GameTimestamp};
    use hearsay_gen::NarratorClient;

    use crate::events::WorldEvent;

    #[tokio::test(start_paused = true)]
    async fn loop_processes_queued_events_and_stops_cleanly() {
        let mut config = HearsayConfig::default();
        config.engine.process_interval_ms = 1000;
        config.generation.min_request_interval_ms = 0;
        let engine = RumorEngine::with_seed(config, NarratorClient::template(), 7);

        let witness = EntityId::new();
        let event = WorldEvent::new("harvest_festival", vec![witness], GameTimestamp::now(0));
        let event_id = event.id;
        assert!(engine.submit_event(event));

        let handle = spawn(engine.clone());
        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.stop().await;

        let rumor_id = engine.rumor_for_event(event_id).unwrap();
        assert!(engine.memory(witness, rumor_id).is_some());
        assert_eq!(engine.counters().rumors_created, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn decay_runs_on_the_configured_cadence() {
        let mut config = HearsayConfig::default();
        config.engine.process_interval_ms = 1000;
        config.engine.decay_interval_ticks = 2;
        let engine = RumorEngine::with_seed(config, NarratorClient::template(), 7);

        let handle = spawn(engine.clone());
        tokio::time::sleep(Duration::from_millis(4500)).await;
        handle.stop().await;

        // Five ticks (the first fires immediately) at a decay cadence of two.
        assert_eq!(engine.counters().decay_passes, 2);
    }
}
