//! Request and response types for narration generation.

use serde::{Deserialize, Serialize};

/// Tuning knobs that shape how a rumor is narrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationParams {
    /// How garbled the telling should be (0.0 = faithful, 1.0 = barely recognisable).
    pub distortion_level: f32,
    /// Narrative register, e.g. "tavern_gossip" or "market_whisper".
    pub theme: String,
    /// Speaking style of the teller, e.g. "chatty" or "terse".
    pub npc_personality: String,
    /// How many hands the rumor has passed through.
    pub retelling_count: u32,
    /// Seconds elapsed since the underlying event.
    pub time_since_event_secs: u64,
}

impl Default for NarrationParams {
    fn default() -> Self {
        Self {
            distortion_level: 0.1,
            theme: "tavern_gossip".to_string(),
            npc_personality: "chatty".to_string(),
            retelling_count: 0,
            time_since_event_secs: 60,
        }
    }
}

/// A request to turn an event summary into in-world gossip text.
#[derive(Debug, Clone, Serialize)]
pub struct NarrationRequest {
    /// Plain factual summary of the event ("guard_change at the north gate").
    pub event_summary: String,
    /// Narration tuning.
    pub params: NarrationParams,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl NarrationRequest {
    /// Build a request with the default 5s timeout.
    #[must_use]
    pub fn new(event_summary: impl Into<String>, params: NarrationParams) -> Self {
        Self {
            event_summary: event_summary.into(),
            params,
            timeout_ms: 5000,
        }
    }

    /// Override the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// A generated narration.
#[derive(Debug, Clone, Deserialize)]
pub struct NarrationResponse {
    /// The gossip text.
    pub text: String,
    /// Wall-clock latency of the generation in milliseconds.
    pub latency_ms: u64,
    /// Which backend/model produced it ("template" for the local fallback).
    pub model: String,
}
