//! Configuration for the hearsay engine.
//!
//! Maps directly to `hearsay.toml` — every recognized option is an explicit
//! field with a serde default, so a partial file (or none at all) yields a
//! fully usable configuration.

use serde::{Deserialize, Serialize};

/// Top-level hearsay configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HearsayConfig {
    /// Processing-loop and queue settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Narration / text-generation call parameters.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Retelling mutation settings.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Memory decay, reinforcement, and contradiction settings.
    #[serde(default)]
    pub decay: DecayConfig,
    /// Believability scoring weights.
    #[serde(default)]
    pub believability: BelievabilityConfig,
}

impl HearsayConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`crate::HearsayError::Config`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::HearsayError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Processing-loop and ingestion-queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tick interval of the processing loop in milliseconds.
    #[serde(default = "default_1000")]
    pub process_interval_ms: u64,
    /// Maximum world events drained per tick.
    #[serde(default = "default_5")]
    pub max_batch_size: usize,
    /// Ingestion queue capacity (bounded FIFO).
    #[serde(default = "default_64")]
    pub queue_capacity: usize,
    /// What happens when a producer enqueues into a full queue.
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
    /// How many loop ticks between decay passes.
    #[serde(default = "default_1_u64")]
    pub decay_interval_ticks: u64,
    /// Emit debug-level logs for every processed event.
    #[serde(default)]
    pub enable_debug_logs: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            process_interval_ms: 1000,
            max_batch_size: 5,
            queue_capacity: 64,
            overflow_policy: OverflowPolicy::default(),
            decay_interval_ticks: 1,
            enable_debug_logs: false,
        }
    }
}

/// Backpressure policy for a full ingestion queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Evict the oldest queued event to make room.
    #[default]
    DropOldest,
    /// Refuse the new event; the producer decides whether to block and retry.
    Reject,
}

/// Parameters passed to the narration backend, plus the global throttle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Distortion level requested for freshly originated rumors.
    #[serde(default = "default_0_1")]
    pub default_distortion_level: f32,
    /// Narrative theme hint for the backend.
    #[serde(default = "default_theme")]
    pub default_theme: String,
    /// Narrator personality hint for the backend.
    #[serde(default = "default_personality")]
    pub default_npc_personality: String,
    /// Retelling count reported for freshly originated rumors.
    #[serde(default)]
    pub default_retelling_count: u32,
    /// Assumed age of the event when the real age is unknown, in seconds.
    #[serde(default = "default_60")]
    pub default_time_since_event_secs: u64,
    /// Minimum interval between external narration calls, in milliseconds.
    #[serde(default = "default_200")]
    pub min_request_interval_ms: u64,
    /// Hard timeout for any narration call in milliseconds.
    #[serde(default = "default_5000")]
    pub request_timeout_ms: u64,
    /// Max retries for transient narration failures.
    #[serde(default = "default_3_u32")]
    pub max_retries: u32,
    /// Base backoff between retries in milliseconds (doubled per attempt).
    #[serde(default = "default_250")]
    pub retry_backoff_ms: u64,
    /// Consecutive failures before the circuit breaker opens.
    #[serde(default = "default_3_usize")]
    pub breaker_threshold: usize,
    /// How long an open breaker stays open, in milliseconds.
    #[serde(default = "default_30000")]
    pub breaker_reset_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_distortion_level: 0.1,
            default_theme: "tavern_gossip".to_string(),
            default_npc_personality: "chatty".to_string(),
            default_retelling_count: 0,
            default_time_since_event_secs: 60,
            min_request_interval_ms: 200,
            request_timeout_ms: 5000,
            max_retries: 3,
            retry_backoff_ms: 250,
            breaker_threshold: 3,
            breaker_reset_ms: 30_000,
        }
    }
}

/// Retelling mutation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability that a retelling mutates the text at all.
    #[serde(default = "default_0_2")]
    pub mutation_probability: f32,
    /// Upper bound of the per-hop distortion perturbation (uniform, ≥ 0).
    #[serde(default = "default_0_15")]
    pub distortion_jitter_max: f32,
    /// Probability of appending a trailing uncertainty marker on mutation.
    #[serde(default = "default_0_3")]
    pub uncertainty_marker_probability: f32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mutation_probability: 0.2,
            distortion_jitter_max: 0.15,
            uncertainty_marker_probability: 0.3,
        }
    }
}

/// Memory decay, reinforcement, and contradiction tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Base strength lost per decay tick, scaled by 1/importance.
    #[serde(default = "default_0_05")]
    pub base_decay_rate: f32,
    /// Strength below which a memory flips to forgotten.
    #[serde(default = "default_0_1")]
    pub forgotten_threshold: f32,
    /// Base strength boost on reinforcement.
    #[serde(default = "default_0_3")]
    pub reinforcement_boost: f32,
    /// Window (simulated seconds) inside which successive reinforcements
    /// halve in effect.
    #[serde(default = "default_300")]
    pub reinforcement_window_secs: u64,
    /// Base strength lost on an explicit contradiction (jittered ×0.7–1.3).
    #[serde(default = "default_0_4")]
    pub contradiction_base: f32,
    /// Whether a forgotten rumor can be relearned from scratch.
    #[serde(default = "default_true")]
    pub allow_relearning: bool,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            base_decay_rate: 0.05,
            forgotten_threshold: 0.1,
            reinforcement_boost: 0.3,
            reinforcement_window_secs: 300,
            contradiction_base: 0.4,
            allow_relearning: true,
        }
    }
}

/// Believability scoring weights — see the calculator for the formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BelievabilityConfig {
    /// Base score when the rumor's truth value is unknown.
    #[serde(default = "default_0_5")]
    pub neutral_truth: f32,
    /// Weight applied to memory strength.
    #[serde(default = "default_0_2")]
    pub reinforcement_weight: f32,
    /// Flat penalty for a forgotten memory.
    #[serde(default = "default_0_2")]
    pub forgotten_penalty: f32,
    /// Weight applied to the believer's gullibility.
    #[serde(default = "default_0_3")]
    pub gullibility_weight: f32,
    /// Weight applied to the believer's curiosity.
    #[serde(default = "default_0_1")]
    pub curiosity_weight: f32,
    /// Weight subtracted for the believer's skepticism.
    #[serde(default = "default_0_3")]
    pub skepticism_weight: f32,
    /// Bonus when the origin's faction is allied with the believer's.
    #[serde(default = "default_0_1")]
    pub allied_bonus: f32,
    /// Penalty when the origin's faction is hostile to the believer's.
    #[serde(default = "default_0_2")]
    pub hostile_penalty: f32,
}

impl Default for BelievabilityConfig {
    fn default() -> Self {
        Self {
            neutral_truth: 0.5,
            reinforcement_weight: 0.2,
            forgotten_penalty: 0.2,
            gullibility_weight: 0.3,
            curiosity_weight: 0.1,
            skepticism_weight: 0.3,
            allied_bonus: 0.1,
            hostile_penalty: 0.2,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_theme() -> String { "tavern_gossip".to_string() }
fn default_personality() -> String { "chatty".to_string() }
fn default_0_05() -> f32 { 0.05 }
fn default_0_1() -> f32 { 0.1 }
fn default_0_15() -> f32 { 0.15 }
fn default_0_2() -> f32 { 0.2 }
fn default_0_3() -> f32 { 0.3 }
fn default_0_4() -> f32 { 0.4 }
fn default_0_5() -> f32 { 0.5 }
fn default_1_u64() -> u64 { 1 }
fn default_3_u32() -> u32 { 3 }
fn default_3_usize() -> usize { 3 }
fn default_5() -> usize { 5 }
fn default_60() -> u64 { 60 }
fn default_64() -> usize { 64 }
fn default_200() -> u64 { 200 }
fn default_250() -> u64 { 250 }
fn default_300() -> u64 { 300 }
fn default_1000() -> u64 { 1000 }
fn default_5000() -> u64 { 5000 }
fn default_30000() -> u64 { 30_000 }
