//! # hearsay-gen — narration backends for hearsay
//!
//! Turns factual event summaries into in-world gossip text. Two backends:
//!
//! - **OpenAI-compatible HTTP** — any chat-completions endpoint
//! - **Template** — deterministic local rendering, no network, never fails
//!
//! Every call goes through the same front: a global [`Throttle`] spacing
//! requests, a write-once [`TransformationCache`] so identical events are
//! narrated once, retry with jittered backoff for transient failures, and a
//! circuit breaker that sheds load when the backend is down.

pub mod cache;
pub mod client;
pub mod error;
pub mod prompt;
pub mod retry;
pub mod types;

pub use cache::{CacheKey, CacheStats, Throttle, TransformationCache};
pub use client::{NarrationBackend, NarratorClient};
pub use error::{ErrorCategory, GenError};
pub use retry::{CircuitBreaker, ExponentialBackoff};
pub use types::{NarrationParams, NarrationRequest, NarrationResponse};
