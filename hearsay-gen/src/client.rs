//! Narrator client — routes requests to an HTTP backend or the local
//! template renderer, with retry, backoff, and a circuit breaker in front.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{ErrorCategory, GenError};
use crate::prompt;
use crate::retry::{CircuitBreaker, ExponentialBackoff};
use crate::types::{NarrationRequest, NarrationResponse};

/// Which backend produces narration text.
#[derive(Debug, Clone)]
pub enum NarrationBackend {
    /// OpenAI-compatible chat completions API.
    OpenAiCompatible {
        /// API base URL, without the `/v1/...` suffix.
        base_url: String,
        /// Bearer token.
        api_key: String,
        /// Model identifier to request.
        model: String,
    },
    /// Deterministic local templates; never fails, never leaves the process.
    Template,
    /// No backend — every call errors, callers fall back to raw summaries.
    None,
}

/// Client for narration generation.
pub struct NarratorClient {
    backend: NarrationBackend,
    http: Client,
    max_retries: u32,
    backoff: ExponentialBackoff,
    breaker: CircuitBreaker,
}

impl NarratorClient {
    /// Create a client.
    ///
    /// `breaker_threshold` consecutive failed calls open the circuit for
    /// `breaker_reset_ms`.
    #[must_use]
    pub fn new(
        backend: NarrationBackend,
        max_retries: u32,
        backoff: ExponentialBackoff,
        breaker_threshold: usize,
        breaker_reset_ms: u64,
    ) -> Self {
        Self {
            backend,
            http: Client::new(),
            max_retries,
            backoff,
            breaker: CircuitBreaker::new(breaker_threshold, breaker_reset_ms),
        }
    }

    /// Client backed purely by the local template renderer.
    #[must_use]
    pub fn template() -> Self {
        Self::new(
            NarrationBackend::Template,
            0,
            ExponentialBackoff::default(),
            usize::MAX,
            0,
        )
    }

    /// Whether any backend is configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.backend, NarrationBackend::None)
    }

    /// Generate narration for a request.
    ///
    /// Transient failures are retried with jittered backoff; permanent ones
    /// return immediately. An open circuit breaker short-circuits the call.
    pub async fn narrate(&self, request: &NarrationRequest) -> Result<NarrationResponse, GenError> {
        if request.event_summary.trim().is_empty() {
            return Err(GenError::InvalidRequest("empty event summary".into()));
        }
        if self.breaker.is_open() {
            debug!("narration call rejected, circuit breaker open");
            return Err(GenError::BreakerOpen);
        }

        match &self.backend {
            NarrationBackend::None => Err(GenError::Unavailable(
                "no narration backend configured".into(),
            )),
            NarrationBackend::Template => {
                let start = Instant::now();
                let text = prompt::render_template(request);
                Ok(NarrationResponse {
                    text,
                    latency_ms: start.elapsed().as_millis() as u64,
                    model: "template".to_string(),
                })
            }
            NarrationBackend::OpenAiCompatible {
                base_url,
                api_key,
                model,
            } => {
                let result = self
                    .narrate_openai(base_url, api_key, model, request)
                    .await;
                match &result {
                    Ok(_) => self.breaker.record_success(),
                    Err(_) => self.breaker.record_failure(),
                }
                result
            }
        }
    }

    async fn narrate_openai(
        &self,
        base_url: &str,
        api_key: &str,
        model: &str,
        request: &NarrationRequest,
    ) -> Result<NarrationResponse, GenError> {
        let url = format!("{base_url}/v1/chat/completions");
        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": prompt::render_system(request) },
                { "role": "user", "content": prompt::render_user(request) },
            ],
            "max_tokens": 120,
            "temperature": 0.8,
        });

        let mut last_error = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = {
                    let mut rng = rand::thread_rng();
                    self.backoff.delay(attempt - 1, &mut rng)
                };
                debug!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "retrying narration call"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self
                .http
                .post(&url)
                .header("Authorization", format!("Bearer {api_key}"))
                .json(&body)
                .timeout(Duration::from_millis(request.timeout_ms))
                .send()
                .await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let json: serde_json::Value = resp
                            .json()
                            .await
                            .map_err(|e| GenError::Parse(e.to_string()))?;
                        let text = json["choices"][0]["message"]["content"]
                            .as_str()
                            .unwrap_or("")
                            .trim()
                            .to_string();
                        if text.is_empty() {
                            return Err(GenError::Parse("backend returned empty text".into()));
                        }
                        return Ok(NarrationResponse {
                            text,
                            latency_ms,
                            model: model.to_string(),
                        });
                    }
                    let status = resp.status();
                    last_error = format!("HTTP {status}");
                    warn!(%status, "narration backend returned error");
                    // 4xx is our fault; retrying won't help.
                    if status.is_client_error() {
                        return Err(GenError::RequestFailed(last_error));
                    }
                }
                Err(e) => {
                    let err = GenError::from(e);
                    if err.category() == ErrorCategory::Permanent {
                        return Err(err);
                    }
                    last_error = err.to_string();
                    warn!(error = %last_error, "narration request failed");
                }
            }
        }

        Err(GenError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error,
        })
    }
}
