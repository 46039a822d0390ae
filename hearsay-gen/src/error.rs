//! Narration error types.

use thiserror::Error;

/// Whether a failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Timeouts, connection drops, 5xx — retry with backoff.
    Transient,
    /// Malformed requests, parse failures, missing backend — fail fast.
    Permanent,
}

/// Errors that can occur during narration generation.
#[derive(Debug, Error)]
pub enum GenError {
    /// No backend configured or the backend is unreachable.
    #[error("narration backend unavailable: {0}")]
    Unavailable(String),

    /// Request timed out.
    #[error("narration request timed out after {0}ms")]
    Timeout(u64),

    /// HTTP request failed.
    #[error("narration request failed: {0}")]
    RequestFailed(String),

    /// Backend response could not be parsed.
    #[error("failed to parse narration response: {0}")]
    Parse(String),

    /// The request itself is invalid (empty summary, bad parameters).
    #[error("invalid narration request: {0}")]
    InvalidRequest(String),

    /// Circuit breaker is open; the call was not attempted.
    #[error("circuit breaker open, narration call skipped")]
    BreakerOpen,

    /// All retry attempts exhausted.
    #[error("narration retries exhausted after {attempts} tries: {last_error}")]
    RetriesExhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The final error message.
        last_error: String,
    },
}

impl GenError {
    /// Classify the error for retry purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Timeout(_) | Self::RequestFailed(_) | Self::Unavailable(_) => {
                ErrorCategory::Transient
            }
            Self::Parse(_)
            | Self::InvalidRequest(_)
            | Self::BreakerOpen
            | Self::RetriesExhausted { .. } => ErrorCategory::Permanent,
        }
    }
}

impl From<reqwest::Error> for GenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenError::Timeout(0)
        } else if err.is_connect() {
            GenError::Unavailable(err.to_string())
        } else {
            GenError::RequestFailed(err.to_string())
        }
    }
}
