//! Error types for Pagesmith.

pub mod kind;

pub use kind::{ErrorKind, FailureReason};

use thiserror::Error;

/// Primary error type for provider and configuration operations.
#[derive(Error, Debug)]
pub enum PagesmithError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited{}", retry_hint(.retry_after_ms))]
    RateLimited { retry_after_ms: Option<u64> },

    /// The request did not complete within the client timeout, in milliseconds.
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl PagesmithError {
    /// Create an API error from a status code and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify a failed generation call into the reason reported to callers.
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            Self::Authentication(_) => FailureReason::Authentication,
            Self::RateLimited { .. } => FailureReason::RateLimit,
            Self::Timeout(_) => FailureReason::Timeout,
            Self::Network(e) if e.is_timeout() => FailureReason::Timeout,
            Self::Network(e) if e.is_decode() => FailureReason::MalformedResponse,
            Self::Network(_) => FailureReason::Transport,
            Self::Serialization(_) | Self::MalformedResponse(_) => {
                FailureReason::MalformedResponse
            }
            Self::Api { status, .. } => match status {
                401 | 403 => FailureReason::Authentication,
                429 => FailureReason::RateLimit,
                408 | 504 => FailureReason::Timeout,
                _ => FailureReason::Upstream,
            },
            Self::Configuration(_) | Self::Io(_) => FailureReason::Internal,
        }
    }
}

fn retry_hint(retry_after_ms: &Option<u64>) -> String {
    match retry_after_ms {
        Some(ms) => format!(": retry after {ms}ms"),
        None => String::new(),
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PagesmithError>;
