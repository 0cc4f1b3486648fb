//! Generation settings and per-request results.

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Sampling settings controlling text generation.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// Outcome of a single `generate` call. Not persisted beyond the response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    /// The extracted document, present only on success.
    pub document: Option<String>,
    /// Human-readable text; rendered verbatim by the UI, also on error.
    pub explanation: String,
    pub error: Option<ErrorKind>,
    /// False when the document is the raw response without recognizable HTML markers.
    #[serde(default)]
    pub verified: bool,
}

impl GenerationResult {
    pub fn success(document: String, explanation: String, verified: bool) -> Self {
        Self {
            document: Some(document),
            explanation,
            error: None,
            verified,
        }
    }

    pub fn failure(error: ErrorKind, explanation: impl Into<String>) -> Self {
        Self {
            document: None,
            explanation: explanation.into(),
            error: Some(error),
            verified: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl From<ErrorKind> for GenerationResult {
    fn from(error: ErrorKind) -> Self {
        Self::failure(error, error.to_string())
    }
}
