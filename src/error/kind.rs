//! Caller-facing error kinds carried inside results.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Why a generation call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureReason {
    /// Credential rejected by the provider.
    Authentication,
    RateLimit,
    /// Connection or request-level failure before a response arrived.
    Transport,
    Timeout,
    /// The provider answered with a non-success status.
    Upstream,
    /// The provider answered, but not with the expected shape.
    MalformedResponse,
    Internal,
}

/// Error surfaced to the caller as part of a structured result.
///
/// The `Display` text is meant to be rendered verbatim by a UI.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("API key not set. Provide an API key with the request or set OPENAI_API_KEY.")]
    MissingCredential,

    #[error("Message must not be empty.")]
    EmptyMessage,

    #[error("Generation failed ({reason}).")]
    GenerationFailed { reason: FailureReason },

    #[error("Could not extract an HTML document from the model response.")]
    ExtractionFailed,

    #[error("No document has been generated yet.")]
    NoDocumentAvailable,

    #[error("Set confirm=true to clear the conversation.")]
    ConfirmationRequired,

    #[error("A generation is already in progress for this conversation.")]
    Busy,
}

impl ErrorKind {
    /// HTTP status used when this error crosses the server boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredential
            | Self::EmptyMessage
            | Self::NoDocumentAvailable
            | Self::ConfirmationRequired => 400,
            Self::Busy => 409,
            Self::GenerationFailed { .. } | Self::ExtractionFailed => 502,
        }
    }
}
