//! Convenience re-exports for common use.

pub use crate::agent::{ConversationStatus, ExportedDocument, HistorySnapshot, SiteAgent};
pub use crate::config::{AppConfig, Secret};
pub use crate::error::{ErrorKind, FailureReason, PagesmithError, Result};
pub use crate::extract::{extract, Confidence, Extraction};
pub use crate::provider::ModelProvider;
pub use crate::types::{GenerationResult, GenerationSettings, PromptMessage, Role, Turn, TurnRole};
