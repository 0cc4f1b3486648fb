//! Conversation state and the generation orchestrator.

pub mod agent;
pub mod conversation;
pub mod prompt;

pub use agent::SiteAgent;
pub use conversation::{Conversation, ConversationStatus, ExportedDocument, HistorySnapshot};
