//! Conversation log and the current-document slot.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::types::Turn;

/// Filename suggested when exporting the current document.
pub const EXPORT_FILENAME: &str = "generated-website.html";

/// Ordered, append-only log of turns plus the most recently generated document.
///
/// The document is never stored as a turn; assistant turns carry only the explanation.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: Uuid,
    turns: Vec<Turn>,
    current_document: Option<String>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            turns: Vec::new(),
            current_document: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Append a turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Get the last N turns.
    pub fn last_n(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn current_document(&self) -> Option<&str> {
        self.current_document.as_deref()
    }

    /// Replace the current document with a freshly generated one.
    pub fn set_document(&mut self, document: impl Into<String>) {
        self.current_document = Some(document.into());
    }

    pub fn has_document(&self) -> bool {
        self.current_document.is_some()
    }

    /// Drop all turns and the current document.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.current_document = None;
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            turns: self.turns.clone(),
            has_document: self.has_document(),
        }
    }
}

/// Read-only copy of the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistorySnapshot {
    pub turns: Vec<Turn>,
    pub has_document: bool,
}

/// Derived status view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationStatus {
    pub has_credential: bool,
    pub has_document: bool,
    pub turn_count: usize,
}

/// The current document packaged for download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportedDocument {
    pub content: String,
    pub filename: String,
}

impl ExportedDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filename: EXPORT_FILENAME.to_string(),
        }
    }

    /// Write the document to `path`, creating parent directories as needed.
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &self.content).await?;
        Ok(())
    }
}
