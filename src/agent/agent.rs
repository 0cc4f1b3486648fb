//! Generation orchestrator: one conversation, one in-flight generation at a time.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, Secret};
use crate::error::{ErrorKind, PagesmithError};
use crate::extract::{extract, ExtractionError};
use crate::provider::{self, ModelProvider};
use crate::types::{GenerationResult, GenerationSettings, Turn};

use super::conversation::{Conversation, ConversationStatus, ExportedDocument, HistorySnapshot};
use super::prompt;

/// Explanation used when the model sent a document without any prose.
pub const DEFAULT_EXPLANATION: &str = "Your website is ready.";

/// Explanation used when the response carried no recognizable HTML markers.
pub const UNVERIFIED_EXPLANATION: &str =
    "The response did not contain a recognizable HTML document; it is shown as-is.";

/// Maximum number of characters of a raw response echoed into logs and failure text.
pub const PREVIEW_CHARS: usize = 500;

/// Builds websites from chat messages and keeps the conversation that produced them.
///
/// All conversation mutation goes through [`generate`](Self::generate) and
/// [`clear`](Self::clear). A second generation (or a clear) while one is in flight
/// fails fast with [`ErrorKind::Busy`].
pub struct SiteAgent {
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
    history_window: Option<usize>,
    credential: RwLock<Option<Secret>>,
    conversation: RwLock<Conversation>,
    generation_gate: Arc<Mutex<()>>,
}

impl SiteAgent {
    /// Create an agent around an existing provider.
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            settings: GenerationSettings::default(),
            history_window: None,
            credential: RwLock::new(None),
            conversation: RwLock::new(Conversation::new()),
            generation_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Create an agent with the configured provider, credential and settings.
    pub fn from_config(config: &AppConfig) -> Result<Self, PagesmithError> {
        let provider = provider::create_provider(config)?;
        Ok(Self::new(provider).with_config(config))
    }

    /// Apply credential, sampling settings and history window from config.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.settings = config.generation_settings();
        self.history_window = config.history_window;
        self.credential = RwLock::new(config.credential.clone());
        self
    }

    pub fn with_credential(self, credential: Secret) -> Self {
        *write_lock(&self.credential) = Some(credential);
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_history_window(mut self, window: Option<usize>) -> Self {
        self.history_window = window;
        self
    }

    pub fn conversation_id(&self) -> Uuid {
        read_lock(&self.conversation).id()
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    /// Generate or edit the website from a user message.
    ///
    /// A supplied `credential_override` is remembered for later requests once the
    /// generation is admitted. The user turn is appended before the model call and
    /// kept even if the call fails.
    pub async fn generate(
        &self,
        message: &str,
        credential_override: Option<Secret>,
    ) -> GenerationResult {
        if message.trim().is_empty() {
            return ErrorKind::EmptyMessage.into();
        }

        let Some(credential) = credential_override
            .clone()
            .or_else(|| read_lock(&self.credential).clone())
        else {
            return ErrorKind::MissingCredential.into();
        };

        let Ok(_gate) = self.generation_gate.clone().try_lock_owned() else {
            debug!("generation rejected: another generation is in flight");
            return ErrorKind::Busy.into();
        };

        if let Some(secret) = credential_override {
            *write_lock(&self.credential) = Some(secret);
        }

        let (request, conversation_id) = {
            let mut conversation = write_lock(&self.conversation);
            conversation.push(Turn::user(message));
            let request =
                prompt::build_request(&conversation, &self.settings, self.history_window);
            (request, conversation.id())
        };

        info!(
            conversation = %conversation_id,
            provider = self.provider.provider_name(),
            model = self.provider.model_id(),
            messages = request.messages.len(),
            "generating website"
        );

        let response = match self.provider.generate_text(&request, &credential).await {
            Ok(response) => response,
            Err(err) => {
                let reason = err.failure_reason();
                warn!(conversation = %conversation_id, %reason, error = %err, "generation call failed");
                let kind = ErrorKind::GenerationFailed { reason };
                return GenerationResult::failure(kind, format!("{kind} {err}"));
            }
        };

        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "generation call succeeded"
        );

        self.commit(&response.text)
    }

    /// Extract the document from a raw response and, on success, update the conversation.
    fn commit(&self, raw: &str) -> GenerationResult {
        let extraction = match extract(raw) {
            Ok(extraction) => extraction,
            Err(ExtractionError::Empty) => {
                warn!("model returned an empty response");
                return GenerationResult::failure(
                    ErrorKind::ExtractionFailed,
                    "The model returned an empty response.",
                );
            }
            Err(ExtractionError::Truncated) => {
                let response = preview(raw.trim(), PREVIEW_CHARS);
                warn!(%response, "response ended inside an unfinished HTML document");
                return GenerationResult::failure(ErrorKind::ExtractionFailed, response);
            }
        };

        let verified = extraction.is_verified();
        let explanation = match (extraction.explanation.is_empty(), verified) {
            (false, _) => extraction.explanation,
            (true, true) => DEFAULT_EXPLANATION.to_string(),
            (true, false) => UNVERIFIED_EXPLANATION.to_string(),
        };
        if !verified {
            warn!(
                response = %preview(raw.trim(), PREVIEW_CHARS),
                "response held no complete HTML document; using it unverified"
            );
        }

        {
            let mut conversation = write_lock(&self.conversation);
            conversation.set_document(extraction.document.clone());
            conversation.push(Turn::assistant(explanation.clone()));
        }

        GenerationResult::success(extraction.document, explanation, verified)
    }

    /// Snapshot of the conversation log.
    pub fn history(&self) -> HistorySnapshot {
        read_lock(&self.conversation).snapshot()
    }

    pub fn status(&self) -> ConversationStatus {
        let has_credential = read_lock(&self.credential).is_some();
        let conversation = read_lock(&self.conversation);
        ConversationStatus {
            has_credential,
            has_document: conversation.has_document(),
            turn_count: conversation.len(),
        }
    }

    /// Reset the conversation. Irreversible, so it must be confirmed.
    pub fn clear(&self, confirm: bool) -> Result<(), ErrorKind> {
        if !confirm {
            return Err(ErrorKind::ConfirmationRequired);
        }
        let Ok(_gate) = self.generation_gate.try_lock() else {
            return Err(ErrorKind::Busy);
        };
        let mut conversation = write_lock(&self.conversation);
        conversation.clear();
        info!(conversation = %conversation.id(), "conversation cleared");
        Ok(())
    }

    /// The current document packaged for download.
    pub fn export_document(&self) -> Result<ExportedDocument, ErrorKind> {
        read_lock(&self.conversation)
            .current_document()
            .map(ExportedDocument::new)
            .ok_or(ErrorKind::NoDocumentAvailable)
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Truncate to at most `max_chars` characters, marking the cut.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
