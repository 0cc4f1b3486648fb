//! Model provider trait and implementations.

pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, Secret};
use crate::error::PagesmithError;
use crate::types::{GenerationSettings, PromptMessage, Usage};

/// A request sent to a model provider: system instruction plus ordered messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub messages: Vec<PromptMessage>,
    pub settings: GenerationSettings,
}

impl ProviderRequest {
    /// Concatenated message contents, mostly useful for assertions and logging.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("[{}] {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Response from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
}

/// The external generation call: prompt in, text out, or a typed failure.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate a complete (non-streaming) response.
    async fn generate_text(
        &self,
        request: &ProviderRequest,
        credential: &Secret,
    ) -> Result<ProviderResponse, PagesmithError>;
}

/// Create the provider described by the configuration.
#[allow(unused_variables)]
pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn ModelProvider>, PagesmithError> {
    #[cfg(feature = "openai")]
    {
        let provider = openai::OpenAiProvider::new(
            config.model.clone(),
            config.base_url.clone(),
            config.request_timeout,
        )?;
        Ok(Arc::new(provider))
    }

    #[cfg(not(feature = "openai"))]
    {
        Err(PagesmithError::Configuration(
            "No provider enabled via feature flags".into(),
        ))
    }
}
