//! OpenAI Chat Completions API provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use serde::Deserialize;
use tracing::debug;

use crate::config::Secret;
use crate::error::PagesmithError;
use crate::types::{PromptMessage, Usage};

use super::http::{bearer_headers, build_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    model: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        model: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PagesmithError> {
        Ok(Self {
            model: model.into(),
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
            client: build_client(timeout)?,
        })
    }

    fn build_request_body(&self, request: &ProviderRequest) -> serde_json::Value {
        let messages = request
            .messages
            .iter()
            .map(message_to_openai)
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(max) = request.settings.max_tokens {
                obj.insert("max_tokens".into(), max.into());
            }
            if let Some(temp) = request.settings.temperature {
                obj.insert("temperature".into(), temp.into());
            }
        }

        body
    }

    /// Client timeouts become [`PagesmithError::Timeout`]; everything else stays a network error.
    fn transport_error(&self, err: reqwest::Error) -> PagesmithError {
        if err.is_timeout() {
            PagesmithError::Timeout(self.timeout.as_millis() as u64)
        } else {
            PagesmithError::Network(err)
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
        credential: &Secret,
    ) -> Result<ProviderResponse, PagesmithError> {
        let body = self.build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            "OpenAI generate_text"
        );

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(credential.expose()))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(
                status.as_u16(),
                &body_text,
                retry_after.as_deref(),
            ));
        }

        let raw = resp.text().await.map_err(|e| self.transport_error(e))?;
        let data: OpenAiChatResponse = serde_json::from_str(&raw)?;
        let choice = data.choices.into_iter().next().ok_or_else(|| {
            PagesmithError::MalformedResponse("No choices in OpenAI response".into())
        })?;
        let text = choice.message.content.ok_or_else(|| {
            PagesmithError::MalformedResponse("OpenAI response has no message content".into())
        })?;

        Ok(ProviderResponse {
            text,
            usage: data
                .usage
                .map(|u| Usage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                })
                .unwrap_or_default(),
        })
    }
}

fn message_to_openai(msg: &PromptMessage) -> serde_json::Value {
    serde_json::json!({ "role": msg.role.to_string(), "content": msg.content })
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
