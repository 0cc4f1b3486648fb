//! Shared test helpers and mock provider.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use pagesmith::config::Secret;
use pagesmith::error::PagesmithError;
use pagesmith::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use pagesmith::types::Usage;

pub const LANDING_PAGE: &str =
    "<!DOCTYPE html><html><head><title>Landing</title></head><body><h1>Hi</h1></body></html>";

/// A model reply wrapping `document` in a fenced block with prose around it.
pub fn fenced_reply(prose: &str, document: &str) -> String {
    format!("{prose}\n```html\n{document}\n```\nLet me know if you want changes.")
}

pub fn test_key() -> Secret {
    Secret::new("sk-test").expect("non-blank key")
}

/// A mock provider that returns queued responses and records every request.
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<String, PagesmithError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    credentials: Mutex<Vec<String>>,
    release: Option<Arc<Notify>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            credentials: Mutex::new(Vec::new()),
            release: None,
        }
    }

    /// Hold every call until `release` is notified.
    pub fn gated(mut self, release: Arc<Notify>) -> Self {
        self.release = Some(release);
        self
    }

    /// Queue a text response.
    pub fn queue_text(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a failure.
    pub fn queue_error(&self, error: PagesmithError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Wait until at least `n` calls have reached the provider.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.call_count() < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
        credential: &Secret,
    ) -> Result<ProviderResponse, PagesmithError> {
        self.requests.lock().unwrap().push(request.clone());
        self.credentials
            .lock()
            .unwrap()
            .push(credential.expose().to_string());

        if let Some(release) = &self.release {
            release.notified().await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("Mock response".to_string()))
            .map(|text| ProviderResponse {
                text,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 20,
                    total_tokens: 30,
                },
            })
    }
}
