//! HTTP client construction, auth headers, and status mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::PagesmithError;

/// Build a client whose requests are bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, PagesmithError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| PagesmithError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status to a typed error.
///
/// `retry_after` is the raw `Retry-After` header, if the server sent one.
pub fn status_to_error(status: u16, body: &str, retry_after: Option<&str>) -> PagesmithError {
    let message = error_message(body);
    match status {
        401 | 403 => PagesmithError::Authentication(message),
        429 => PagesmithError::RateLimited {
            retry_after_ms: retry_after
                .and_then(|v| v.trim().parse::<f64>().ok())
                .map(|s| (s * 1000.0) as u64)
                .or_else(|| extract_retry_after(body)),
        },
        _ => PagesmithError::api(status, message),
    }
}

/// Pull `error.message` out of an OpenAI-style error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}
