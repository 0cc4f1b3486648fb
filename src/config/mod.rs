//! Process configuration (layered: CLI flags > env > `.env` file > defaults).

pub mod secret;

pub use secret::Secret;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PagesmithError, Result};
use crate::types::GenerationSettings;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_INDEX_PATH: &str = "index.html";

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider credential. May be absent and supplied per request instead.
    pub credential: Option<Secret>,
    pub host: String,
    pub port: u16,
    /// Recorded and reported; reloading is left to an external watcher.
    pub reload: bool,
    pub model: String,
    /// Override for the provider base URL (e.g. a proxy or a mock server).
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub request_timeout: Duration,
    /// Number of most recent turns sent with each prompt. `None` sends all.
    pub history_window: Option<usize>,
    /// Frontend page served at `/`.
    pub index_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credential: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            reload: false,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            history_window: None,
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
        }
    }
}

impl AppConfig {
    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let reload = match lookup("RELOAD") {
            Some(value) => value.trim().eq_ignore_ascii_case("true"),
            None => defaults.reload,
        };

        let history_window = match lookup("PAGESMITH_HISTORY_WINDOW") {
            Some(value) if !value.trim().is_empty() => {
                Some(parse_var("PAGESMITH_HISTORY_WINDOW", &value)?)
            }
            _ => None,
        };

        Ok(Self {
            credential: lookup("OPENAI_API_KEY").and_then(Secret::new),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", &lookup, defaults.port)?,
            reload,
            model: lookup("PAGESMITH_MODEL").unwrap_or(defaults.model),
            base_url: lookup("OPENAI_BASE_URL").filter(|url| !url.trim().is_empty()),
            max_tokens: parse_or("PAGESMITH_MAX_TOKENS", &lookup, defaults.max_tokens)?,
            temperature: parse_or("PAGESMITH_TEMPERATURE", &lookup, defaults.temperature)?,
            request_timeout: Duration::from_secs(parse_or(
                "PAGESMITH_TIMEOUT_SECS",
                &lookup,
                DEFAULT_TIMEOUT_SECS,
            )?),
            history_window,
            index_path: lookup("PAGESMITH_INDEX")
                .map(PathBuf::from)
                .unwrap_or(defaults.index_path),
        })
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Sampling settings sent with every generation request.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
    }
}

fn parse_or<T: FromStr>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => parse_var(key, &value),
        _ => Ok(default),
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PagesmithError::Configuration(format!("Invalid value for {key}: '{value}'")))
}
