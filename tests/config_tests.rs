//! Tests for environment-driven configuration.

use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pagesmith::config::{AppConfig, Secret};
use pagesmith::error::PagesmithError;
use pagesmith::types::GenerationSettings;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 11] = [
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "HOST",
    "PORT",
    "RELOAD",
    "PAGESMITH_MODEL",
    "PAGESMITH_MAX_TOKENS",
    "PAGESMITH_TEMPERATURE",
    "PAGESMITH_TIMEOUT_SECS",
    "PAGESMITH_HISTORY_WINDOW",
    "PAGESMITH_INDEX",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clear_config_env() {
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
}

#[test]
fn from_env_reads_server_and_model_settings() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();
    std::env::set_var("OPENAI_API_KEY", "sk-env-123");
    std::env::set_var("HOST", "0.0.0.0");
    std::env::set_var("PORT", "8080");
    std::env::set_var("RELOAD", "true");
    std::env::set_var("PAGESMITH_MODEL", "gpt-4o-mini");
    std::env::set_var("PAGESMITH_MAX_TOKENS", "2048");
    std::env::set_var("PAGESMITH_TEMPERATURE", "0.2");
    std::env::set_var("PAGESMITH_INDEX", "web/index.html");

    let config = AppConfig::from_env().unwrap();

    assert_eq!(config.credential.as_ref().map(Secret::expose), Some("sk-env-123"));
    assert_eq!(config.bind_address(), "0.0.0.0:8080");
    assert!(config.reload);
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(
        config.generation_settings(),
        GenerationSettings::builder()
            .max_tokens(2048)
            .temperature(0.2)
            .build()
    );
    assert_eq!(config.index_path, std::path::PathBuf::from("web/index.html"));
}

#[test]
fn from_env_falls_back_to_defaults() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();

    let config = AppConfig::from_env().unwrap();
    let defaults = AppConfig::default();

    assert_eq!(config.host, defaults.host);
    assert_eq!(config.port, defaults.port);
    assert_eq!(config.model, defaults.model);
    assert_eq!(config.request_timeout, Duration::from_secs(120));
    assert_eq!(config.history_window, None);
    assert!(config.base_url.is_none());
}

#[test]
fn reload_accepts_only_true() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();

    std::env::set_var("RELOAD", "yes");
    assert!(!AppConfig::from_env().unwrap().reload);

    std::env::set_var("RELOAD", "True");
    assert!(AppConfig::from_env().unwrap().reload);
}

#[test]
fn invalid_numeric_values_are_configuration_errors() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);

    for (key, value) in [
        ("PORT", "not-a-port"),
        ("PAGESMITH_MAX_TOKENS", "-1"),
        ("PAGESMITH_TEMPERATURE", "warm"),
        ("PAGESMITH_HISTORY_WINDOW", "all"),
    ] {
        clear_config_env();
        std::env::set_var(key, value);

        let err = AppConfig::from_env().unwrap_err();
        assert!(
            matches!(&err, PagesmithError::Configuration(msg) if msg.contains(key)),
            "{key}={value} produced {err:?}"
        );
    }
}

