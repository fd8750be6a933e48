//! Tests for configuration.

use std::sync::{Mutex, OnceLock};

use drover::config::{DroverConfig, ENV_API_KEY, ENV_API_VERSION, ENV_ENDPOINT};
use drover::error::DroverError;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 3] = [ENV_ENDPOINT, ENV_API_KEY, ENV_API_VERSION];

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

#[test]
fn builder_setters_win() {
    let config = DroverConfig::new()
        .with_endpoint("https://example.test/api")
        .with_api_key("key-123")
        .with_api_version("2024-07-01");

    assert_eq!(config.endpoint().unwrap(), "https://example.test/api");
    assert_eq!(config.api_key().unwrap(), "key-123");
    assert_eq!(config.api_version(), Some("2024-07-01"));
}

#[test]
fn missing_endpoint_names_the_env_var() {
    let config = DroverConfig::new().with_api_key("key-123");

    let err = config.endpoint().expect_err("expected configuration error");
    match err {
        DroverError::Configuration(message) => {
            assert!(message.contains(ENV_ENDPOINT), "got: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_api_key_names_the_env_var() {
    let config = DroverConfig::new().with_endpoint("https://example.test");

    let err = config.api_key().expect_err("expected configuration error");
    match err {
        DroverError::Configuration(message) => {
            assert!(message.contains(ENV_API_KEY), "got: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn from_env_reads_drover_vars() {
    let _env_lock = env_lock_guard();
    let _env_guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }

    std::env::set_var(ENV_ENDPOINT, "https://env.example.test");
    std::env::set_var(ENV_API_KEY, "env-key");

    let config = DroverConfig::from_env();
    assert_eq!(config.endpoint().unwrap(), "https://env.example.test");
    assert_eq!(config.api_key().unwrap(), "env-key");
    assert_eq!(config.api_version(), None);
}

#[test]
fn debug_redacts_api_key() {
    let config = DroverConfig::new().with_api_key("super-secret");
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("super-secret"), "got: {rendered}");
}
