//! Configuration (layered: code > env).

use std::fmt;

use crate::error::{DroverError, Result};

/// Environment variable holding the service endpoint URL.
pub const ENV_ENDPOINT: &str = "DROVER_ENDPOINT";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "DROVER_API_KEY";
/// Environment variable holding an optional API version override.
pub const ENV_API_VERSION: &str = "DROVER_API_VERSION";

/// Connection settings for the agent-run service.
///
/// Values set in code win over values read from the environment.
#[derive(Clone, Default)]
pub struct DroverConfig {
    endpoint: Option<String>,
    api_key: Option<String>,
    api_version: Option<String>,
}

impl fmt::Debug for DroverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DroverConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl DroverConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables (loads `.env` first if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            endpoint: std::env::var(ENV_ENDPOINT).ok(),
            api_key: std::env::var(ENV_API_KEY).ok(),
            api_version: std::env::var(ENV_API_VERSION).ok(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// The endpoint, or a configuration error naming the missing variable.
    pub fn endpoint(&self) -> Result<&str> {
        self.endpoint.as_deref().ok_or_else(|| {
            DroverError::Configuration(format!("no endpoint set (set {ENV_ENDPOINT})"))
        })
    }

    /// The API key, or a configuration error naming the missing variable.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            DroverError::Configuration(format!("no API key set (set {ENV_API_KEY})"))
        })
    }

    /// Optional API version appended to request URLs.
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }
}
