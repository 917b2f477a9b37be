use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Server-side settings of the AI proxy. Holds the *name* of the variable
/// carrying the API key, never the key itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub api_key_env: String,
    pub allowed_origin: String,
    pub timeout_seconds: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            api_key_env: DEFAULT_API_KEY_VAR.to_string(),
            allowed_origin: "*".to_string(),
            timeout_seconds: 60,
        }
    }
}

impl ProxyConfig {
    /// Settings for the serverless function. Unset or unparsable values
    /// fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: env::var("OPENAI_ENDPOINT").unwrap_or(defaults.endpoint),
            model: env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            temperature: env::var("OPENAI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
            max_tokens: env::var("OPENAI_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            api_key_env: defaults.api_key_env,
            allowed_origin: env::var("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            timeout_seconds: env::var("UPSTREAM_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
        }
    }
}

impl Validate for ProxyConfig {
    fn validate(&self) -> Result<()> {
        validate_url("upstream.endpoint", &self.endpoint)?;
        validate_non_empty_string("upstream.model", &self.model)?;
        validate_range("upstream.temperature", self.temperature, 0.0, 2.0)?;
        validate_range("upstream.max_tokens", self.max_tokens, 1, 32_768)?;
        validate_non_empty_string("upstream.api_key_env", &self.api_key_env)?;
        validate_non_empty_string("upstream.allowed_origin", &self.allowed_origin)?;
        validate_range("upstream.timeout_seconds", self.timeout_seconds, 1, 900)?;

        tracing::debug!("Proxy configuration validation passed");
        Ok(())
    }
}
