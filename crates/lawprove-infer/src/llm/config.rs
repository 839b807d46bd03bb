//! Text-generation client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the text-generation service client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the completion endpoint
    pub base_url: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature; low for deterministic constraint proposals
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Environment variable holding the API key, if the service needs one
    pub api_key_env: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8600".to_string(),
            model: "constraint-suggest-1".to_string(),
            max_tokens: 512,
            temperature: 0.1,
            timeout_secs: 60,
            api_key_env: None,
        }
    }
}

impl LlmConfig {
    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the maximum generated tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Read the configured API key from the environment, if any
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chaining() {
        let config = LlmConfig::default()
            .with_base_url("http://model.internal")
            .with_model("suggest-2")
            .with_max_tokens(256)
            .with_temperature(0.0)
            .with_timeout_secs(30);
        assert_eq!(config.base_url, "http://model.internal");
        assert_eq!(config.model, "suggest-2");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_default_temperature_is_low() {
        assert!(LlmConfig::default().temperature < 0.2);
    }
}
