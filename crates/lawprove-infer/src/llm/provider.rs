//! HTTP provider implementation

use super::client::{LlmClient, LlmResponse};
use super::config::LlmConfig;
use super::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for a prompt-in/text-out completion service
pub struct TextCompletionClient {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl TextCompletionClient {
    /// Create a client from configuration
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.get_api_key();
        if config.api_key_env.is_some() && api_key.is_none() {
            return Err(LlmError::NotConfigured);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Try to create a client, returning None if not configured
    pub fn try_new(config: LlmConfig) -> Option<Self> {
        Self::new(config).ok()
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    text: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[async_trait]
impl LlmClient for TextCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let mut builder = self
            .client
            .post(format!("{}/complete", self.config.base_url))
            .header("content-type", "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return match status.as_u16() {
                401 | 403 => Err(LlmError::AuthError(body)),
                429 => Err(LlmError::RateLimited),
                _ => Err(LlmError::RequestFailed(format!("HTTP {}: {}", status, body))),
            };
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::ParseError(e.to_string()))?;

        Ok(LlmResponse {
            content: parsed.text,
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
            stop_reason: parsed.stop_reason,
        })
    }

    fn is_configured(&self) -> bool {
        self.config.api_key_env.is_none() || self.api_key.is_some()
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_without_key_requirement_is_configured() {
        let client = TextCompletionClient::new(LlmConfig::default()).unwrap();
        assert!(client.is_configured());
        assert_eq!(client.model_id(), "constraint-suggest-1");
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let mut config = LlmConfig::default();
        config.api_key_env = Some("LAWPROVE_TEST_KEY_THAT_IS_UNSET".to_string());
        assert!(TextCompletionClient::try_new(config).is_none());
    }
}
