//! Client trait and response types

use super::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response from a text-generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Stop reason, if the provider reports one
    pub stop_reason: Option<String>,
}

/// Trait for text-generation clients
///
/// Implementations handle provider-specific API details; the inference
/// models only ever see a prompt going in and text coming out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a single prompt
    async fn complete(&self, prompt: &str) -> Result<LlmResponse, LlmError>;

    /// Check if the client is configured and ready
    fn is_configured(&self) -> bool;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
