//! Text-generation client infrastructure
//!
//! The constraint-suggestion service is a prompt-in/text-out model backend.
//! This module provides the client trait, configuration, and the HTTP
//! provider implementation used by the prompted inference model.

mod client;
mod config;
mod provider;

pub use client::{LlmClient, LlmResponse};
pub use config::LlmConfig;
pub use provider::TextCompletionClient;

/// Error type for text-generation operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failure
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Response parsing error
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Service not configured
    #[error("Text-generation service not configured")]
    NotConfigured,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::NetworkError(err.to_string())
    }
}
