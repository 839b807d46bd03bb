//! Client for the external grammar-based generator service
//!
//! The service owns the fuzzing and parsing algorithms; this module only
//! speaks its wire contract: a generation request carrying the source id,
//! extra constraints, and population sizing, answered by rendered derivation
//! items, plus a parse call that turns one rendered item back into a
//! structured tree.

use crate::tree::DerivationTree;
use crate::GenError;
use async_trait::async_trait;
use lawprove_core::GrammarConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One generation request to the external service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Generation source identifier
    pub source_id: String,
    /// Extra boolean constraints layered on the source
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_constraints: Vec<String>,
    /// Number of parsed tuples the caller wants to end up with
    pub desired_count: usize,
    /// Candidate population the generator should derive, normally about
    /// double the desired count to absorb generation rejection
    pub population_size: usize,
}

impl GenerationRequest {
    /// Build a request for a grammar configuration and a desired tuple count
    pub fn for_grammar(grammar: &GrammarConfig, desired_count: usize) -> Self {
        Self {
            source_id: grammar.source_id().to_string(),
            extra_constraints: grammar
                .constraints()
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            desired_count,
            population_size: desired_count.saturating_mul(2),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    items: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ParseRequest<'a> {
    source_id: &'a str,
    text: &'a str,
}

/// The external generator boundary. Implementations are the only place the
/// fuzzing/parsing service is spoken to.
#[async_trait]
pub trait DerivationService: Send + Sync {
    /// Produce rendered derivation items for a request
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenError>;

    /// Parse one rendered item back into a structured tree
    async fn parse(
        &self,
        grammar: &GrammarConfig,
        text: &str,
    ) -> Result<DerivationTree, GenError>;
}

/// HTTP implementation of the generator boundary.
///
/// Generation carries no explicit timeout: a long-running derivation runs to
/// completion or fails at the transport level.
pub struct HttpDerivationService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDerivationService {
    /// Connect to a generator service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DerivationService for HttpDerivationService {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenError> {
        debug!(
            source = %request.source_id,
            constraints = request.extra_constraints.len(),
            population = request.population_size,
            "requesting derivations"
        );
        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenError::RequestFailed(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GenerationResponse =
            serde_json::from_str(&body).map_err(|e| GenError::DecodeError(e.to_string()))?;
        Ok(parsed.items)
    }

    async fn parse(
        &self,
        grammar: &GrammarConfig,
        text: &str,
    ) -> Result<DerivationTree, GenError> {
        let request = ParseRequest {
            source_id: grammar.source_id(),
            text,
        };
        let response = self
            .client
            .post(format!("{}/parse", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenError::RequestFailed(format!("HTTP {}: {}", status, body)));
        }

        serde_json::from_str(&body).map_err(|e| GenError::DecodeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawprove_core::GrammarSource;
    use std::collections::BTreeMap;

    #[test]
    fn test_request_doubles_population() {
        let mut rules = BTreeMap::new();
        rules.insert("start".to_string(), vec!["<n>".to_string()]);
        rules.insert("n".to_string(), vec!["1".to_string()]);
        let grammar = GrammarConfig::with_constraints(
            GrammarSource::new("arith", "start", rules),
            ["int(<n>) != 0".to_string()],
        );
        let request = GenerationRequest::for_grammar(&grammar, 25);
        assert_eq!(request.desired_count, 25);
        assert_eq!(request.population_size, 50);
        assert_eq!(request.extra_constraints, vec!["int(<n>) != 0"]);
        assert_eq!(request.source_id, "arith");
    }
}
