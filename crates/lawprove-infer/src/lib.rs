// Crate-level lint configuration for pedantic clippy
#![allow(clippy::must_use_candidate)] // API methods don't need must_use
#![allow(clippy::missing_const_for_fn)] // const fn optimization is minor
#![allow(clippy::use_self)] // Self vs TypeName - style preference
#![allow(clippy::doc_markdown)] // Missing backticks - low priority
#![allow(clippy::missing_errors_doc)] // Error docs are implementation details
#![allow(clippy::cast_precision_loss)] // counts to f64 for ratios is intentional
#![allow(clippy::uninlined_format_args)] // Named args are clearer
#![allow(clippy::format_push_string)] // Common pattern in prompt builders

//! Constraint inference for LawProve
//!
//! When a law fails, its execution traces become evidence for new
//! input-generation constraints. Three models implement the same contract:
//!
//! - **Rule-based**: positional and cross-positional numeric analysis of the
//!   pass/fail partition
//! - **Prompted**: a structured prompt to an external text-generation
//!   service, filtered line-by-line through the constraint gate
//! - **External process**: traces serialized to a subprocess, its structured
//!   response merged with the rule-based heuristics
//!
//! The [`InferenceEngine`] is a thin adapter over a model. It performs no
//! caching or dedup; callers filter already-applied constraints.

pub mod external;
pub mod health;
pub mod llm;
pub mod prompted;
pub mod rules;

pub use external::ExternalProcessModel;
pub use health::{BootstrapCommand, HealthPolicy, ServiceHealth};
pub use llm::{LlmClient, LlmConfig, LlmError, LlmResponse, TextCompletionClient};
pub use prompted::PromptedModel;
pub use rules::RuleBasedModel;

use async_trait::async_trait;
use lawprove_core::{ExecutionTrace, GrammarConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors from constraint inference
#[derive(Error, Debug)]
pub enum InferError {
    /// The text-generation service failed; fatal for this inference round
    #[error("Model service error: {0}")]
    Service(#[from] LlmError),

    /// The external analysis process failed or exited abnormally
    #[error("Analysis process failed: {0}")]
    ProcessFailed(String),

    /// A structured model response could not be decoded
    #[error("Failed to decode model response: {0}")]
    DecodeError(String),

    /// The model service stayed unreachable through the health policy
    #[error("Model service unavailable: {0}")]
    ServiceUnavailable(String),

    /// IO error talking to a subprocess
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What one inference round produced, with the model's own confidence and
/// reasoning when it reports them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceReport {
    /// Proposed constraint expressions
    pub constraints: Vec<String>,
    /// Model-reported confidence in `[0, 1]`, when available
    pub confidence: Option<f64>,
    /// Model-reported reasoning text, when available
    pub reasoning: Option<String>,
}

/// The model contract: execution traces in, proposed constraints out.
///
/// Given zero traces, a model must return an empty list without side effects.
#[async_trait]
pub trait ConstraintModel: Send + Sync {
    /// Propose new constraint expressions from pass/fail evidence
    async fn infer_constraints(
        &self,
        traces: &[ExecutionTrace],
        grammar: &GrammarConfig,
    ) -> Result<Vec<String>, InferError>;

    /// Like [`ConstraintModel::infer_constraints`], with model-reported
    /// confidence and reasoning when the model has them
    async fn infer_detailed(
        &self,
        traces: &[ExecutionTrace],
        grammar: &GrammarConfig,
    ) -> Result<InferenceReport, InferError> {
        Ok(InferenceReport {
            constraints: self.infer_constraints(traces, grammar).await?,
            confidence: None,
            reasoning: None,
        })
    }
}

/// Thin adapter over a pluggable constraint model
pub struct InferenceEngine {
    model: Arc<dyn ConstraintModel>,
}

impl InferenceEngine {
    /// Build an engine over a model
    pub fn new(model: Arc<dyn ConstraintModel>) -> Self {
        Self { model }
    }

    /// Delegate to the model. No caching, no dedup.
    pub async fn infer(
        &self,
        traces: &[ExecutionTrace],
        grammar: &GrammarConfig,
    ) -> Result<Vec<String>, InferError> {
        self.model.infer_constraints(traces, grammar).await
    }

    /// Delegate to the model, keeping its confidence and reasoning
    pub async fn infer_detailed(
        &self,
        traces: &[ExecutionTrace],
        grammar: &GrammarConfig,
    ) -> Result<InferenceReport, InferError> {
        self.model.infer_detailed(traces, grammar).await
    }
}
