//! LLM-prompted constraint inference
//!
//! Builds a structured prompt (declared symbols, allowed and forbidden
//! expression shapes, a cast cheatsheet, the current constraints, and the
//! passing/failing trace listing), sends it to the text-generation service,
//! and filters the response line-by-line: explanatory lines are discarded and
//! only candidates that pass the syntactic constraint gate survive.

use crate::llm::LlmClient;
use crate::{ConstraintModel, InferenceReport, InferError};
use async_trait::async_trait;
use lawprove_core::{ExecutionTrace, GrammarConfig};
use std::sync::Arc;
use tracing::debug;

/// Markers for lines that carry commentary rather than a candidate
/// expression; such lines are dropped before validation
const EXPLANATORY_MARKERS: &[&str] = &["#", "//", "```", "Here", "These", "Note", "Explanation"];

/// Constraint model backed by the external text-generation service
pub struct PromptedModel {
    client: Arc<dyn LlmClient>,
}

impl PromptedModel {
    /// Build the model over a text-generation client
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Assemble the inference prompt for one round
    pub fn build_prompt(traces: &[ExecutionTrace], grammar: &GrammarConfig) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "A generated-input law check is failing. Propose boolean constraints that \
             restrict the input grammar so the failing inputs are no longer generated.\n\n",
        );

        prompt.push_str("Declared symbols:\n");
        for symbol in grammar.nonterminals() {
            prompt.push_str(&format!("  <{}>\n", symbol));
        }

        prompt.push_str(
            "\nValid constraint shapes (one per line):\n  \
             int(<symbol>) OP int(<symbol>)\n  \
             int(<symbol>) OP literal\n  \
             len(<symbol>) OP len(<symbol>)\n  \
             len(<symbol>) OP literal\n  \
             OP is one of <, <=, >, >=, ==, !=\n",
        );
        prompt.push_str(
            "\nInvalid shapes:\n  \
             bare symbols without an int(...) or len(...) cast\n  \
             compound expressions joined with and/or\n  \
             symbols the grammar does not declare\n",
        );
        prompt.push_str(
            "\nCast cheatsheet:\n  \
             int(<x>)  numeric value derived from <x>\n  \
             len(<x>)  length of the text derived from <x>\n",
        );

        prompt.push_str("\nCurrent constraints:\n");
        let current = grammar.constraints();
        if current.is_empty() {
            prompt.push_str("  (none)\n");
        } else {
            for constraint in current {
                prompt.push_str(&format!("  {}\n", constraint));
            }
        }

        prompt.push_str("\nPassing inputs:\n");
        let mut any_passing = false;
        for trace in traces.iter().filter(|t| t.passed) {
            any_passing = true;
            prompt.push_str(&format!("  {}\n", render_input(trace)));
        }
        if !any_passing {
            prompt.push_str("  (none)\n");
        }

        prompt.push_str("\nFailing inputs:\n");
        for trace in traces.iter().filter(|t| !t.passed) {
            prompt.push_str(&format!("  {}\n", render_input(trace)));
        }

        prompt.push_str("\nAnswer with new constraints only, one per line, no commentary.\n");
        prompt
    }

    /// Keep only response lines that survive marker filtering and the
    /// syntactic constraint gate
    pub fn parse_candidates(content: &str, grammar: &GrammarConfig) -> Vec<String> {
        let mut candidates = Vec::new();
        for line in content.lines() {
            let trimmed = line
                .trim()
                .trim_start_matches(['-', '*'])
                .trim_matches('`')
                .trim();
            if trimmed.is_empty() {
                continue;
            }
            if EXPLANATORY_MARKERS
                .iter()
                .any(|marker| trimmed.starts_with(marker))
            {
                continue;
            }
            if grammar.validate_constraint(trimmed).is_ok() {
                candidates.push(trimmed.to_string());
            }
        }
        candidates
    }
}

fn render_input(trace: &ExecutionTrace) -> String {
    let rendered: Vec<String> = trace.input.iter().map(ToString::to_string).collect();
    format!("({})", rendered.join(", "))
}

#[async_trait]
impl ConstraintModel for PromptedModel {
    async fn infer_constraints(
        &self,
        traces: &[ExecutionTrace],
        grammar: &GrammarConfig,
    ) -> Result<Vec<String>, InferError> {
        Ok(self.infer_detailed(traces, grammar).await?.constraints)
    }

    async fn infer_detailed(
        &self,
        traces: &[ExecutionTrace],
        grammar: &GrammarConfig,
    ) -> Result<InferenceReport, InferError> {
        if traces.is_empty() {
            return Ok(InferenceReport::default());
        }

        let prompt = Self::build_prompt(traces, grammar);
        let response = self.client.complete(&prompt).await?;
        let constraints = Self::parse_candidates(&response.content, grammar);
        debug!(
            response_lines = response.content.lines().count(),
            kept = constraints.len(),
            "prompted inference round"
        );
        Ok(InferenceReport {
            constraints,
            confidence: None,
            reasoning: Some(response.content),
        })
    }
}
