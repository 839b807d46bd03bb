//! External-process constraint inference
//!
//! Serializes traces and grammar context as JSON to a subprocess and parses
//! its structured response. The same property-specific heuristics as the
//! rule-based model (division-by-zero, overflow/range, equal-operand
//! patterns) are applied on top of whatever the process proposes, and every
//! surviving candidate must pass the syntactic constraint gate.

use crate::rules::analyze_traces;
use crate::{ConstraintModel, InferenceReport, InferError};
use async_trait::async_trait;
use lawprove_core::{ExecutionTrace, GrammarConfig};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Constraint model backed by an external analysis process
pub struct ExternalProcessModel {
    program: String,
    args: Vec<String>,
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    source_id: &'a str,
    symbols: Vec<String>,
    current_constraints: Vec<&'a str>,
    traces: &'a [ExecutionTrace],
}

#[derive(Deserialize)]
struct AnalysisResponse {
    #[serde(default)]
    constraints: Vec<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

impl ExternalProcessModel {
    /// Build the model around an analysis command
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    async fn run_process(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisResponse, InferError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| InferError::DecodeError(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(&payload).await?;
        }
        drop(child.stdin.take());

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(InferError::ProcessFailed(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| InferError::DecodeError(e.to_string()))
    }
}

#[async_trait]
impl ConstraintModel for ExternalProcessModel {
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

        let request = AnalysisRequest {
            source_id: grammar.source_id(),
            symbols: grammar.source().argument_symbols(),
            current_constraints: grammar.constraints(),
            traces,
        };
        let response = self.run_process(&request).await?;

        let mut constraints: Vec<String> = response
            .constraints
            .into_iter()
            .filter(|c| grammar.validate_constraint(c).is_ok())
            .collect();

        // Supplement with the shared pattern heuristics
        for heuristic in analyze_traces(traces, grammar) {
            if !constraints.contains(&heuristic) {
                constraints.push(heuristic);
            }
        }

        debug!(kept = constraints.len(), "external-process inference round");
        Ok(InferenceReport {
            constraints,
            confidence: response.confidence,
            reasoning: response.reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawprove_core::{GrammarSource, Value};
    use std::collections::BTreeMap;

    fn grammar() -> GrammarConfig {
        let mut rules = BTreeMap::new();
        rules.insert("start".to_string(), vec!["<n> <m>".to_string()]);
        rules.insert("n".to_string(), vec!["0".to_string()]);
        rules.insert("m".to_string(), vec!["0".to_string()]);
        GrammarConfig::new(GrammarSource::new("arith", "start", rules))
    }

    #[tokio::test]
    async fn test_zero_traces_skip_the_process() {
        // The program does not exist; with zero traces it must never run
        let model = ExternalProcessModel::new("/nonexistent/analyzer", vec![]);
        let constraints = model.infer_constraints(&[], &grammar()).await.unwrap();
        assert!(constraints.is_empty());
    }

    #[tokio::test]
    async fn test_process_response_merged_with_heuristics() {
        // `cat` has no JSON response, so use a tiny shell program that echoes
        // a canned structured response
        let model = ExternalProcessModel::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"cat > /dev/null; echo '{"constraints": ["int(<n>) != int(<m>)", "bogus line"], "confidence": 0.7, "reasoning": "equal operands fail"}'"#
                    .to_string(),
            ],
        );
        let traces = vec![
            ExecutionTrace::new(vec![Value::Int(2), Value::Int(0)], false, "law"),
            ExecutionTrace::new(vec![Value::Int(2), Value::Int(3)], true, "law"),
        ];
        let report = model.infer_detailed(&traces, &grammar()).await.unwrap();
        // Invalid process lines are filtered; heuristics are supplemented
        assert!(report
            .constraints
            .contains(&"int(<n>) != int(<m>)".to_string()));
        assert!(!report.constraints.contains(&"bogus line".to_string()));
        assert!(report.constraints.contains(&"int(<m>) != 0".to_string()));
        assert_eq!(report.confidence, Some(0.7));
        assert_eq!(report.reasoning.as_deref(), Some("equal operands fail"));
    }

    #[tokio::test]
    async fn test_failing_process_is_an_error() {
        let model = ExternalProcessModel::new(
            "sh",
            vec!["-c".to_string(), "cat > /dev/null; exit 3".to_string()],
        );
        let traces = vec![ExecutionTrace::new(vec![Value::Int(1)], false, "law")];
        let result = model.infer_constraints(&traces, &grammar()).await;
        assert!(matches!(result, Err(InferError::ProcessFailed(_))));
    }
}
