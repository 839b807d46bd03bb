//! Rule-based constraint inference
//!
//! Partitions traces by pass/fail and inspects each input position
//! numerically:
//!
//! - all failing values at a position exactly zero, no passing value zero
//!   ⇒ `int(<sym>) != 0`
//! - failures uniformly negative while passes are non-negative
//!   ⇒ `int(<sym>) >= 0`
//! - failures strictly outside the observed passing range ⇒ a one- or
//!   two-sided bound at the passing extremum
//!
//! Cross-position analysis: when at least 80% of failing pairs have equal
//! values at two positions while fewer than 20% of passing pairs do, an
//! inequality between the positions is emitted.

use crate::{ConstraintModel, InferError};
use async_trait::async_trait;
use lawprove_core::{ExecutionTrace, GrammarConfig};
use tracing::debug;

/// Share of failing pairs that must be equal-valued for the cross-position
/// rule to fire
const FAILING_EQUAL_THRESHOLD: f64 = 0.8;
/// Share of passing pairs that may be equal-valued without suppressing the
/// cross-position rule
const PASSING_EQUAL_THRESHOLD: f64 = 0.2;

/// Pattern-heuristic constraint model over numeric trace positions
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedModel;

impl RuleBasedModel {
    /// Create the model
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConstraintModel for RuleBasedModel {
    async fn infer_constraints(
        &self,
        traces: &[ExecutionTrace],
        grammar: &GrammarConfig,
    ) -> Result<Vec<String>, InferError> {
        Ok(analyze_traces(traces, grammar))
    }
}

/// Render a bound literal: integral bounds print as integers
fn literal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Numeric values at one input position for a trace subset; `None` when any
/// trace carries a non-numeric value there
fn position_values(traces: &[&ExecutionTrace], position: usize) -> Option<Vec<f64>> {
    traces
        .iter()
        .filter(|t| t.input.len() > position)
        .map(|t| t.input[position].as_f64())
        .collect()
}

/// The full positional + cross-positional analysis. Shared with the
/// external-process model, which applies the same heuristics to its own
/// responses.
pub(crate) fn analyze_traces(traces: &[ExecutionTrace], grammar: &GrammarConfig) -> Vec<String> {
    if traces.is_empty() {
        return Vec::new();
    }

    let failing: Vec<&ExecutionTrace> = traces.iter().filter(|t| !t.passed).collect();
    let passing: Vec<&ExecutionTrace> = traces.iter().filter(|t| t.passed).collect();
    if failing.is_empty() {
        return Vec::new();
    }

    let symbols = grammar.source().argument_symbols();
    let arity = traces
        .iter()
        .map(|t| t.input.len())
        .max()
        .unwrap_or(0)
        .min(symbols.len());

    let mut constraints = Vec::new();

    for position in 0..arity {
        let symbol = &symbols[position];
        let Some(fail_vals) = position_values(&failing, position) else {
            continue;
        };
        if fail_vals.is_empty() {
            continue;
        }
        let pass_vals = position_values(&passing, position).unwrap_or_default();

        // Division-by-zero shape: every failure is exactly zero here
        if fail_vals.iter().all(|v| *v == 0.0) && pass_vals.iter().all(|v| *v != 0.0) {
            constraints.push(format!("int(<{}>) != 0", symbol));
            continue;
        }

        // Sign shape: failures uniformly negative, passes non-negative
        if fail_vals.iter().all(|v| *v < 0.0) && pass_vals.iter().all(|v| *v >= 0.0) {
            constraints.push(format!("int(<{}>) >= 0", symbol));
            continue;
        }

        // Range shape: failures strictly outside the observed passing range
        if !pass_vals.is_empty() {
            let pass_min = pass_vals.iter().copied().fold(f64::INFINITY, f64::min);
            let pass_max = pass_vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            if fail_vals.iter().all(|v| *v > pass_max) {
                constraints.push(format!("int(<{}>) <= {}", symbol, literal(pass_max)));
            } else if fail_vals.iter().all(|v| *v < pass_min) {
                constraints.push(format!("int(<{}>) >= {}", symbol, literal(pass_min)));
            } else if fail_vals.iter().all(|v| *v < pass_min || *v > pass_max) {
                constraints.push(format!("int(<{}>) >= {}", symbol, literal(pass_min)));
                constraints.push(format!("int(<{}>) <= {}", symbol, literal(pass_max)));
            }
        }
    }

    // Cross-position equal-operand shape
    for i in 0..arity {
        for j in (i + 1)..arity {
            let (Some(fail_i), Some(fail_j)) = (
                position_values(&failing, i),
                position_values(&failing, j),
            ) else {
                continue;
            };
            if fail_i.is_empty() || fail_i.len() != fail_j.len() {
                continue;
            }
            let failing_equal = fail_i
                .iter()
                .zip(fail_j.iter())
                .filter(|(a, b)| a == b)
                .count() as f64
                / fail_i.len() as f64;

            let passing_equal = match (position_values(&passing, i), position_values(&passing, j))
            {
                (Some(pass_i), Some(pass_j)) if !pass_i.is_empty() && pass_i.len() == pass_j.len() => {
                    pass_i
                        .iter()
                        .zip(pass_j.iter())
                        .filter(|(a, b)| a == b)
                        .count() as f64
                        / pass_i.len() as f64
                }
                _ => 0.0,
            };

            if failing_equal >= FAILING_EQUAL_THRESHOLD && passing_equal < PASSING_EQUAL_THRESHOLD
            {
                constraints.push(format!("int(<{}>) != int(<{}>)", symbols[i], symbols[j]));
            }
        }
    }

    debug!(
        failing = failing.len(),
        passing = passing.len(),
        proposed = constraints.len(),
        "rule-based analysis"
    );
    constraints
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

    fn trace(a: i64, b: i64, passed: bool) -> ExecutionTrace {
        ExecutionTrace::new(vec![Value::Int(a), Value::Int(b)], passed, "law")
    }

    #[tokio::test]
    async fn test_empty_traces_propose_nothing() {
        let model = RuleBasedModel::new();
        let constraints = model.infer_constraints(&[], &grammar()).await.unwrap();
        assert!(constraints.is_empty());
    }

    #[tokio::test]
    async fn test_zero_failures_emit_nonzero_constraint() {
        let traces = vec![trace(2, 0, false), trace(5, 0, false), trace(3, 4, true)];
        let model = RuleBasedModel::new();
        let constraints = model.infer_constraints(&traces, &grammar()).await.unwrap();
        assert!(constraints.contains(&"int(<m>) != 0".to_string()));
    }

    #[tokio::test]
    async fn test_negative_failures_emit_sign_constraint() {
        let traces = vec![trace(-3, 1, false), trace(-9, 2, false), trace(4, 3, true)];
        let model = RuleBasedModel::new();
        let constraints = model.infer_constraints(&traces, &grammar()).await.unwrap();
        assert!(constraints.contains(&"int(<n>) >= 0".to_string()));
    }

    #[tokio::test]
    async fn test_out_of_range_failures_emit_bound_at_passing_extremum() {
        let traces = vec![
            trace(100, 1, false),
            trace(250, 2, false),
            trace(3, 1, true),
            trace(9, 2, true),
        ];
        let model = RuleBasedModel::new();
        let constraints = model.infer_constraints(&traces, &grammar()).await.unwrap();
        assert!(constraints.contains(&"int(<n>) <= 9".to_string()));
    }

    #[tokio::test]
    async fn test_equal_operand_failures_emit_inequality() {
        let traces = vec![
            trace(4, 4, false),
            trace(7, 7, false),
            trace(9, 9, false),
            trace(1, 2, true),
            trace(3, 8, true),
        ];
        let model = RuleBasedModel::new();
        let constraints = model.infer_constraints(&traces, &grammar()).await.unwrap();
        assert!(constraints.contains(&"int(<n>) != int(<m>)".to_string()));
    }

    #[tokio::test]
    async fn test_mixed_failures_propose_nothing() {
        // Failures overlap the passing range on both positions
        let traces = vec![trace(2, 3, false), trace(1, 5, true), trace(4, 2, true)];
        let model = RuleBasedModel::new();
        let constraints = model.infer_constraints(&traces, &grammar()).await.unwrap();
        assert!(constraints.is_empty());
    }

    #[test]
    fn test_proposed_constraints_pass_the_gate() {
        let traces = vec![trace(2, 0, false), trace(3, 4, true)];
        let constraints = analyze_traces(&traces, &grammar());
        for constraint in &constraints {
            assert!(grammar().validate_constraint(constraint).is_ok(), "{}", constraint);
        }
    }
}
