//! Stateless evaluation pass-through
//!
//! The evaluator runs a law and re-bounds its evidence lists to the caller's
//! cap. The indirection lets orchestration post-process every verdict in one
//! place without touching individual law implementations.

use crate::catalog::Law;
use lawprove_core::{CombinedFunction, CoreError, LawVerdict, Value};
use tracing::debug;

/// Runs laws against function combinations
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Create an evaluator
    pub fn new() -> Self {
        Self
    }

    /// Execute `law` against `combined` over `inputs`, bounding the evidence
    /// lists to `max_counterexamples`
    pub fn evaluate(
        &self,
        law: &Law,
        combined: &CombinedFunction,
        inputs: &[Vec<Value>],
        max_counterexamples: usize,
    ) -> Result<LawVerdict, CoreError> {
        let verdict = law.evaluate(combined, inputs, max_counterexamples)?;
        debug!(
            law = law.name(),
            functions = ?combined.function_names(),
            holds = verdict.holds,
            total = verdict.stats.total_count,
            "evaluated law"
        );
        Ok(verdict.bounded(max_counterexamples))
    }
}
