//! Run results: per-cell outcomes, iteration records, and the run summary
//!
//! A *cell* is one (law, function-combination) pair. Every cell the engine
//! drives produces a [`CellResult`] keyed by the law name and the ordered
//! function-name tuple; the adaptive engine additionally records one
//! [`IterationRecord`] per feedback iteration.

use chrono::{DateTime, Utc};
use lawprove_core::LawVerdict;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a cell's drive loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The law held on every attempted case
    LawHolds,
    /// The law failed and the feedback loop is disabled
    FeedbackDisabled,
    /// The functions share no generation source or parser; the combination
    /// was never driven
    SourceMismatch,
    /// Input generation produced nothing for the current grammar
    InputsExhausted,
    /// Inference proposed nothing beyond the already-applied constraints
    NoNewConstraints,
    /// The orchestrator's feedback attempt budget ran out
    MaxAttemptsReached,
    /// The adaptive loop's iteration budget ran out
    MaxIterationsReached,
}

impl StopReason {
    /// Human-readable termination reason used in reports
    pub fn describe(self) -> &'static str {
        match self {
            StopReason::LawHolds => "law holds",
            StopReason::FeedbackDisabled => "feedback disabled",
            StopReason::SourceMismatch => "functions share no grammar or parser",
            StopReason::InputsExhausted => "input generation exhausted",
            StopReason::NoNewConstraints => "no new constraints could be inferred",
            StopReason::MaxAttemptsReached => "max attempts reached",
            StopReason::MaxIterationsReached => "max iterations reached",
        }
    }
}

/// Final status of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    /// The law held
    Passed,
    /// The law failed, or could not be driven to a pass within budget
    Failed,
    /// The combination was inapplicable and never driven
    Skipped,
}

/// One feedback iteration of the adaptive engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based iteration index
    pub iteration: usize,
    /// When the iteration started
    pub started_at: DateTime<Utc>,
    /// Wall-clock time the iteration took
    pub elapsed: Duration,
    /// Constraints newly inferred this iteration
    pub inferred: Vec<String>,
    /// All constraints accumulated through this iteration
    pub cumulative: Vec<String>,
    /// Model-reported confidence, when the model has one
    pub confidence: Option<f64>,
    /// Model-reported reasoning text, when the model has one
    pub reasoning: Option<String>,
}

/// Outcome of one (law, function-combination) cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellResult {
    /// Canonical law name
    pub law: String,
    /// Ordered names of the combined functions
    pub functions: Vec<String>,
    /// Final status
    pub status: CellStatus,
    /// Why the drive loop stopped
    pub reason: StopReason,
    /// The last verdict, absent for skipped or input-starved cells
    pub verdict: Option<LawVerdict>,
    /// Evaluation attempts made
    pub attempts: usize,
    /// Constraints inferred across the whole cell, beyond the base grammar
    pub constraints: Vec<String>,
    /// Per-iteration records; empty outside the adaptive engine
    pub iterations: Vec<IterationRecord>,
}

impl CellResult {
    /// A cell skipped before any evaluation
    pub fn skipped(law: impl Into<String>, functions: Vec<String>) -> Self {
        Self {
            law: law.into(),
            functions,
            status: CellStatus::Skipped,
            reason: StopReason::SourceMismatch,
            verdict: None,
            attempts: 0,
            constraints: Vec::new(),
            iterations: Vec::new(),
        }
    }

    /// Fraction of attempted cases that passed in the last verdict
    pub fn confidence(&self) -> f64 {
        self.verdict.as_ref().map_or(0.0, |v| v.stats.confidence())
    }
}

/// Aggregate counts across all driven cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Cells whose law held
    pub passed: usize,
    /// Cells whose law failed within budget
    pub failed: usize,
    /// Cells that were never driven
    pub skipped: usize,
}

impl RunSummary {
    /// Total number of cells
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// All cell results of one engine run, in drive order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResults {
    /// Per-cell outcomes
    pub cells: Vec<CellResult>,
}

impl RunResults {
    /// Look up one cell by law name and ordered function names
    pub fn get(&self, law: &str, functions: &[&str]) -> Option<&CellResult> {
        self.cells
            .iter()
            .find(|cell| cell.law == law && cell.functions.iter().map(String::as_str).eq(functions.iter().copied()))
    }

    /// Aggregate pass/fail/skip counts
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for cell in &self.cells {
            match cell.status {
                CellStatus::Passed => summary.passed += 1,
                CellStatus::Failed => summary.failed += 1,
                CellStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(law: &str, functions: &[&str], status: CellStatus) -> CellResult {
        CellResult {
            law: law.to_string(),
            functions: functions.iter().map(|s| (*s).to_string()).collect(),
            status,
            reason: StopReason::LawHolds,
            verdict: None,
            attempts: 1,
            constraints: Vec::new(),
            iterations: Vec::new(),
        }
    }

    #[test]
    fn test_lookup_by_law_and_functions() {
        let results = RunResults {
            cells: vec![
                cell("commutativity", &["add"], CellStatus::Passed),
                cell("associativity", &["add", "mul"], CellStatus::Failed),
            ],
        };
        assert!(results.get("commutativity", &["add"]).is_some());
        assert!(results.get("associativity", &["add", "mul"]).is_some());
        assert!(results.get("associativity", &["mul", "add"]).is_none());
    }

    #[test]
    fn test_summary_counts() {
        let results = RunResults {
            cells: vec![
                cell("commutativity", &["add"], CellStatus::Passed),
                cell("commutativity", &["sub"], CellStatus::Failed),
                cell("commutativity", &["cat"], CellStatus::Skipped),
            ],
        };
        let summary = results.summary();
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_describe_is_stable_report_text() {
        assert_eq!(
            StopReason::NoNewConstraints.describe(),
            "no new constraints could be inferred"
        );
        assert_eq!(StopReason::MaxIterationsReached.describe(), "max iterations reached");
        assert_eq!(StopReason::MaxAttemptsReached.describe(), "max attempts reached");
    }
}
