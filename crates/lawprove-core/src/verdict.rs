//! Law verdicts, case statistics, and execution traces

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Counterexample recorded when a law had no usable inputs at all
pub const NO_VALID_INPUTS: &str = "no valid inputs";

/// Aggregate case counts for one law evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStats {
    /// Cases attempted
    pub total_count: usize,
    /// Cases that satisfied the law
    pub success_count: usize,
}

impl CaseStats {
    /// Fraction of attempted cases that passed, in `[0, 1]`
    pub fn confidence(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.success_count as f64 / self.total_count as f64
        }
    }
}

/// Record of one tested input and whether it passed; the feedback loop's
/// evidence unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    /// The raw input tuple
    pub input: Vec<Value>,
    /// Whether the law held on this input
    pub passed: bool,
    /// Name of the law that produced this trace
    pub law: String,
}

impl ExecutionTrace {
    /// Record one tested input
    pub fn new(input: Vec<Value>, passed: bool, law: impl Into<String>) -> Self {
        Self {
            input,
            passed,
            law: law.into(),
        }
    }
}

/// Outcome of evaluating one law against one function combination over a
/// bounded input set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawVerdict {
    /// Whether the law held on every attempted case
    pub holds: bool,
    /// Evidence for failing cases, truncated to the caller's cap
    pub counterexamples: Vec<String>,
    /// Evidence for passing cases, truncated to the caller's cap
    pub successes: Vec<String>,
    /// Aggregate case counts (these keep counting past the evidence cap)
    pub stats: CaseStats,
    /// Per-input pass/fail records for the feedback loop
    pub traces: Vec<ExecutionTrace>,
}

impl LawVerdict {
    /// Verdict for a law that had no usable inputs: fails with the sentinel
    /// counterexample and zero stats
    pub fn no_valid_inputs() -> Self {
        Self {
            holds: false,
            counterexamples: vec![NO_VALID_INPUTS.to_string()],
            successes: Vec::new(),
            stats: CaseStats::default(),
            traces: Vec::new(),
        }
    }

    /// Whether this verdict is the no-usable-inputs sentinel
    pub fn is_input_starved(&self) -> bool {
        self.stats.total_count == 0
            && self.counterexamples.iter().any(|c| c == NO_VALID_INPUTS)
    }

    /// Re-bound the evidence lists to `cap`, preserving stats and traces
    pub fn bounded(mut self, cap: usize) -> Self {
        self.counterexamples.truncate(cap);
        self.successes.truncate(cap);
        self
    }
}

/// Accumulates cases during one law evaluation, enforcing the evidence cap
/// while letting the statistics keep counting
#[derive(Debug)]
pub struct CaseRecorder {
    law: String,
    cap: usize,
    counterexamples: Vec<String>,
    successes: Vec<String>,
    stats: CaseStats,
    traces: Vec<ExecutionTrace>,
}

impl CaseRecorder {
    /// Start recording for a law with the given evidence cap
    pub fn new(law: impl Into<String>, cap: usize) -> Self {
        Self {
            law: law.into(),
            cap,
            counterexamples: Vec::new(),
            successes: Vec::new(),
            stats: CaseStats::default(),
            traces: Vec::new(),
        }
    }

    /// Record one attempted case. Evidence accumulation stops at the cap;
    /// `total_count`/`success_count` still reflect every attempted case.
    pub fn record(&mut self, input: Vec<Value>, passed: bool, evidence: String) {
        self.stats.total_count += 1;
        if passed {
            self.stats.success_count += 1;
            if self.successes.len() < self.cap {
                self.successes.push(evidence);
            }
        } else if self.counterexamples.len() < self.cap {
            self.counterexamples.push(evidence);
        }
        self.traces
            .push(ExecutionTrace::new(input, passed, self.law.clone()));
    }

    /// Number of attempted cases so far
    pub fn attempted(&self) -> usize {
        self.stats.total_count
    }

    /// Finish recording. With zero attempted cases this yields the
    /// no-valid-inputs verdict.
    pub fn finish(self) -> LawVerdict {
        if self.stats.total_count == 0 {
            return LawVerdict::no_valid_inputs();
        }
        LawVerdict {
            holds: self.stats.success_count == self.stats.total_count,
            counterexamples: self.counterexamples,
            successes: self.successes,
            stats: self.stats,
            traces: self.traces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_recorder_is_input_starved() {
        let verdict = CaseRecorder::new("commutativity", 5).finish();
        assert!(!verdict.holds);
        assert!(verdict.is_input_starved());
        assert_eq!(verdict.counterexamples, vec![NO_VALID_INPUTS.to_string()]);
        assert_eq!(verdict.stats, CaseStats::default());
    }

    #[test]
    fn test_evidence_capped_but_stats_keep_counting() {
        let mut recorder = CaseRecorder::new("commutativity", 2);
        for i in 0..10 {
            recorder.record(vec![Value::Int(i)], false, format!("case {}", i));
        }
        let verdict = recorder.finish();
        assert!(!verdict.holds);
        assert_eq!(verdict.counterexamples.len(), 2);
        assert_eq!(verdict.stats.total_count, 10);
        assert_eq!(verdict.stats.success_count, 0);
        assert_eq!(verdict.traces.len(), 10);
    }

    #[test]
    fn test_all_passing_holds() {
        let mut recorder = CaseRecorder::new("commutativity", 5);
        recorder.record(vec![Value::Int(1)], true, "ok".into());
        recorder.record(vec![Value::Int(2)], true, "ok".into());
        let verdict = recorder.finish();
        assert!(verdict.holds);
        assert_eq!(verdict.stats.confidence(), 1.0);
    }

    #[test]
    fn test_bounded_truncates_evidence_only() {
        let mut recorder = CaseRecorder::new("x", 10);
        for i in 0..5 {
            recorder.record(vec![Value::Int(i)], false, format!("c{}", i));
        }
        let verdict = recorder.finish().bounded(1);
        assert_eq!(verdict.counterexamples.len(), 1);
        assert_eq!(verdict.stats.total_count, 5);
    }
}
