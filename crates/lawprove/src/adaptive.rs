//! The adaptive feedback loop
//!
//! [`AdaptiveEngine`] drives the same cells as [`crate::Engine`] but keeps a
//! full [`IterationRecord`] per feedback iteration: wall-clock timing, the
//! constraints newly inferred and accumulated, and the model's own confidence
//! and reasoning when it reports them.
//!
//! The loop differs from the plain orchestrator in one termination rule: it
//! requires at least two iterations before stopping on "no new constraints",
//! and only stops on that reason when the model actually proposed something.
//! A first failing sample can be noise, and a model that proposes nothing at
//! all deserves fresh samples until the iteration budget runs out.

use crate::config::EngineConfig;
use crate::engine::{combinations_for_law, novel_constraints, prepare_cell, CellSetup};
use crate::outcome::{CellResult, CellStatus, IterationRecord, RunResults, StopReason};
use crate::EngineError;
use chrono::Utc;
use lawprove_core::{GrammarConfig, LawVerdict};
use lawprove_gen::{DerivationService, FunctionProfile, InputGenerator};
use lawprove_infer::InferenceEngine;
use lawprove_laws::{Evaluator, Law};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Iterations the loop must complete before "no new constraints" may
/// terminate it
const MIN_ITERATIONS_BEFORE_STALL: usize = 2;

/// Feedback-loop driver that records every iteration
pub struct AdaptiveEngine {
    config: EngineConfig,
    service: Arc<dyn DerivationService>,
    evaluator: Evaluator,
    inference: InferenceEngine,
}

impl AdaptiveEngine {
    /// Build an adaptive engine. The configured feedback attempt budget is
    /// read as the per-cell iteration budget.
    pub fn new(config: EngineConfig, service: Arc<dyn DerivationService>) -> Self {
        let inference = InferenceEngine::new(config.model());
        Self {
            config,
            service,
            evaluator: Evaluator::new(),
            inference,
        }
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Drive every selected law against every applicable combination,
    /// recording per-iteration feedback state
    pub async fn run(&self) -> Result<RunResults, EngineError> {
        let mut generator = InputGenerator::new(
            self.service.clone(),
            self.config.example_count(),
            self.config.cache_enabled(),
        );
        let profiles = self.config.profiles();
        let laws = self.config.effective_laws();

        let mut cells = Vec::new();
        for law in &laws {
            for combination in combinations_for_law(&profiles, law) {
                let cell = self.run_cell(&mut generator, law, &combination).await?;
                debug!(
                    law = %cell.law,
                    functions = ?cell.functions,
                    status = ?cell.status,
                    iterations = cell.iterations.len(),
                    reason = cell.reason.describe(),
                    "adaptive cell finished"
                );
                cells.push(cell);
            }
        }

        let results = RunResults { cells };
        let summary = results.summary();
        info!(
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "adaptive run complete"
        );
        Ok(results)
    }

    async fn run_cell(
        &self,
        generator: &mut InputGenerator,
        law: &Arc<Law>,
        profiles: &[FunctionProfile],
    ) -> Result<CellResult, EngineError> {
        let names: Vec<String> = profiles.iter().map(|p| p.name().to_string()).collect();

        let (combined, base) = match prepare_cell(profiles, self.config.strategy()) {
            CellSetup::Ready(combined, base) => (combined, base),
            CellSetup::Skip => return Ok(CellResult::skipped(law.name(), names)),
        };

        let budget = self.config.max_feedback_attempts();
        let feedback = self.config.feedback_enabled();

        let mut applied: BTreeSet<String> =
            base.constraints().iter().map(|c| (*c).to_string()).collect();
        let mut inferred_total: Vec<String> = Vec::new();
        let mut iterations: Vec<IterationRecord> = Vec::new();
        let mut grammar_override: Option<GrammarConfig> = None;
        let mut last_verdict = None;

        for iteration in 1..=budget {
            let started_at = Utc::now();
            let started = Instant::now();

            let inputs = generator
                .get_inputs_for_combination(profiles, grammar_override.as_ref())
                .await?;
            let Some(inputs) = inputs.filter(|tuples| !tuples.is_empty()) else {
                return Ok(finish(
                    law,
                    names,
                    CellStatus::Failed,
                    StopReason::InputsExhausted,
                    iteration - 1,
                    last_verdict,
                    inferred_total,
                    iterations,
                ));
            };

            let verdict = self.evaluator.evaluate(
                law,
                &combined,
                &inputs,
                self.config.max_counterexamples(),
            )?;

            if verdict.holds {
                iterations.push(record(iteration, started_at, started, Vec::new(), &inferred_total, None, None));
                return Ok(finish(
                    law,
                    names,
                    CellStatus::Passed,
                    StopReason::LawHolds,
                    iteration,
                    Some(verdict),
                    inferred_total,
                    iterations,
                ));
            }
            if !feedback {
                return Ok(finish(
                    law,
                    names,
                    CellStatus::Failed,
                    StopReason::FeedbackDisabled,
                    iteration,
                    Some(verdict),
                    inferred_total,
                    iterations,
                ));
            }
            if iteration == budget {
                iterations.push(record(iteration, started_at, started, Vec::new(), &inferred_total, None, None));
                return Ok(finish(
                    law,
                    names,
                    CellStatus::Failed,
                    StopReason::MaxIterationsReached,
                    iteration,
                    Some(verdict),
                    inferred_total,
                    iterations,
                ));
            }

            // Inference always runs against the pre-merge base grammar
            let report = self.inference.infer_detailed(&verdict.traces, &base).await?;
            let proposed_any = !report.constraints.is_empty();
            let novel = novel_constraints(report.constraints, &applied);
            last_verdict = Some(verdict);

            iterations.push(record(
                iteration,
                started_at,
                started,
                novel.clone(),
                &inferred_total,
                report.confidence,
                report.reasoning,
            ));

            if novel.is_empty() {
                // Stalled: the model proposed only already-applied
                // constraints. A silent model instead gets fresh samples
                // until the budget runs out.
                if proposed_any && iteration >= MIN_ITERATIONS_BEFORE_STALL {
                    return Ok(finish(
                        law,
                        names,
                        CellStatus::Failed,
                        StopReason::NoNewConstraints,
                        iteration,
                        last_verdict,
                        inferred_total,
                        iterations,
                    ));
                }
            } else {
                debug!(
                    law = law.name(),
                    iteration,
                    constraints = ?novel,
                    "merging inferred constraints"
                );
                applied.extend(novel.iter().cloned());
                inferred_total.extend(novel.iter().cloned());
                if let Some(last) = iterations.last_mut() {
                    last.cumulative = inferred_total.clone();
                }
            }

            // Regenerate under the current cumulative constraint set; the
            // override path bypasses the cache so every iteration sees a
            // fresh sample
            grammar_override = Some(base.add_constraints(applied.iter().cloned()));
        }

        // The budget arm above returns on the final iteration
        Ok(finish(
            law,
            names,
            CellStatus::Failed,
            StopReason::MaxIterationsReached,
            budget,
            last_verdict,
            inferred_total,
            iterations,
        ))
    }
}

#[allow(clippy::too_many_arguments)]
fn finish(
    law: &Arc<Law>,
    functions: Vec<String>,
    status: CellStatus,
    reason: StopReason,
    attempts: usize,
    verdict: Option<LawVerdict>,
    constraints: Vec<String>,
    iterations: Vec<IterationRecord>,
) -> CellResult {
    CellResult {
        law: law.name().to_string(),
        functions,
        status,
        reason,
        verdict,
        attempts,
        constraints,
        iterations,
    }
}

fn record(
    iteration: usize,
    started_at: chrono::DateTime<Utc>,
    started: Instant,
    inferred: Vec<String>,
    cumulative: &[String],
    confidence: Option<f64>,
    reasoning: Option<String>,
) -> IterationRecord {
    IterationRecord {
        iteration,
        started_at,
        elapsed: started.elapsed(),
        inferred,
        cumulative: cumulative.to_vec(),
        confidence,
        reasoning,
    }
}
