//! The inference orchestrator
//!
//! [`Engine::run`] drives every selected law against every applicable
//! function combination, strictly sequentially. Each cell runs the state
//! machine `Generate -> Evaluate -> {Done(pass) | Infer -> Merge -> Generate
//! | Done(exhausted)}`:
//!
//! - an unbuildable base grammar (incompatible sources or parsers) skips the
//!   combination entirely;
//! - no generated inputs terminates the cell as exhausted;
//! - a holding law, or a failing law with feedback disabled, terminates with
//!   the current verdict;
//! - otherwise constraints are inferred from the failing traces against the
//!   *pre-merge* base grammar, merged into the cumulative set, and the cell
//!   regenerates under the tightened grammar until nothing new is inferred
//!   or the attempt budget runs out.

use crate::config::EngineConfig;
use crate::outcome::{CellResult, CellStatus, RunResults, StopReason};
use crate::EngineError;
use lawprove_core::{CombinedFunction, ComparisonStrategy, GrammarConfig};
use lawprove_gen::{DerivationService, FunctionProfile, InputGenerator};
use lawprove_infer::InferenceEngine;
use lawprove_laws::{Evaluator, Law};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Filter `proposed` down to expressions not yet in `applied`, dropping
/// duplicates within the proposal itself. The inference engine performs no
/// dedup of its own, so every caller of it funnels through this.
pub fn novel_constraints(proposed: Vec<String>, applied: &BTreeSet<String>) -> Vec<String> {
    let mut seen = applied.clone();
    proposed
        .into_iter()
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

/// All ordered selections (with repetition) of eligible functions a law can
/// drive: functions whose arity matches the law's, taken `num_functions` at a
/// time, in registration order
pub(crate) fn combinations_for_law(
    profiles: &[FunctionProfile],
    law: &Law,
) -> Vec<Vec<FunctionProfile>> {
    let eligible: Vec<&FunctionProfile> = profiles
        .iter()
        .filter(|p| p.spec.arity() == law.function_arity())
        .collect();
    let k = law.num_functions();
    if eligible.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut index = vec![0usize; k];
    loop {
        out.push(index.iter().map(|i| eligible[*i].clone()).collect());
        let mut position = k;
        loop {
            if position == 0 {
                return out;
            }
            position -= 1;
            index[position] += 1;
            if index[position] < eligible.len() {
                break;
            }
            index[position] = 0;
        }
    }
}

/// What one cell needs before it can be driven: the combined function, the
/// merged base grammar, and the shared parser
pub(crate) enum CellSetup {
    Ready(CombinedFunction, GrammarConfig),
    Skip,
}

pub(crate) fn prepare_cell(profiles: &[FunctionProfile], strategy: ComparisonStrategy) -> CellSetup {
    let Some(base) = InputGenerator::build_grammar_for_functions(profiles) else {
        return CellSetup::Skip;
    };
    if InputGenerator::get_parser_for_functions(profiles).is_none() {
        return CellSetup::Skip;
    }
    let combined = CombinedFunction::new(profiles.iter().map(|p| p.spec.clone()).collect(), strategy);
    CellSetup::Ready(combined, base)
}

/// Sequential driver over laws and function combinations
pub struct Engine {
    config: EngineConfig,
    service: Arc<dyn DerivationService>,
    evaluator: Evaluator,
    inference: InferenceEngine,
}

impl Engine {
    /// Build an engine from a validated configuration and the external
    /// derivation service
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

    /// Drive every selected law against every applicable combination.
    ///
    /// The input cache lives exactly as long as this call.
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
                    reason = cell.reason.describe(),
                    "cell finished"
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
            "engine run complete"
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

        let budget = if self.config.feedback_enabled() {
            self.config.max_feedback_attempts()
        } else {
            1
        };

        let mut applied: BTreeSet<String> =
            base.constraints().iter().map(|c| (*c).to_string()).collect();
        let mut inferred_total: Vec<String> = Vec::new();
        let mut grammar_override: Option<GrammarConfig> = None;
        let mut last_verdict = None;

        let finish = |status, reason, attempts, verdict, constraints: Vec<String>| CellResult {
            law: law.name().to_string(),
            functions: names.clone(),
            status,
            reason,
            verdict,
            attempts,
            constraints,
            iterations: Vec::new(),
        };

        for attempt in 1..=budget {
            let inputs = generator
                .get_inputs_for_combination(profiles, grammar_override.as_ref())
                .await?;
            let Some(inputs) = inputs.filter(|tuples| !tuples.is_empty()) else {
                return Ok(finish(
                    CellStatus::Failed,
                    StopReason::InputsExhausted,
                    attempt - 1,
                    last_verdict,
                    inferred_total,
                ));
            };

            let verdict = self.evaluator.evaluate(
                law,
                &combined,
                &inputs,
                self.config.max_counterexamples(),
            )?;

            if verdict.holds {
                return Ok(finish(
                    CellStatus::Passed,
                    StopReason::LawHolds,
                    attempt,
                    Some(verdict),
                    inferred_total,
                ));
            }
            if !self.config.feedback_enabled() {
                return Ok(finish(
                    CellStatus::Failed,
                    StopReason::FeedbackDisabled,
                    attempt,
                    Some(verdict),
                    inferred_total,
                ));
            }
            if attempt == budget {
                return Ok(finish(
                    CellStatus::Failed,
                    StopReason::MaxAttemptsReached,
                    attempt,
                    Some(verdict),
                    inferred_total,
                ));
            }

            // Inference runs against the pre-merge base grammar so the
            // feedback signal stays anchored to the original symbol bounds
            let proposed = self.inference.infer(&verdict.traces, &base).await?;
            let novel = novel_constraints(proposed, &applied);
            last_verdict = Some(verdict);

            if novel.is_empty() {
                return Ok(finish(
                    CellStatus::Failed,
                    StopReason::NoNewConstraints,
                    attempt,
                    last_verdict,
                    inferred_total,
                ));
            }

            debug!(
                law = law.name(),
                attempt,
                constraints = ?novel,
                "merging inferred constraints"
            );
            applied.extend(novel.iter().cloned());
            inferred_total.extend(novel);
            grammar_override = Some(base.add_constraints(applied.iter().cloned()));
        }

        // The budget arm above returns on the final attempt
        Ok(finish(
            CellStatus::Failed,
            StopReason::MaxAttemptsReached,
            budget,
            last_verdict,
            inferred_total,
        ))
    }
}
