//! Element-search family: identity and absorbing elements
//!
//! These laws quantify existentially over a distinguished element drawn from
//! the observed input values: the law holds when at least one candidate
//! satisfies the side-dependent equation on every usable input. Statistics
//! count candidate trials; traces record the per-input checks of the best
//! candidate so the feedback loop sees concrete input evidence.

use super::{lift, usable};
use crate::catalog::ElementSide;
use lawprove_core::{
    CaseRecorder, CombinedFunction, Converted, CoreError, ExecutionTrace, LawVerdict, Value,
};

/// Collect the distinct values appearing anywhere in the usable inputs
fn candidate_elements(tuples: &[&[Value]]) -> Vec<Value> {
    let mut candidates: Vec<Value> = Vec::new();
    for tuple in tuples {
        for value in *tuple {
            if !candidates.contains(value) {
                candidates.push(value.clone());
            }
        }
    }
    candidates
}

/// The side-dependent identity check: `f(x, e) == x`, `f(e, x) == x`, or both
fn identity_check(
    combined: &CombinedFunction,
    x: &Value,
    e: &Value,
    side: ElementSide,
) -> Result<bool, CoreError> {
    let target: Converted = Ok(x.clone());
    let right = || -> Result<bool, CoreError> {
        let r = combined.call_converted(0, &lift(&[x.clone(), e.clone()]))?;
        Ok(combined.compare_results(&r, &target))
    };
    let left = || -> Result<bool, CoreError> {
        let r = combined.call_converted(0, &lift(&[e.clone(), x.clone()]))?;
        Ok(combined.compare_results(&r, &target))
    };
    match side {
        ElementSide::Right => right(),
        ElementSide::Left => left(),
        ElementSide::Both => Ok(left()? && right()?),
    }
}

/// The side-dependent absorbing check: `f(z, x) == z`, `f(x, z) == z`, or both
fn absorbing_check(
    combined: &CombinedFunction,
    x: &Value,
    z: &Value,
    side: ElementSide,
) -> Result<bool, CoreError> {
    let target: Converted = Ok(z.clone());
    let left = || -> Result<bool, CoreError> {
        let r = combined.call_converted(0, &lift(&[z.clone(), x.clone()]))?;
        Ok(combined.compare_results(&r, &target))
    };
    let right = || -> Result<bool, CoreError> {
        let r = combined.call_converted(0, &lift(&[x.clone(), z.clone()]))?;
        Ok(combined.compare_results(&r, &target))
    };
    match side {
        ElementSide::Left => left(),
        ElementSide::Right => right(),
        ElementSide::Both => Ok(left()? && right()?),
    }
}

fn search(
    law: &str,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
    element_word: &str,
    check: impl Fn(&CombinedFunction, &Value, &Value) -> Result<bool, CoreError>,
) -> Result<LawVerdict, CoreError> {
    let tuples = usable(inputs, 2);
    let f = combined.function_names().remove(0);
    let mut recorder = CaseRecorder::new(law, cap);

    let candidates = candidate_elements(&tuples);
    let mut best_checks: Vec<ExecutionTrace> = Vec::new();
    let mut best_passes = 0usize;
    let mut any_element = false;

    for e in &candidates {
        let mut checks = Vec::with_capacity(tuples.len());
        let mut passes = 0usize;
        let mut first_failure: Option<String> = None;

        for tuple in &tuples {
            let x = &tuple[0];
            let ok = check(combined, x, e)?;
            if ok {
                passes += 1;
            } else if first_failure.is_none() {
                first_failure = Some(format!(
                    "{} = {}: fails on {}({}, {})",
                    element_word, e, f, x, e
                ));
            }
            checks.push(ExecutionTrace::new(
                vec![x.clone(), e.clone()],
                ok,
                law.to_string(),
            ));
        }

        let all_ok = passes == tuples.len() && !tuples.is_empty();
        any_element |= all_ok;
        if passes > best_passes || best_checks.is_empty() {
            best_passes = passes;
            best_checks = checks;
        }

        let evidence = if all_ok {
            format!("{} = {} satisfies the law for {}", element_word, e, f)
        } else {
            first_failure.unwrap_or_else(|| format!("{} = {} fails", element_word, e))
        };
        recorder.record(vec![e.clone()], all_ok, evidence);
    }

    let mut verdict = recorder.finish();
    if verdict.is_input_starved() {
        return Ok(verdict);
    }
    // Existential law: one satisfying element is enough
    verdict.holds = any_element;
    verdict.traces = best_checks;
    Ok(verdict)
}

/// Search for an identity element of the combination's first function
pub(crate) fn identity_element(
    law: &str,
    side: ElementSide,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    search(law, combined, inputs, cap, "e", |c, x, e| {
        identity_check(c, x, e, side)
    })
}

/// Search for an absorbing element of the combination's first function
pub(crate) fn absorbing_element(
    law: &str,
    side: ElementSide,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    search(law, combined, inputs, cap, "z", |c, x, z| {
        absorbing_check(c, x, z, side)
    })
}
