//! Relational family: injectivity and determinism

use super::{lift, show, show_args, usable};
use lawprove_core::{CaseRecorder, CombinedFunction, Converted, CoreError, LawVerdict, Value};

/// Distinct converted inputs must never produce results that compare equal
pub(crate) fn injectivity(
    law: &str,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let f = combined.function_names().remove(0);
    let mut recorder = CaseRecorder::new(law, cap);

    // (converted input, result) pairs seen so far
    let mut seen: Vec<(Vec<Converted>, Converted, String)> = Vec::new();

    for tuple in usable(inputs, 1) {
        let converted = combined.convert_args(0, tuple)?;
        let result = combined.call_converted(0, &lift(tuple))?;
        let rendered = show_args(tuple);

        let mut passed = true;
        let mut evidence = format!("{}({}) = {} is distinct", f, rendered, show(&result));
        for (prev_input, prev_result, prev_rendered) in &seen {
            if *prev_input != converted && combined.compare_results(&result, prev_result) {
                passed = false;
                evidence = format!(
                    "{}({}) = {} = {}({}) for distinct inputs",
                    f,
                    rendered,
                    show(&result),
                    f,
                    prev_rendered
                );
                break;
            }
        }

        seen.push((converted, result, rendered));
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}

/// The same call repeated `runs` times must agree with the first run; the
/// first divergent run index is reported
pub(crate) fn determinism(
    law: &str,
    runs: usize,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let f = combined.function_names().remove(0);
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, 1) {
        let first = combined.call_converted(0, &lift(tuple))?;
        let mut divergent: Option<(usize, Converted)> = None;
        for run in 1..runs.max(1) {
            let repeat = combined.call_converted(0, &lift(tuple))?;
            if !combined.compare_results(&repeat, &first) {
                divergent = Some((run, repeat));
                break;
            }
        }

        let (passed, evidence) = match divergent {
            None => (
                true,
                format!(
                    "{}({}) = {} across {} runs",
                    f,
                    show_args(tuple),
                    show(&first),
                    runs
                ),
            ),
            Some((run, other)) => (
                false,
                format!(
                    "{}({}) diverged at run {}: {} != {}",
                    f,
                    show_args(tuple),
                    run,
                    show(&other),
                    show(&first)
                ),
            ),
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}
