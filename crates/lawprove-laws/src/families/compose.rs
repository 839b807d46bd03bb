//! Composition family: a composed pair must reduce to one of its members

use super::{lift, show, usable};
use crate::catalog::CompositionSide;
use lawprove_core::{CaseRecorder, CombinedFunction, CoreError, LawVerdict, Value};

/// `f(g(x))` must equal `f(x)` (left) or `g(x)` (right)
pub(crate) fn composition(
    law: &str,
    side: CompositionSide,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let names = combined.function_names();
    let (f, g) = (&names[0], &names[1]);
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, 1) {
        let x = &tuple[0];
        let gx = combined.call_converted(1, &lift(&[x.clone()]))?;
        let fgx = combined.call_converted(0, &[gx.clone()])?;
        let (target, target_shape) = match side {
            CompositionSide::Left => (
                combined.call_converted(0, &lift(&[x.clone()]))?,
                format!("{}({})", f, x),
            ),
            CompositionSide::Right => (gx, format!("{}({})", g, x)),
        };
        let passed = combined.compare_results(&fgx, &target);
        let evidence = if passed {
            format!("{}({}({})) = {} = {}", f, g, x, show(&fgx), target_shape)
        } else {
            format!(
                "{}({}({})) = {} != {} = {}",
                f,
                g,
                x,
                show(&fgx),
                show(&target),
                target_shape
            )
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}
