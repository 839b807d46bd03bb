//! Binary-equation family: commutativity, associativity, distributivity, and
//! operand-dominance (left/right/full idempotence) laws

use super::{lift, show, usable};
use crate::catalog::{DistributivitySide, LawKind};
use lawprove_core::{CaseRecorder, CombinedFunction, CoreError, LawVerdict, Value};

/// `f(a, b) == f(b, a)`
pub(crate) fn commutativity(
    law: &str,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let f = combined.function_names().remove(0);
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, 2) {
        let (a, b) = (&tuple[0], &tuple[1]);
        let left = combined.call_converted(0, &lift(&[a.clone(), b.clone()]))?;
        let right = combined.call_converted(0, &lift(&[b.clone(), a.clone()]))?;
        let passed = combined.compare_results(&left, &right);
        let evidence = if passed {
            format!("{}({}, {}) = {} in both orders", f, a, b, show(&left))
        } else {
            format!(
                "{}({}, {}) = {} != {} = {}({}, {})",
                f,
                a,
                b,
                show(&left),
                show(&right),
                f,
                b,
                a
            )
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}

/// `f(a, g(b, c)) == f(g(a, b), c)` over two functions
pub(crate) fn associativity(
    law: &str,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let names = combined.function_names();
    let (f, g) = (&names[0], &names[1]);
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, 3) {
        let (a, b, c) = (&tuple[0], &tuple[1], &tuple[2]);
        let inner_right = combined.call_converted(1, &lift(&[b.clone(), c.clone()]))?;
        let left = combined.call_converted(0, &[Ok(a.clone()), inner_right])?;
        let inner_left = combined.call_converted(1, &lift(&[a.clone(), b.clone()]))?;
        let right = combined.call_converted(0, &[inner_left, Ok(c.clone())])?;
        let passed = combined.compare_results(&left, &right);
        let evidence = if passed {
            format!(
                "{}({}, {}({}, {})) = {} = {}({}({}, {}), {})",
                f,
                a,
                g,
                b,
                c,
                show(&left),
                f,
                g,
                a,
                b,
                c
            )
        } else {
            format!(
                "{}({}, {}({}, {})) = {} != {} = {}({}({}, {}), {})",
                f,
                a,
                g,
                b,
                c,
                show(&left),
                show(&right),
                f,
                g,
                a,
                b,
                c
            )
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}

/// Distributive law of `f` over `g`, in the requested direction(s)
pub(crate) fn distributivity(
    law: &str,
    side: DistributivitySide,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let names = combined.function_names();
    let (f, g) = (names[0].clone(), names[1].clone());
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, 3) {
        let (a, b, c) = (&tuple[0], &tuple[1], &tuple[2]);

        // f(a, g(b, c)) == g(f(a, b), f(a, c))
        let left_side = |combined: &CombinedFunction| -> Result<(bool, String), CoreError> {
            let gbc = combined.call_converted(1, &lift(&[b.clone(), c.clone()]))?;
            let lhs = combined.call_converted(0, &[Ok(a.clone()), gbc])?;
            let fab = combined.call_converted(0, &lift(&[a.clone(), b.clone()]))?;
            let fac = combined.call_converted(0, &lift(&[a.clone(), c.clone()]))?;
            let rhs = combined.call_converted(1, &[fab, fac])?;
            let ok = combined.compare_results(&lhs, &rhs);
            Ok((
                ok,
                format!(
                    "{}({}, {}({}, {})) = {} vs {} = {}({}(..), {}(..))",
                    f,
                    a,
                    g,
                    b,
                    c,
                    show(&lhs),
                    show(&rhs),
                    g,
                    f,
                    f
                ),
            ))
        };

        // f(g(b, c), a) == g(f(b, a), f(c, a))
        let right_side = |combined: &CombinedFunction| -> Result<(bool, String), CoreError> {
            let gbc = combined.call_converted(1, &lift(&[b.clone(), c.clone()]))?;
            let lhs = combined.call_converted(0, &[gbc, Ok(a.clone())])?;
            let fba = combined.call_converted(0, &lift(&[b.clone(), a.clone()]))?;
            let fca = combined.call_converted(0, &lift(&[c.clone(), a.clone()]))?;
            let rhs = combined.call_converted(1, &[fba, fca])?;
            let ok = combined.compare_results(&lhs, &rhs);
            Ok((
                ok,
                format!(
                    "{}({}({}, {}), {}) = {} vs {} = {}({}(..), {}(..))",
                    f,
                    g,
                    b,
                    c,
                    a,
                    show(&lhs),
                    show(&rhs),
                    g,
                    f,
                    f
                ),
            ))
        };

        let (passed, evidence) = match side {
            DistributivitySide::Left => left_side(combined)?,
            DistributivitySide::Right => right_side(combined)?,
            DistributivitySide::Both => {
                let (left_ok, left_ev) = left_side(combined)?;
                let (right_ok, right_ev) = right_side(combined)?;
                if left_ok {
                    (right_ok, right_ev)
                } else {
                    (false, left_ev)
                }
            }
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}

/// Operand dominance under repeated application: left, right, or full
pub(crate) fn dominance(
    law: &str,
    kind: LawKind,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let f = combined.function_names().remove(0);
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, 2) {
        let (a, b) = (&tuple[0], &tuple[1]);
        let base = combined.call_converted(0, &lift(&[a.clone(), b.clone()]))?;

        let (repeated, shape) = match kind {
            LawKind::LeftIdempotence => (
                combined.call_converted(0, &[base.clone(), Ok(b.clone())])?,
                format!("{f}({f}({a}, {b}), {b})"),
            ),
            LawKind::RightIdempotence => (
                combined.call_converted(0, &[Ok(a.clone()), base.clone()])?,
                format!("{f}({a}, {f}({a}, {b}))"),
            ),
            _ => (
                combined.call_converted(0, &[base.clone(), base.clone()])?,
                format!("{f}({f}({a}, {b}), {f}({a}, {b}))"),
            ),
        };

        let passed = combined.compare_results(&repeated, &base);
        let evidence = if passed {
            format!("{} = {} = {}({}, {})", shape, show(&base), f, a, b)
        } else {
            format!(
                "{} = {} != {} = {}({}, {})",
                shape,
                show(&repeated),
                show(&base),
                f,
                a,
                b
            )
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}
