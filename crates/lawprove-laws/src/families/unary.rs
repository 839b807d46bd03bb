//! Unary family: idempotence, fixed points, involution, type preservation

use super::{lift, show, show_args, usable};
use lawprove_core::{CaseRecorder, CombinedFunction, Converted, CoreError, LawVerdict, Value};

/// `f(f(x)) == f(x)`
pub(crate) fn idempotence(
    law: &str,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let f = combined.function_names().remove(0);
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, 1) {
        let x = &tuple[0];
        let fx = combined.call_converted(0, &lift(&[x.clone()]))?;
        let ffx = combined.call_converted(0, &[fx.clone()])?;
        let passed = combined.compare_results(&ffx, &fx);
        let evidence = if passed {
            format!("{}({}({})) = {} = {}({})", f, f, x, show(&fx), f, x)
        } else {
            format!(
                "{}({}({})) = {} != {} = {}({})",
                f,
                f,
                x,
                show(&ffx),
                show(&fx),
                f,
                x
            )
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}

/// The result equals the argument at `position`; the call is made twice to
/// rule out transient nondeterminism
pub(crate) fn fixed_point(
    law: &str,
    position: usize,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let f = combined.function_names().remove(0);
    let arity = position + 1;
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, arity) {
        let target: Converted = Ok(tuple[position].clone());
        let first = combined.call_converted(0, &lift(tuple))?;
        let second = combined.call_converted(0, &lift(tuple))?;
        let passed = combined.compare_results(&first, &target)
            && combined.compare_results(&second, &target);
        let evidence = if passed {
            format!(
                "{}({}) = {} reproduces argument {}",
                f,
                show_args(tuple),
                show(&first),
                position
            )
        } else {
            format!(
                "{}({}) = {} (then {}) != argument {} = {}",
                f,
                show_args(tuple),
                show(&first),
                show(&second),
                position,
                tuple[position]
            )
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}

/// `f(f(x)) == x`, with the inner result substituted at `position`
pub(crate) fn involution(
    law: &str,
    position: usize,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let f = combined.function_names().remove(0);
    let arity = position + 1;
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, arity) {
        let inner = combined.call_converted(0, &lift(tuple))?;
        let mut outer_args = lift(tuple);
        outer_args[position] = inner;
        let outer = combined.call_converted(0, &outer_args)?;
        let target: Converted = Ok(tuple[position].clone());
        let passed = combined.compare_results(&outer, &target);
        let evidence = if passed {
            format!("{}({}({})) = {}", f, f, show_args(tuple), tuple[position])
        } else {
            format!(
                "{}({}({})) = {} != {}",
                f,
                f,
                show_args(tuple),
                show(&outer),
                tuple[position]
            )
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}

/// The converted input and the result share the same runtime category
pub(crate) fn type_preservation(
    law: &str,
    combined: &CombinedFunction,
    inputs: &[Vec<Value>],
    cap: usize,
) -> Result<LawVerdict, CoreError> {
    let f = combined.function_names().remove(0);
    let mut recorder = CaseRecorder::new(law, cap);

    for tuple in usable(inputs, 1) {
        let converted = combined.convert_args(0, tuple)?;
        let result = combined.call_converted(0, &lift(tuple))?;
        let (passed, evidence) = match (&converted[0], &result) {
            (Ok(input), Ok(output)) => {
                let same = input.kind() == output.kind();
                let evidence = if same {
                    format!("{}({}) = {} keeps {:?}", f, input, output, input.kind())
                } else {
                    format!(
                        "{}({}) = {} maps {:?} to {:?}",
                        f,
                        input,
                        output,
                        input.kind(),
                        output.kind()
                    )
                };
                (same, evidence)
            }
            (input, output) => (
                false,
                format!("{}({}) = {}", f, show(input), show(output)),
            ),
        };
        recorder.record(tuple.to_vec(), passed, evidence);
    }

    Ok(recorder.finish())
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Law, LawKind};
    use lawprove_core::{CombinedFunction, ComparisonStrategy, FunctionSpec, Value};
    use std::sync::Arc;

    fn unary(name: &str, op: fn(i64) -> i64) -> CombinedFunction {
        CombinedFunction::new(
            vec![Arc::new(FunctionSpec::plain(
                name,
                1,
                Arc::new(move |args: &[Value]| Value::Int(op(args[0].as_i64().unwrap_or(0)))),
            ))],
            ComparisonStrategy::Consensus,
        )
    }

    fn singles(values: &[i64]) -> Vec<Vec<Value>> {
        values.iter().map(|v| vec![Value::Int(*v)]).collect()
    }

    #[test]
    fn test_abs_is_idempotent() {
        let law = Law::from_kind(LawKind::Idempotence);
        let verdict = law
            .evaluate(&unary("abs", i64::abs), &singles(&[-3, 4, 0]), 10)
            .unwrap();
        assert!(verdict.holds, "{:?}", verdict.counterexamples);
    }

    #[test]
    fn test_increment_is_not_idempotent() {
        let law = Law::from_kind(LawKind::Idempotence);
        let verdict = law
            .evaluate(&unary("inc", |x| x + 1), &singles(&[1]), 10)
            .unwrap();
        assert!(!verdict.holds);
        assert!(verdict.counterexamples[0].contains("inc(inc(1)) = 3 != 2"));
    }

    #[test]
    fn test_identity_has_fixed_points() {
        let law = Law::from_kind(LawKind::FixedPoint { position: 0 });
        let verdict = law
            .evaluate(&unary("id", |x| x), &singles(&[1, -5]), 10)
            .unwrap();
        assert!(verdict.holds);
    }

    #[test]
    fn test_negate_has_only_zero_fixed_point() {
        let law = Law::from_kind(LawKind::FixedPoint { position: 0 });
        let verdict = law
            .evaluate(&unary("neg", |x| -x), &singles(&[3]), 10)
            .unwrap();
        assert!(!verdict.holds);
    }

    #[test]
    fn test_negate_is_an_involution() {
        let law = Law::from_kind(LawKind::Involution { position: 0 });
        let verdict = law
            .evaluate(&unary("neg", |x| -x), &singles(&[3, -7, 0]), 10)
            .unwrap();
        assert!(verdict.holds, "{:?}", verdict.counterexamples);
    }

    #[test]
    fn test_abs_is_not_an_involution() {
        let law = Law::from_kind(LawKind::Involution { position: 0 });
        let verdict = law
            .evaluate(&unary("abs", i64::abs), &singles(&[-2]), 10)
            .unwrap();
        assert!(!verdict.holds);
    }

    #[test]
    fn test_int_function_preserves_type() {
        let law = Law::from_kind(LawKind::TypePreservation);
        let verdict = law
            .evaluate(&unary("double", |x| 2 * x), &singles(&[1, 2]), 10)
            .unwrap();
        assert!(verdict.holds);
    }

    #[test]
    fn test_type_changing_function_fails() {
        let to_text = CombinedFunction::new(
            vec![Arc::new(FunctionSpec::plain(
                "stringify",
                1,
                Arc::new(|args: &[Value]| Value::Text(args[0].to_string())),
            ))],
            ComparisonStrategy::Consensus,
        );
        let law = Law::from_kind(LawKind::TypePreservation);
        let verdict = law.evaluate(&to_text, &singles(&[1]), 10).unwrap();
        assert!(!verdict.holds);
    }
}
