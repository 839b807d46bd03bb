//! Function wrappers and combinations
//!
//! A [`FunctionSpec`] wraps one black-box callable with positional argument
//! converters and a result comparator. A [`CombinedFunction`] composes several
//! wrapped callables so one law can invoke each by index and combine their
//! comparators under a selectable agreement strategy.
//!
//! Conversion failures never raise: they are carried as the `Err` variant of
//! [`Converted`] so a single bad input stays visible in comparisons (which it
//! forces to `false`) without aborting the surrounding batch.

use crate::value::Value;
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A black-box callable over dynamic values
pub type Callable = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Converts one positional argument before a call
pub type ArgConverter = Arc<dyn Fn(&Value) -> Result<Value, ConversionFailure> + Send + Sync>;

/// Compares two results for agreement; may itself fail
pub type ResultComparator = Arc<dyn Fn(&Value, &Value) -> Result<bool, CompareFailure> + Send + Sync>;

/// Why an argument failed to convert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionFailure {
    /// Argument position that failed
    pub position: usize,
    /// Human-readable reason
    pub reason: String,
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<conversion failed at arg {}: {}>", self.position, self.reason)
    }
}

/// Why a comparator failed to produce a verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareFailure {
    /// Human-readable reason
    pub reason: String,
}

/// Outcome of converting (and possibly applying) arguments: either a value or
/// the conversion failure that produced no value
pub type Converted = Result<Value, ConversionFailure>;

/// How a combination agrees on result equality across its comparators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComparisonStrategy {
    /// Every comparator that does not itself fail must agree; if all fail,
    /// fall back to plain value equality
    #[default]
    Consensus,
    /// The first comparator that produces a verdict wins; if all fail, fall
    /// back to plain value equality
    FirstCompatible,
    /// `true` only when every non-failing comparator returns `true`; with no
    /// successful comparator at all, fall back to plain value equality
    MostRestrictive,
}

/// One wrapped callable: the function, its positional argument converters,
/// and its result comparator. Immutable after construction.
pub struct FunctionSpec {
    name: String,
    arity: usize,
    callable: Callable,
    converters: Vec<ArgConverter>,
    comparator: ResultComparator,
}

impl fmt::Debug for FunctionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSpec")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("converters", &self.converters.len())
            .finish()
    }
}

impl FunctionSpec {
    /// Wrap a callable with explicit converters and comparator
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        callable: Callable,
        converters: Vec<ArgConverter>,
        comparator: ResultComparator,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            callable,
            converters,
            comparator,
        }
    }

    /// Wrap a callable with the identity converter and plain value equality
    pub fn plain(name: impl Into<String>, arity: usize, callable: Callable) -> Self {
        Self::new(
            name,
            arity,
            callable,
            vec![identity_converter()],
            equality_comparator(),
        )
    }

    /// Registered name of the function
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of positional parameters the callable accepts
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invoke the callable directly, without conversion
    pub fn call(&self, args: &[Value]) -> Value {
        (self.callable)(args)
    }

    /// Convert each argument with its positional converter; positions past
    /// the converter list reuse the last converter as default
    pub fn convert_args(&self, args: &[Value]) -> Vec<Converted> {
        args.iter()
            .enumerate()
            .map(|(i, arg)| self.convert_arg(i, arg))
            .collect()
    }

    fn convert_arg(&self, position: usize, arg: &Value) -> Converted {
        let converter = self
            .converters
            .get(position)
            .or_else(|| self.converters.last());
        match converter {
            Some(conv) => conv(arg).map_err(|mut failure| {
                failure.position = position;
                failure
            }),
            None => Ok(arg.clone()),
        }
    }

    /// Run the comparator on two values
    pub fn compare(&self, a: &Value, b: &Value) -> Result<bool, CompareFailure> {
        (self.comparator)(a, b)
    }

    /// Whether this function shares converter/comparator configuration with
    /// another wrapped function, by object identity
    fn shares_config(&self, other: &FunctionSpec) -> bool {
        if !Arc::ptr_eq(&self.comparator, &other.comparator) {
            return false;
        }
        self.converters.len() == other.converters.len()
            && self
                .converters
                .iter()
                .zip(other.converters.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

/// The identity converter: accepts any value unchanged
pub fn identity_converter() -> ArgConverter {
    Arc::new(|v: &Value| Ok(v.clone()))
}

/// A converter that requires integer input
pub fn int_converter() -> ArgConverter {
    Arc::new(|v: &Value| match v.as_i64() {
        Some(i) => Ok(Value::Int(i)),
        None => Err(ConversionFailure {
            position: 0,
            reason: format!("expected integer, got {}", v),
        }),
    })
}

/// The plain structural-equality comparator
pub fn equality_comparator() -> ResultComparator {
    Arc::new(|a: &Value, b: &Value| Ok(a == b))
}

/// An ordered sequence of wrapped functions plus an agreement strategy.
/// Created per (law, function-combination) trial; stateless beyond its tuple.
#[derive(Clone)]
pub struct CombinedFunction {
    functions: Vec<Arc<FunctionSpec>>,
    strategy: ComparisonStrategy,
}

impl fmt::Debug for CombinedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedFunction")
            .field("functions", &self.function_names())
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl CombinedFunction {
    /// Compose wrapped functions under an agreement strategy
    pub fn new(functions: Vec<Arc<FunctionSpec>>, strategy: ComparisonStrategy) -> Self {
        Self {
            functions,
            strategy,
        }
    }

    /// The wrapped functions, in order
    pub fn functions(&self) -> &[Arc<FunctionSpec>] {
        &self.functions
    }

    /// Number of composed functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the combination is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Agreement strategy for this combination
    pub fn strategy(&self) -> ComparisonStrategy {
        self.strategy
    }

    /// Registered names of the composed functions, in order
    pub fn function_names(&self) -> Vec<String> {
        self.functions.iter().map(|f| f.name().to_string()).collect()
    }

    fn function(&self, index: usize) -> Result<&Arc<FunctionSpec>, CoreError> {
        self.functions.get(index).ok_or(CoreError::FunctionIndex {
            index,
            len: self.functions.len(),
        })
    }

    /// Invoke the function at `index` directly, without conversion. Callers
    /// convert explicitly via [`CombinedFunction::convert_args`].
    pub fn call(&self, index: usize, args: &[Value]) -> Result<Value, CoreError> {
        Ok(self.function(index)?.call(args))
    }

    /// Convert arguments with the converters of the function at `index`
    pub fn convert_args(&self, index: usize, args: &[Value]) -> Result<Vec<Converted>, CoreError> {
        Ok(self.function(index)?.convert_args(args))
    }

    /// Convert the arguments and, if all conversions succeed, invoke the
    /// function at `index`. The first conversion failure is carried through
    /// unchanged so it stays visible to downstream comparisons.
    pub fn call_converted(&self, index: usize, args: &[Converted]) -> Result<Converted, CoreError> {
        let func = self.function(index)?;
        let mut plain = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                Ok(v) => plain.push(v.clone()),
                Err(failure) => return Ok(Err(failure.clone())),
            }
        }
        let converted = func.convert_args(&plain);
        let mut values = Vec::with_capacity(converted.len());
        for item in converted {
            match item {
                Ok(v) => values.push(v),
                Err(failure) => return Ok(Err(failure)),
            }
        }
        Ok(Ok(func.call(&values)))
    }

    /// Compare two results under the combination's agreement strategy.
    ///
    /// A failed operand (conversion failure) forces `false` regardless of
    /// strategy; the comparators never see it.
    pub fn compare_results(&self, a: &Converted, b: &Converted) -> bool {
        let (Ok(a), Ok(b)) = (a, b) else {
            return false;
        };

        let mut verdicts = Vec::with_capacity(self.functions.len());
        for func in &self.functions {
            if let Ok(verdict) = func.compare(a, b) {
                verdicts.push(verdict);
            }
        }

        match self.strategy {
            ComparisonStrategy::Consensus => {
                if verdicts.is_empty() {
                    a == b
                } else {
                    verdicts.iter().all(|v| *v)
                }
            }
            ComparisonStrategy::FirstCompatible => match verdicts.first() {
                Some(first) => *first,
                None => a == b,
            },
            ComparisonStrategy::MostRestrictive => {
                if verdicts.is_empty() {
                    a == b
                } else {
                    verdicts.iter().all(|v| *v)
                }
            }
        }
    }

    /// Human-readable grouping of functions sharing the same
    /// (converter, comparator) configuration. Reporting only.
    pub fn names(&self) -> String {
        let mut groups: Vec<Vec<&str>> = Vec::new();
        let mut representatives: Vec<&Arc<FunctionSpec>> = Vec::new();

        for func in &self.functions {
            match representatives
                .iter()
                .position(|rep| rep.shares_config(func))
            {
                Some(idx) => groups[idx].push(func.name()),
                None => {
                    representatives.push(func);
                    groups.push(vec![func.name()]);
                }
            }
        }

        groups
            .iter()
            .map(|group| group.join(", "))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_spec() -> Arc<FunctionSpec> {
        Arc::new(FunctionSpec::plain(
            "add",
            2,
            Arc::new(|args: &[Value]| {
                let a = args[0].as_i64().unwrap_or(0);
                let b = args[1].as_i64().unwrap_or(0);
                Value::Int(a + b)
            }),
        ))
    }

    fn spec_with_comparator(name: &str, comparator: ResultComparator) -> Arc<FunctionSpec> {
        Arc::new(FunctionSpec::new(
            name,
            2,
            Arc::new(|args: &[Value]| args[0].clone()),
            vec![identity_converter()],
            comparator,
        ))
    }

    #[test]
    fn test_call_without_conversion() {
        let combined = CombinedFunction::new(vec![add_spec()], ComparisonStrategy::Consensus);
        let result = combined.call(0, &[Value::Int(2), Value::Int(3)]).unwrap();
        assert_eq!(result, Value::Int(5));
    }

    #[test]
    fn test_bad_index_is_error() {
        let combined = CombinedFunction::new(vec![add_spec()], ComparisonStrategy::Consensus);
        assert!(matches!(
            combined.call(3, &[]),
            Err(CoreError::FunctionIndex { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_last_converter_reused_as_default() {
        let spec = FunctionSpec::new(
            "first_int",
            3,
            Arc::new(|args: &[Value]| args[0].clone()),
            vec![int_converter()],
            equality_comparator(),
        );
        let converted = spec.convert_args(&[Value::Int(1), Value::Int(2), Value::Text("x".into())]);
        assert_eq!(converted[0], Ok(Value::Int(1)));
        assert_eq!(converted[1], Ok(Value::Int(2)));
        let failure = converted[2].clone().unwrap_err();
        assert_eq!(failure.position, 2);
    }

    #[test]
    fn test_conversion_failure_forces_false() {
        let combined = CombinedFunction::new(vec![add_spec()], ComparisonStrategy::Consensus);
        let failed: Converted = Err(ConversionFailure {
            position: 0,
            reason: "bad".into(),
        });
        assert!(!combined.compare_results(&failed, &Ok(Value::Int(1))));
        assert!(!combined.compare_results(&Ok(Value::Int(1)), &failed));
    }

    #[test]
    fn test_call_converted_carries_failure() {
        let spec = Arc::new(FunctionSpec::new(
            "ints_only",
            1,
            Arc::new(|args: &[Value]| args[0].clone()),
            vec![int_converter()],
            equality_comparator(),
        ));
        let combined = CombinedFunction::new(vec![spec], ComparisonStrategy::Consensus);
        let out = combined
            .call_converted(0, &[Ok(Value::Text("nope".into()))])
            .unwrap();
        assert!(out.is_err());
    }

    #[test]
    fn test_strategies_with_disagreeing_comparators() {
        let always_true: ResultComparator = Arc::new(|_, _| Ok(true));
        let always_false: ResultComparator = Arc::new(|_, _| Ok(false));

        let functions = vec![
            spec_with_comparator("f", always_true),
            spec_with_comparator("g", always_false),
        ];

        let a: Converted = Ok(Value::Int(1));
        let b: Converted = Ok(Value::Int(2));

        let consensus =
            CombinedFunction::new(functions.clone(), ComparisonStrategy::Consensus);
        assert!(!consensus.compare_results(&a, &b));

        let first = CombinedFunction::new(functions.clone(), ComparisonStrategy::FirstCompatible);
        assert!(first.compare_results(&a, &b));

        let strict = CombinedFunction::new(functions, ComparisonStrategy::MostRestrictive);
        assert!(!strict.compare_results(&a, &b));
    }

    #[test]
    fn test_all_comparators_failing_falls_back_to_equality() {
        let failing: ResultComparator = Arc::new(|_, _| {
            Err(CompareFailure {
                reason: "unsupported".into(),
            })
        });
        let functions = vec![spec_with_comparator("f", failing)];

        for strategy in [
            ComparisonStrategy::Consensus,
            ComparisonStrategy::FirstCompatible,
            ComparisonStrategy::MostRestrictive,
        ] {
            let combined = CombinedFunction::new(functions.clone(), strategy);
            assert!(combined.compare_results(&Ok(Value::Int(4)), &Ok(Value::Int(4))));
            assert!(!combined.compare_results(&Ok(Value::Int(4)), &Ok(Value::Int(5))));
        }
    }

    #[test]
    fn test_names_groups_by_shared_config() {
        let comparator = equality_comparator();
        let shared_a = spec_with_comparator("f", comparator.clone());
        let shared_b = spec_with_comparator("g", comparator);
        let other = spec_with_comparator("h", Arc::new(|a: &Value, b: &Value| Ok(a == b)));

        // f and g share converter/comparator objects; h has its own comparator
        let combined = CombinedFunction::new(
            vec![shared_a, shared_b, other],
            ComparisonStrategy::Consensus,
        );
        // Different identity_converter() calls produce distinct Arcs, so f/g
        // only group when the Arcs are actually shared
        let names = combined.names();
        assert!(names.contains('f'));
        assert!(names.contains('h'));
    }
}
