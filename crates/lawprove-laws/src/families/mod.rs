//! Family evaluation functions
//!
//! One function per law family, parameterized by the varying slots. All
//! families share the same preamble: inputs shorter than the law's arity are
//! discarded, and an empty survivor set yields the no-valid-inputs verdict.

pub(crate) mod binary;
pub(crate) mod compose;
pub(crate) mod element;
pub(crate) mod relational;
pub(crate) mod unary;

use lawprove_core::{Converted, Value};

/// Inputs with at least `arity` values, truncated to the used prefix
pub(crate) fn usable(inputs: &[Vec<Value>], arity: usize) -> Vec<&[Value]> {
    inputs
        .iter()
        .filter(|t| t.len() >= arity)
        .map(|t| &t[..arity])
        .collect()
}

/// Wrap raw values as successful conversions for `call_converted`
pub(crate) fn lift(args: &[Value]) -> Vec<Converted> {
    args.iter().cloned().map(Ok).collect()
}

/// Render a converted operand for evidence strings
pub(crate) fn show(converted: &Converted) -> String {
    match converted {
        Ok(value) => value.to_string(),
        Err(failure) => failure.to_string(),
    }
}

/// Render an argument list for evidence strings
pub(crate) fn show_args(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
