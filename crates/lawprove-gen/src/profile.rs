//! Per-function generation profiles
//!
//! A [`FunctionProfile`] is a registered function together with its resolved
//! grammar configuration and tuple parser (defaults or per-function
//! overrides). The input generator works on profiles only; override
//! resolution happens at configuration time.

use crate::parser::TupleParser;
use lawprove_core::{FunctionSpec, GrammarConfig};
use std::sync::Arc;

/// A wrapped function with its resolved generation grammar and parser
#[derive(Debug, Clone)]
pub struct FunctionProfile {
    /// The wrapped function
    pub spec: Arc<FunctionSpec>,
    /// Grammar configuration used to generate this function's inputs
    pub grammar: GrammarConfig,
    /// How generated derivations become this function's input tuples
    pub parser: TupleParser,
}

impl FunctionProfile {
    /// Bundle a wrapped function with its generation grammar and parser
    pub fn new(spec: Arc<FunctionSpec>, grammar: GrammarConfig, parser: TupleParser) -> Self {
        Self {
            spec,
            grammar,
            parser,
        }
    }

    /// Registered name of the function
    pub fn name(&self) -> &str {
        self.spec.name()
    }
}
