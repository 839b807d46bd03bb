// Crate-level lint configuration for pedantic clippy
#![allow(clippy::must_use_candidate)] // API methods don't need must_use
#![allow(clippy::missing_const_for_fn)] // const fn optimization is minor
#![allow(clippy::use_self)] // Self vs TypeName - style preference
#![allow(clippy::doc_markdown)] // Missing backticks - low priority
#![allow(clippy::missing_errors_doc)] // Error docs are implementation details
#![allow(clippy::cast_precision_loss)] // i64 to f64 for tolerant comparison is intentional
#![allow(clippy::match_same_arms)] // Sometimes clarity > deduplication
#![allow(clippy::uninlined_format_args)] // Named args are clearer

//! Core data model for LawProve
//!
//! This crate defines the vocabulary shared by every other LawProve crate:
//!
//! - **Values**: the dynamic value model flowing through black-box functions
//! - **Function wrappers**: a callable plus positional argument converters and
//!   a result comparator; combinations of wrapped callables with an agreement
//!   strategy
//! - **Grammar configurations**: immutable generation-source descriptors with
//!   extra boolean constraints and a syntactic constraint gate
//! - **Verdicts**: bounded counterexample/success evidence, case statistics,
//!   and execution traces consumed by the constraint-inference feedback loop

pub mod function;
pub mod grammar;
pub mod value;
pub mod verdict;

pub use function::{
    equality_comparator, identity_converter, int_converter, ArgConverter, Callable,
    CombinedFunction, CompareFailure, ComparisonStrategy, ConversionFailure, Converted,
    FunctionSpec, ResultComparator,
};
pub use grammar::{ConstraintError, GrammarConfig, GrammarSource};
pub use value::{Value, ValueKind};
pub use verdict::{CaseRecorder, CaseStats, ExecutionTrace, LawVerdict, NO_VALID_INPUTS};

use thiserror::Error;

/// Errors from core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A combined function was indexed out of bounds
    #[error("No function at index {index} (combination holds {len})")]
    FunctionIndex {
        /// Requested index
        index: usize,
        /// Number of functions in the combination
        len: usize,
    },

    /// A constraint expression failed the syntactic gate
    #[error("Invalid constraint: {0}")]
    Constraint(#[from] ConstraintError),
}
