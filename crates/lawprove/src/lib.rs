// Crate-level lint configuration for pedantic clippy
#![allow(clippy::must_use_candidate)] // API methods don't need must_use
#![allow(clippy::missing_const_for_fn)] // const fn optimization is minor
#![allow(clippy::use_self)] // Self vs TypeName - style preference
#![allow(clippy::doc_markdown)] // Missing backticks - low priority
#![allow(clippy::missing_errors_doc)] // Error docs are implementation details
#![allow(clippy::cast_precision_loss)] // counts to f64 for percentages is intentional
#![allow(clippy::uninlined_format_args)] // Named args are clearer
#![allow(clippy::return_self_not_must_use)] // Builder methods don't need must_use
#![allow(clippy::too_many_lines)] // Drive loops enumerate their states

//! LawProve: adaptive algebraic-law checking for black-box functions
//!
//! This is the facade crate tying the platform together: the configuration
//! builder, the orchestrating engines, and the run reports. An engine pairs
//! each selected law with every applicable function combination, generates
//! inputs through the external grammar service, and evaluates the law. When
//! the law fails and feedback is enabled, the engine infers new generation
//! constraints from the failing evidence and regenerates under the tightened
//! grammar until the law holds or the attempt budget runs out.
//!
//! # Example
//!
//! ```rust,no_run
//! use lawprove::{Engine, EngineConfig, FunctionSpec, GrammarConfig, GrammarSource,
//!     HttpDerivationService, TupleParser, Value};
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rules = BTreeMap::new();
//! rules.insert("start".into(), vec!["<n> <m>".into()]);
//! rules.insert("n".into(), vec!["<digit>".into()]);
//! rules.insert("m".into(), vec!["<digit>".into()]);
//! let grammar = GrammarConfig::new(GrammarSource::new("pairs", "start", rules));
//!
//! let config = EngineConfig::new(grammar, TupleParser::Symbol("digit".into()))
//!     .register_function(FunctionSpec::plain(
//!         "add",
//!         2,
//!         Arc::new(|args: &[Value]| {
//!             Value::Int(args[0].as_i64().unwrap_or(0) + args[1].as_i64().unwrap_or(0))
//!         }),
//!     ))?
//!     .select_law("commutativity")?;
//!
//! let service = Arc::new(HttpDerivationService::new("http://127.0.0.1:8500"));
//! let results = Engine::new(config, service).run().await?;
//! println!("{}", lawprove::render_report(&results));
//! # Ok(())
//! # }
//! ```

pub mod adaptive;
pub mod config;
pub mod engine;
pub mod outcome;
pub mod report;

pub use adaptive::AdaptiveEngine;
pub use config::{EngineConfig, GrammarSpec};
pub use engine::{novel_constraints, Engine};
pub use outcome::{
    CellResult, CellStatus, IterationRecord, RunResults, RunSummary, StopReason,
};
pub use report::render_report;

// Re-export the vocabulary types so most callers need only this crate
pub use lawprove_core::{
    equality_comparator, identity_converter, int_converter, ArgConverter, Callable, CaseStats,
    CombinedFunction, CompareFailure, ComparisonStrategy, ConstraintError, ConversionFailure,
    Converted, CoreError, ExecutionTrace, FunctionSpec, GrammarConfig, GrammarSource, LawVerdict,
    ResultComparator, Value, ValueKind,
};
pub use lawprove_gen::{
    DerivationService, DerivationTree, FunctionProfile, GenError, GenerationRequest,
    HttpDerivationService, InputGenerator, TupleExtraction, TupleParser,
};
pub use lawprove_infer::{
    BootstrapCommand, ConstraintModel, ExternalProcessModel, HealthPolicy, InferError,
    InferenceEngine, InferenceReport, LlmClient, LlmConfig, LlmError, LlmResponse, PromptedModel,
    RuleBasedModel, ServiceHealth, TextCompletionClient,
};
pub use lawprove_laws::{
    CompositionSide, DistributivitySide, ElementSide, Evaluator, Law, LawCategory, LawError,
    LawKind, LawRegistry,
};

use thiserror::Error;

/// Errors from engine configuration and runs
#[derive(Error, Debug)]
pub enum EngineError {
    /// A function was registered under a name that already exists
    #[error("Function {0:?} is already registered")]
    DuplicateFunction(String),

    /// An override names a function that was never registered
    #[error("No registered function named {0:?}")]
    UnknownFunction(String),

    /// A grammar override names a generation source that was never registered
    #[error("No registered grammar source named {0:?}")]
    UnknownSource(String),

    /// A cap was configured with a value that cannot drive a run
    #[error("Invalid {name}: {value} (must be at least 1)")]
    InvalidCap {
        /// Name of the offending setting
        name: &'static str,
        /// The rejected value
        value: usize,
    },

    /// Law selection or registration failed
    #[error(transparent)]
    Law(#[from] LawError),

    /// A registration-time constraint failed the syntactic gate
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// A law evaluation failed structurally
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The input-generation boundary failed
    #[error(transparent)]
    Generation(#[from] GenError),

    /// A constraint-inference round failed
    #[error(transparent)]
    Inference(#[from] InferError),
}
