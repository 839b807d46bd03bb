// Crate-level lint configuration for pedantic clippy
#![allow(clippy::must_use_candidate)] // API methods don't need must_use
#![allow(clippy::missing_const_for_fn)] // const fn optimization is minor
#![allow(clippy::use_self)] // Self vs TypeName - style preference
#![allow(clippy::doc_markdown)] // Missing backticks - low priority
#![allow(clippy::missing_errors_doc)] // Error docs are implementation details
#![allow(clippy::match_same_arms)] // Sometimes clarity > deduplication
#![allow(clippy::uninlined_format_args)] // Named args are clearer
#![allow(clippy::too_many_lines)] // Family evaluators enumerate their cases

//! Algebraic law catalog for LawProve
//!
//! Each law is a stateless, canonically keyed [`Law`] value: a [`LawKind`]
//! selects the family, and each family is one evaluation function
//! parameterized by the varying slots (swap positions, element side, run
//! count) rather than a subclass hierarchy. Two laws configured identically
//! compare equal and hash equal.
//!
//! The [`LawRegistry`] constructs every catalog law once and serves lookups
//! by name and category; the [`Evaluator`] is the stateless pass-through that
//! runs a law and re-bounds its evidence lists to the caller's cap.

pub mod catalog;
pub mod evaluator;
pub mod families;
pub mod registry;

pub use catalog::{CompositionSide, DistributivitySide, ElementSide, Law, LawCategory, LawKind};
pub use evaluator::Evaluator;
pub use registry::{LawRegistry, DEFAULT_DETERMINISM_RUNS};

use thiserror::Error;

/// Errors from catalog and registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LawError {
    /// A law name was requested that the registry does not know
    #[error("Unknown law: {0}")]
    UnknownLaw(String),

    /// A law was registered under a name that already exists
    #[error("Duplicate law name: {0}")]
    DuplicateLaw(String),
}
