// Crate-level lint configuration for pedantic clippy
#![allow(clippy::must_use_candidate)] // API methods don't need must_use
#![allow(clippy::missing_const_for_fn)] // const fn optimization is minor
#![allow(clippy::use_self)] // Self vs TypeName - style preference
#![allow(clippy::doc_markdown)] // Missing backticks - low priority
#![allow(clippy::missing_errors_doc)] // Error docs are implementation details
#![allow(clippy::uninlined_format_args)] // Named args are clearer

//! Input generation boundary for LawProve
//!
//! The external grammar-based generator is consumed here, never
//! reimplemented: given a generation source, extra boolean constraints, and a
//! desired count, it returns syntactically valid derivations and parses
//! rendered items back into structured trees. Everything downstream of this
//! crate operates on plain value tuples.
//!
//! The [`InputGenerator`] memoizes parsed tuples per function combination for
//! the duration of one engine run. The cache is bypassed entirely whenever a
//! grammar override (e.g. from the constraint-feedback loop) is supplied,
//! because cached inputs would not reflect the new constraints.

pub mod client;
pub mod generator;
pub mod parser;
pub mod profile;
pub mod tree;

pub use client::{DerivationService, GenerationRequest, HttpDerivationService};
pub use generator::InputGenerator;
pub use parser::{TupleExtraction, TupleParser};
pub use profile::FunctionProfile;
pub use tree::DerivationTree;

use thiserror::Error;

/// Errors from the generation boundary
#[derive(Error, Debug)]
pub enum GenError {
    /// The generator service rejected or failed a request
    #[error("Generator request failed: {0}")]
    RequestFailed(String),

    /// The generator service response could not be decoded
    #[error("Failed to decode generator response: {0}")]
    DecodeError(String),

    /// Transport-level failure talking to the generator service
    #[error("Generator transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for GenError {
    fn from(err: reqwest::Error) -> Self {
        GenError::Transport(err.to_string())
    }
}
