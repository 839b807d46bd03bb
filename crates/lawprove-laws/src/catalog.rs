//! The law catalog: tagged variants with family dispatch
//!
//! A [`Law`] is addressed by its construction parameters: building the same
//! kind twice yields values that compare equal and hash equal, which is what
//! the registry keys on.

use crate::families;
use lawprove_core::{CombinedFunction, CoreError, LawVerdict, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Which operand slot holds the distinguished element, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementSide {
    /// Element on the left: `f(e, x)`
    Left,
    /// Element on the right: `f(x, e)`
    Right,
    /// Both sides must satisfy the law
    Both,
}

impl ElementSide {
    fn label(self) -> &'static str {
        match self {
            ElementSide::Left => "left",
            ElementSide::Right => "right",
            ElementSide::Both => "two-sided",
        }
    }
}

/// Which side of the distributive law to check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributivitySide {
    /// `f(a, g(b, c)) == g(f(a, b), f(a, c))`
    Left,
    /// `f(g(b, c), a) == g(f(b, a), f(c, a))`
    Right,
    /// Both directions must hold
    Both,
}

/// Which function a composition must reduce to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositionSide {
    /// `f(g(x)) == f(x)`: the inner function is invisible to the outer
    Left,
    /// `f(g(x)) == g(x)`: the outer function is identity on the inner's range
    Right,
}

/// Coarse grouping used for registry lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LawCategory {
    /// Equational laws over one or two binary operations
    Algebraic,
    /// Shape-preserving and structure-revealing laws
    Structural,
    /// Laws about repeated execution
    Behavioral,
    /// Laws about composing functions
    Composition,
}

/// The family selector. Each variant carries the slots that vary within its
/// family; evaluation dispatches to one function per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LawKind {
    /// `f(a, b) == f(b, a)`
    Commutativity,
    /// `f(a, g(b, c)) == f(g(a, b), c)` over two functions
    Associativity,
    /// `f(f(x)) == f(x)` for unary functions
    Idempotence,
    /// `f(f(a, b), b) == f(a, b)`: the left operand dominates
    LeftIdempotence,
    /// `f(a, f(a, b)) == f(a, b)`: the right operand dominates
    RightIdempotence,
    /// `f(f(a, b), f(a, b)) == f(a, b)`
    FullIdempotence,
    /// Distributive law of `f` over `g`
    Distributivity(DistributivitySide),
    /// Some element `e` satisfies `f(x, e) == x` (side-dependent)
    IdentityElement(ElementSide),
    /// Some element `z` satisfies `f(z, x) == z` (side-dependent)
    AbsorbingElement(ElementSide),
    /// Distinct inputs never map to results that compare equal
    Injectivity,
    /// The result equals the argument at `position`, twice in a row
    FixedPoint {
        /// Argument slot the result must reproduce
        position: usize,
    },
    /// The same call repeated `runs` times always agrees with the first run
    Determinism {
        /// Number of repeated calls
        runs: usize,
    },
    /// Composing two functions reduces to one of them
    Composition(CompositionSide),
    /// `f(f(x)) == x` at a configurable argument slot
    Involution {
        /// Argument slot the double application must reproduce
        position: usize,
    },
    /// The converted input and the result share a runtime category
    TypePreservation,
}

/// A stateless law: the contract metadata plus the family selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Law {
    kind: LawKind,
    name: String,
    category: LawCategory,
    input_arity: usize,
    function_arity: usize,
    num_functions: usize,
    description: String,
}

impl PartialEq for Law {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Law {}

impl Hash for Law {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Law {
    /// Build the law for a kind, deriving name, category, arities, and
    /// description
    pub fn from_kind(kind: LawKind) -> Self {
        let (name, category, input_arity, function_arity, num_functions, description) = match kind
        {
            LawKind::Commutativity => (
                "commutativity".to_string(),
                LawCategory::Algebraic,
                2,
                2,
                1,
                "f(a, b) == f(b, a)".to_string(),
            ),
            LawKind::Associativity => (
                "associativity".to_string(),
                LawCategory::Algebraic,
                3,
                2,
                2,
                "f(a, g(b, c)) == f(g(a, b), c)".to_string(),
            ),
            LawKind::Idempotence => (
                "idempotence".to_string(),
                LawCategory::Algebraic,
                1,
                1,
                1,
                "f(f(x)) == f(x)".to_string(),
            ),
            LawKind::LeftIdempotence => (
                "left_idempotence".to_string(),
                LawCategory::Algebraic,
                2,
                2,
                1,
                "f(f(a, b), b) == f(a, b)".to_string(),
            ),
            LawKind::RightIdempotence => (
                "right_idempotence".to_string(),
                LawCategory::Algebraic,
                2,
                2,
                1,
                "f(a, f(a, b)) == f(a, b)".to_string(),
            ),
            LawKind::FullIdempotence => (
                "full_idempotence".to_string(),
                LawCategory::Algebraic,
                2,
                2,
                1,
                "f(f(a, b), f(a, b)) == f(a, b)".to_string(),
            ),
            LawKind::Distributivity(side) => {
                let name = match side {
                    DistributivitySide::Left => "left_distributivity",
                    DistributivitySide::Right => "right_distributivity",
                    DistributivitySide::Both => "distributivity",
                };
                (
                    name.to_string(),
                    LawCategory::Algebraic,
                    3,
                    2,
                    2,
                    "f distributes over g".to_string(),
                )
            }
            LawKind::IdentityElement(side) => (
                match side {
                    ElementSide::Left => "left_identity_element".to_string(),
                    ElementSide::Right => "right_identity_element".to_string(),
                    ElementSide::Both => "identity_element".to_string(),
                },
                LawCategory::Algebraic,
                2,
                2,
                1,
                format!("some e is a {} identity of f", side.label()),
            ),
            LawKind::AbsorbingElement(side) => (
                match side {
                    ElementSide::Left => "left_absorbing_element".to_string(),
                    ElementSide::Right => "right_absorbing_element".to_string(),
                    ElementSide::Both => "absorbing_element".to_string(),
                },
                LawCategory::Algebraic,
                2,
                2,
                1,
                format!("some z is a {} absorbing element of f", side.label()),
            ),
            LawKind::Injectivity => (
                "injectivity".to_string(),
                LawCategory::Structural,
                1,
                1,
                1,
                "distinct inputs produce distinct results".to_string(),
            ),
            LawKind::FixedPoint { position } => (
                "fixed_point".to_string(),
                LawCategory::Structural,
                position + 1,
                position + 1,
                1,
                format!("f returns its argument at position {}", position),
            ),
            LawKind::Determinism { runs } => (
                "determinism".to_string(),
                LawCategory::Behavioral,
                1,
                1,
                1,
                format!("{} repeated calls all agree with the first", runs),
            ),
            LawKind::Composition(side) => (
                match side {
                    CompositionSide::Left => "left_composition".to_string(),
                    CompositionSide::Right => "right_composition".to_string(),
                },
                LawCategory::Composition,
                1,
                1,
                2,
                match side {
                    CompositionSide::Left => "f(g(x)) == f(x)".to_string(),
                    CompositionSide::Right => "f(g(x)) == g(x)".to_string(),
                },
            ),
            LawKind::Involution { position } => (
                "involution".to_string(),
                LawCategory::Composition,
                position + 1,
                position + 1,
                1,
                format!("f(f(x)) == x at position {}", position),
            ),
            LawKind::TypePreservation => (
                "type_preservation".to_string(),
                LawCategory::Structural,
                1,
                1,
                1,
                "converted input and result share a runtime category".to_string(),
            ),
        };

        Self {
            kind,
            name,
            category,
            input_arity,
            function_arity,
            num_functions,
            description,
        }
    }

    /// Family selector and its parameters
    pub fn kind(&self) -> LawKind {
        self.kind
    }

    /// Canonical registry name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coarse category
    pub fn category(&self) -> LawCategory {
        self.category
    }

    /// Values each input tuple must supply
    pub fn input_arity(&self) -> usize {
        self.input_arity
    }

    /// Positional parameters each wrapped function must accept
    pub fn function_arity(&self) -> usize {
        self.function_arity
    }

    /// Functions a combination must contain
    pub fn num_functions(&self) -> usize {
        self.num_functions
    }

    /// One-line description of the checked equation
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this law can run against a combination: the function count
    /// matches and every wrapped function accepts exactly the law's
    /// function arity
    pub fn is_applicable(&self, combined: &CombinedFunction) -> bool {
        combined.len() == self.num_functions
            && combined
                .functions()
                .iter()
                .all(|f| f.arity() == self.function_arity)
    }

    /// Run the law against one combination over a bounded input set.
    ///
    /// Inputs shorter than the law's input arity are discarded up front; if
    /// none survive, the verdict fails with the no-valid-inputs sentinel.
    pub fn evaluate(
        &self,
        combined: &CombinedFunction,
        inputs: &[Vec<Value>],
        max_counterexamples: usize,
    ) -> Result<LawVerdict, CoreError> {
        let name = self.name.as_str();
        match self.kind {
            LawKind::Commutativity => {
                families::binary::commutativity(name, combined, inputs, max_counterexamples)
            }
            LawKind::Associativity => {
                families::binary::associativity(name, combined, inputs, max_counterexamples)
            }
            LawKind::Distributivity(side) => {
                families::binary::distributivity(name, side, combined, inputs, max_counterexamples)
            }
            LawKind::LeftIdempotence | LawKind::RightIdempotence | LawKind::FullIdempotence => {
                families::binary::dominance(name, self.kind, combined, inputs, max_counterexamples)
            }
            LawKind::IdentityElement(side) => families::element::identity_element(
                name,
                side,
                combined,
                inputs,
                max_counterexamples,
            ),
            LawKind::AbsorbingElement(side) => families::element::absorbing_element(
                name,
                side,
                combined,
                inputs,
                max_counterexamples,
            ),
            LawKind::Idempotence => {
                families::unary::idempotence(name, combined, inputs, max_counterexamples)
            }
            LawKind::FixedPoint { position } => families::unary::fixed_point(
                name,
                position,
                combined,
                inputs,
                max_counterexamples,
            ),
            LawKind::Involution { position } => families::unary::involution(
                name,
                position,
                combined,
                inputs,
                max_counterexamples,
            ),
            LawKind::TypePreservation => {
                families::unary::type_preservation(name, combined, inputs, max_counterexamples)
            }
            LawKind::Injectivity => {
                families::relational::injectivity(name, combined, inputs, max_counterexamples)
            }
            LawKind::Determinism { runs } => families::relational::determinism(
                name,
                runs,
                combined,
                inputs,
                max_counterexamples,
            ),
            LawKind::Composition(side) => {
                families::compose::composition(name, side, combined, inputs, max_counterexamples)
            }
        }
    }
}
