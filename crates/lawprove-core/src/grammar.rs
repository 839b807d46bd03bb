//! Grammar configurations
//!
//! A [`GrammarConfig`] is an immutable value object: a generation source plus
//! a set of extra boolean constraint expressions. Merging configurations
//! unions their constraint sets; adding constraints returns a new instance
//! and never mutates the receiver.
//!
//! [`GrammarConfig::validate_constraint`] is a syntactic gate only: it admits
//! expressions of the shape `(int|len)(<symbol>) OP (int|len)(<symbol>) |
//! literal` where every referenced symbol is declared by the source. It does
//! not check semantic correctness against the expansion rules.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;
use thiserror::Error;

/// Why a constraint expression was rejected by the syntactic gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// The expression does not match the allowed shape
    #[error("Constraint {0:?} does not match `(int|len)(<symbol>) OP (int|len)(<symbol>)|literal`")]
    Malformed(String),

    /// The expression references a symbol the grammar does not declare
    #[error("Constraint references undeclared symbol <{0}>")]
    UndeclaredSymbol(String),
}

/// A generation source: an identifier plus the expansion rules declared
/// under it. Rules map nonterminal names (without angle brackets) to their
/// expansion alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarSource {
    id: String,
    start: String,
    rules: BTreeMap<String, Vec<String>>,
}

impl GrammarSource {
    /// Create a source from an identifier, start symbol, and rule table
    pub fn new(
        id: impl Into<String>,
        start: impl Into<String>,
        rules: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            rules,
        }
    }

    /// Identifier of this generation source
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Start symbol of the grammar
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Expansion rules, keyed by nonterminal name
    pub fn rules(&self) -> &BTreeMap<String, Vec<String>> {
        &self.rules
    }

    /// The set of declared symbol names
    pub fn nonterminals(&self) -> BTreeSet<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    /// Symbols referenced by the start rule's first alternative, in order.
    /// This is the positional mapping from generated tuple slots to grammar
    /// symbols; falls back to the sorted nonterminals (minus the start) when
    /// the start rule is absent.
    pub fn argument_symbols(&self) -> Vec<String> {
        if let Some(alternatives) = self.rules.get(&self.start) {
            if let Some(first) = alternatives.first() {
                let referenced = referenced_symbols(first);
                if !referenced.is_empty() {
                    return referenced;
                }
            }
        }
        self.rules
            .keys()
            .filter(|k| **k != self.start)
            .cloned()
            .collect()
    }
}

/// Extract `<symbol>` references from an expansion string, in order
fn referenced_symbols(expansion: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = expansion;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) => {
                out.push(after[..close].to_string());
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    out
}

/// Immutable generation configuration: a source plus extra boolean
/// constraints layered on top of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarConfig {
    source: GrammarSource,
    extra_constraints: Option<BTreeSet<String>>,
}

impl GrammarConfig {
    /// Configuration over a source with no extra constraints
    pub fn new(source: GrammarSource) -> Self {
        Self {
            source,
            extra_constraints: None,
        }
    }

    /// Configuration over a source with an initial constraint set
    pub fn with_constraints(
        source: GrammarSource,
        constraints: impl IntoIterator<Item = String>,
    ) -> Self {
        let set: BTreeSet<String> = constraints.into_iter().collect();
        Self {
            source,
            extra_constraints: if set.is_empty() { None } else { Some(set) },
        }
    }

    /// The generation source
    pub fn source(&self) -> &GrammarSource {
        &self.source
    }

    /// Identifier of the generation source
    pub fn source_id(&self) -> &str {
        self.source.id()
    }

    /// The extra constraints, in deterministic order
    pub fn constraints(&self) -> Vec<&str> {
        match &self.extra_constraints {
            Some(set) => set.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// Whether a constraint is already part of this configuration
    pub fn has_constraint(&self, expr: &str) -> bool {
        self.extra_constraints
            .as_ref()
            .is_some_and(|set| set.contains(expr))
    }

    /// Declared symbol names of the source
    pub fn nonterminals(&self) -> BTreeSet<&str> {
        self.source.nonterminals()
    }

    /// Return a new configuration whose constraint set is the union of this
    /// one's and `new`. The receiver is left unchanged; merging the same
    /// constraints repeatedly is idempotent.
    pub fn add_constraints(&self, new: impl IntoIterator<Item = String>) -> GrammarConfig {
        let mut set = self.extra_constraints.clone().unwrap_or_default();
        set.extend(new);
        GrammarConfig {
            source: self.source.clone(),
            extra_constraints: if set.is_empty() { None } else { Some(set) },
        }
    }

    /// Merge configurations for one function combination. All must reference
    /// the same generation source; a mismatch means the combination is simply
    /// inapplicable, so this returns `None` rather than an error. Constraint
    /// sets are unioned.
    pub fn merged<'a>(configs: impl IntoIterator<Item = &'a GrammarConfig>) -> Option<GrammarConfig> {
        let mut iter = configs.into_iter();
        let first = iter.next()?;
        let mut result = first.clone();
        for config in iter {
            if config.source_id() != result.source_id() {
                return None;
            }
            result = result.add_constraints(config.constraints().iter().map(|s| (*s).to_string()));
        }
        Some(result)
    }

    /// Syntactic gate for constraint expressions. Accepts only
    /// `(int|len)(<symbol>) OP (int|len)(<symbol>) | literal` with
    /// `OP ∈ {<,<=,>,>=,==,!=}` and every referenced symbol declared.
    pub fn validate_constraint(&self, expr: &str) -> Result<(), ConstraintError> {
        let captures = constraint_shape()
            .captures(expr.trim())
            .ok_or_else(|| ConstraintError::Malformed(expr.to_string()))?;

        let declared = self.nonterminals();
        for group in ["lhs_sym", "rhs_sym"] {
            if let Some(symbol) = captures.name(group) {
                if !declared.contains(symbol.as_str()) {
                    return Err(ConstraintError::UndeclaredSymbol(
                        symbol.as_str().to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn constraint_shape() -> &'static regex::Regex {
    static SHAPE: OnceLock<regex::Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        regex::Regex::new(
            r"^(?:int|len)\(<(?P<lhs_sym>[A-Za-z0-9_.-]+)>\)\s*(?:<=|>=|==|!=|<|>)\s*(?:(?:int|len)\(<(?P<rhs_sym>[A-Za-z0-9_.-]+)>\)|-?\d+(?:\.\d+)?)$",
        )
        .expect("constraint shape regex is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arith_source() -> GrammarSource {
        let mut rules = BTreeMap::new();
        rules.insert("start".to_string(), vec!["<n> <m>".to_string()]);
        rules.insert("n".to_string(), vec!["<digit>".to_string()]);
        rules.insert("m".to_string(), vec!["<digit>".to_string()]);
        rules.insert("digit".to_string(), vec!["0".to_string(), "1".to_string()]);
        GrammarSource::new("arith", "start", rules)
    }

    fn config() -> GrammarConfig {
        GrammarConfig::new(arith_source())
    }

    #[test]
    fn test_add_constraints_leaves_receiver_unchanged() {
        let g = config();
        let g2 = g.add_constraints(["int(<n>) != 0".to_string()]);
        assert!(g.constraints().is_empty());
        assert_eq!(g2.constraints(), vec!["int(<n>) != 0"]);
    }

    #[test]
    fn test_add_constraints_is_union_and_idempotent() {
        let g = config().add_constraints(["int(<n>) != 0".to_string()]);
        let g2 = g.add_constraints(["int(<n>) != 0".to_string()]);
        assert_eq!(g, g2);

        let g3 = g.add_constraints(["int(<m>) >= 0".to_string()]);
        assert_eq!(
            g3.constraints(),
            vec!["int(<m>) >= 0", "int(<n>) != 0"]
        );
    }

    #[test]
    fn test_validate_accepts_wrapped_symbol() {
        assert!(config().validate_constraint("int(<n>) != 0").is_ok());
        assert!(config()
            .validate_constraint("len(<n>) <= int(<m>)")
            .is_ok());
        assert!(config().validate_constraint("int(<n>) >= -3.5").is_ok());
    }

    #[test]
    fn test_validate_rejects_unwrapped_symbol() {
        assert!(matches!(
            config().validate_constraint("<n> > 10"),
            Err(ConstraintError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_undeclared_symbol() {
        assert!(matches!(
            config().validate_constraint("int(<zzz>) > 10"),
            Err(ConstraintError::UndeclaredSymbol(sym)) if sym == "zzz"
        ));
    }

    #[test]
    fn test_merge_requires_identical_source() {
        let a = config().add_constraints(["int(<n>) != 0".to_string()]);
        let b = config().add_constraints(["int(<m>) >= 0".to_string()]);
        let merged = GrammarConfig::merged([&a, &b]).unwrap();
        assert_eq!(merged.constraints().len(), 2);

        let mut other_rules = BTreeMap::new();
        other_rules.insert("x".to_string(), vec!["1".to_string()]);
        let other = GrammarConfig::new(GrammarSource::new("other", "x", other_rules));
        assert!(GrammarConfig::merged([&a, &other]).is_none());
    }

    #[test]
    fn test_argument_symbols_follow_start_rule() {
        assert_eq!(arith_source().argument_symbols(), vec!["n", "m"]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn add_constraints_never_shrinks(extra in proptest::collection::vec("[a-z]{1,8}", 0..5)) {
                let base = config().add_constraints(["int(<n>) != 0".to_string()]);
                let before = base.constraints().len();
                let grown = base.add_constraints(
                    extra.iter().map(|s| format!("int(<{}>) > 0", s)),
                );
                prop_assert!(grown.constraints().len() >= before);
                // receiver untouched
                prop_assert_eq!(base.constraints().len(), before);
            }

            #[test]
            fn repeated_merge_is_idempotent(reps in 1usize..5) {
                let mut g = config().add_constraints(["int(<n>) != 0".to_string()]);
                let snapshot = g.clone();
                for _ in 0..reps {
                    g = g.add_constraints(["int(<n>) != 0".to_string()]);
                }
                prop_assert_eq!(g, snapshot);
            }
        }
    }
}
