//! Law registry: name and category lookup over the catalog
//!
//! Every catalog law is constructed exactly once at registry-build time and
//! stored by its canonical name; callers get shared `Arc<Law>` handles, so a
//! law configured identically is always the same registry entry.

use crate::catalog::{CompositionSide, DistributivitySide, ElementSide, Law, LawCategory, LawKind};
use crate::LawError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Default run count for the determinism law
pub const DEFAULT_DETERMINISM_RUNS: usize = 5;

/// Lookup table over the law catalog
#[derive(Debug, Clone)]
pub struct LawRegistry {
    ordered: Vec<Arc<Law>>,
    by_name: HashMap<String, Arc<Law>>,
}

impl LawRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            ordered: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// The registry holding the full default catalog
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults = [
            LawKind::Commutativity,
            LawKind::Associativity,
            LawKind::Idempotence,
            LawKind::LeftIdempotence,
            LawKind::RightIdempotence,
            LawKind::FullIdempotence,
            LawKind::Distributivity(DistributivitySide::Left),
            LawKind::Distributivity(DistributivitySide::Right),
            LawKind::Distributivity(DistributivitySide::Both),
            LawKind::IdentityElement(ElementSide::Left),
            LawKind::IdentityElement(ElementSide::Right),
            LawKind::IdentityElement(ElementSide::Both),
            LawKind::AbsorbingElement(ElementSide::Left),
            LawKind::AbsorbingElement(ElementSide::Right),
            LawKind::AbsorbingElement(ElementSide::Both),
            LawKind::Injectivity,
            LawKind::FixedPoint { position: 0 },
            LawKind::Determinism {
                runs: DEFAULT_DETERMINISM_RUNS,
            },
            LawKind::Composition(CompositionSide::Left),
            LawKind::Composition(CompositionSide::Right),
            LawKind::Involution { position: 0 },
            LawKind::TypePreservation,
        ];
        for kind in defaults {
            // Default catalog names are distinct by construction
            let _ = registry.register(Law::from_kind(kind));
        }
        registry
    }

    /// Register a law under its canonical name
    pub fn register(&mut self, law: Law) -> Result<Arc<Law>, LawError> {
        let name = law.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(LawError::DuplicateLaw(name));
        }
        debug!(law = %name, "registering law");
        let law = Arc::new(law);
        self.by_name.insert(name, law.clone());
        self.ordered.push(law.clone());
        Ok(law)
    }

    /// Look up a law by canonical name
    pub fn get(&self, name: &str) -> Result<Arc<Law>, LawError> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| LawError::UnknownLaw(name.to_string()))
    }

    /// All laws in a category, in registration order
    pub fn by_category(&self, category: LawCategory) -> Vec<Arc<Law>> {
        self.ordered
            .iter()
            .filter(|law| law.category() == category)
            .cloned()
            .collect()
    }

    /// All registered laws, in registration order
    pub fn laws(&self) -> &[Arc<Law>] {
        &self.ordered
    }

    /// Canonical names of all registered laws, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.ordered.iter().map(|law| law.name()).collect()
    }

    /// Number of registered laws
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl Default for LawRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_complete() {
        let registry = LawRegistry::with_defaults();
        for name in [
            "commutativity",
            "associativity",
            "idempotence",
            "left_idempotence",
            "right_idempotence",
            "full_idempotence",
            "left_distributivity",
            "right_distributivity",
            "distributivity",
            "identity_element",
            "absorbing_element",
            "injectivity",
            "fixed_point",
            "determinism",
            "left_composition",
            "right_composition",
            "involution",
            "type_preservation",
        ] {
            assert!(registry.get(name).is_ok(), "missing {}", name);
        }
    }

    #[test]
    fn test_unknown_law_is_error() {
        let registry = LawRegistry::with_defaults();
        assert!(matches!(
            registry.get("transitivity"),
            Err(LawError::UnknownLaw(_))
        ));
    }

    #[test]
    fn test_duplicate_registration_is_error() {
        let mut registry = LawRegistry::with_defaults();
        assert!(matches!(
            registry.register(Law::from_kind(LawKind::Commutativity)),
            Err(LawError::DuplicateLaw(_))
        ));
    }

    #[test]
    fn test_category_lookup() {
        let registry = LawRegistry::with_defaults();
        let behavioral = registry.by_category(LawCategory::Behavioral);
        assert_eq!(behavioral.len(), 1);
        assert_eq!(behavioral[0].name(), "determinism");

        let algebraic = registry.by_category(LawCategory::Algebraic);
        assert!(algebraic.len() >= 10);
    }

    #[test]
    fn test_same_configuration_is_same_entry() {
        let registry = LawRegistry::with_defaults();
        let a = registry.get("commutativity").unwrap();
        let b = registry.get("commutativity").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
