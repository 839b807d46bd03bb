//! Engine configuration
//!
//! Configuration is an explicit registration API: callers construct an
//! [`EngineConfig`], register functions and grammar sources, and attach
//! per-function grammar/parser overrides by name. Invalid configurations
//! (duplicate registration, unknown law names, unknown sources, invalid
//! override constraints, caps that cannot drive a run) are rejected at the
//! call that introduces them, not at run time.

use crate::EngineError;
use lawprove_core::{ComparisonStrategy, FunctionSpec, GrammarConfig, GrammarSource};
use lawprove_gen::{FunctionProfile, TupleParser};
use lawprove_infer::{ConstraintModel, RuleBasedModel};
use lawprove_laws::{Law, LawCategory, LawRegistry};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Default desired tuple count per function combination
pub const DEFAULT_EXAMPLE_COUNT: usize = 20;
/// Default cap on recorded counterexamples/successes per verdict
pub const DEFAULT_MAX_COUNTEREXAMPLES: usize = 5;
/// Default feedback attempt budget when feedback is enabled
pub const DEFAULT_FEEDBACK_ATTEMPTS: usize = 3;

/// How a per-function grammar override is specified at registration time
#[derive(Debug, Clone)]
pub enum GrammarSpec {
    /// A registered source id, used with no extra constraints
    Source(String),
    /// A registered source id plus initial constraint expressions
    SourceWithConstraints(String, Vec<String>),
    /// A prebuilt grammar configuration
    Prebuilt(GrammarConfig),
}

/// Aggregates registered functions, selected laws, generation defaults and
/// overrides, and the feedback policy for one engine run
pub struct EngineConfig {
    sources: BTreeMap<String, GrammarSource>,
    default_grammar: GrammarConfig,
    default_parser: TupleParser,
    functions: Vec<Arc<FunctionSpec>>,
    grammar_overrides: BTreeMap<String, GrammarConfig>,
    parser_overrides: BTreeMap<String, TupleParser>,
    registry: LawRegistry,
    selected: Vec<Arc<Law>>,
    example_count: usize,
    max_counterexamples: usize,
    strategy: ComparisonStrategy,
    feedback_enabled: bool,
    max_feedback_attempts: usize,
    cache_enabled: bool,
    model: Arc<dyn ConstraintModel>,
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("functions", &self.function_names())
            .field("selected", &self.selected.iter().map(|l| l.name()).collect::<Vec<_>>())
            .field("example_count", &self.example_count)
            .field("max_counterexamples", &self.max_counterexamples)
            .field("strategy", &self.strategy)
            .field("feedback_enabled", &self.feedback_enabled)
            .field("max_feedback_attempts", &self.max_feedback_attempts)
            .field("cache_enabled", &self.cache_enabled)
            .finish()
    }
}

impl EngineConfig {
    /// Start a configuration from a default grammar and a default parser.
    ///
    /// The default grammar's source is registered automatically; further
    /// sources become available via [`EngineConfig::register_source`]. The
    /// constraint model defaults to the rule-based one.
    pub fn new(default_grammar: GrammarConfig, default_parser: TupleParser) -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            default_grammar.source_id().to_string(),
            default_grammar.source().clone(),
        );
        Self {
            sources,
            default_grammar,
            default_parser,
            functions: Vec::new(),
            grammar_overrides: BTreeMap::new(),
            parser_overrides: BTreeMap::new(),
            registry: LawRegistry::with_defaults(),
            selected: Vec::new(),
            example_count: DEFAULT_EXAMPLE_COUNT,
            max_counterexamples: DEFAULT_MAX_COUNTEREXAMPLES,
            strategy: ComparisonStrategy::default(),
            feedback_enabled: false,
            max_feedback_attempts: DEFAULT_FEEDBACK_ATTEMPTS,
            cache_enabled: true,
            model: Arc::new(RuleBasedModel::new()),
        }
    }

    /// Make a generation source available to grammar overrides by id.
    /// Registering the same id again replaces the earlier definition.
    pub fn register_source(mut self, source: GrammarSource) -> Self {
        self.sources.insert(source.id().to_string(), source);
        self
    }

    /// Register a wrapped function. Names must be unique.
    pub fn register_function(mut self, spec: FunctionSpec) -> Result<Self, EngineError> {
        let name = spec.name().to_string();
        if self.functions.iter().any(|f| f.name() == name) {
            return Err(EngineError::DuplicateFunction(name));
        }
        self.functions.push(Arc::new(spec));
        Ok(self)
    }

    /// Attach a grammar override to a registered function. Source ids must be
    /// registered and constraint expressions must pass the syntactic gate.
    pub fn with_grammar_override(
        mut self,
        function: &str,
        spec: GrammarSpec,
    ) -> Result<Self, EngineError> {
        self.require_function(function)?;
        let resolved = self.resolve_grammar(&spec)?;
        self.grammar_overrides.insert(function.to_string(), resolved);
        Ok(self)
    }

    /// Attach a parser override to a registered function
    pub fn with_parser_override(
        mut self,
        function: &str,
        parser: TupleParser,
    ) -> Result<Self, EngineError> {
        self.require_function(function)?;
        self.parser_overrides.insert(function.to_string(), parser);
        Ok(self)
    }

    /// Select a law by canonical name. Unknown names are rejected here.
    pub fn select_law(mut self, name: &str) -> Result<Self, EngineError> {
        let law = self.registry.get(name)?;
        if !self.selected.iter().any(|l| l.name() == law.name()) {
            self.selected.push(law);
        }
        Ok(self)
    }

    /// Select every law in a category
    pub fn select_category(mut self, category: LawCategory) -> Self {
        for law in self.registry.by_category(category) {
            if !self.selected.iter().any(|l| l.name() == law.name()) {
                self.selected.push(law);
            }
        }
        self
    }

    /// Set the desired tuple count per combination
    pub fn with_example_count(mut self, count: usize) -> Result<Self, EngineError> {
        if count == 0 {
            return Err(EngineError::InvalidCap {
                name: "example count",
                value: count,
            });
        }
        self.example_count = count;
        Ok(self)
    }

    /// Set the cap on recorded counterexamples/successes per verdict
    pub fn with_max_counterexamples(mut self, cap: usize) -> Result<Self, EngineError> {
        if cap == 0 {
            return Err(EngineError::InvalidCap {
                name: "counterexample cap",
                value: cap,
            });
        }
        self.max_counterexamples = cap;
        Ok(self)
    }

    /// Set the comparison strategy used by every combination
    pub fn with_comparison_strategy(mut self, strategy: ComparisonStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable the constraint-feedback loop with an attempt budget
    pub fn with_feedback(mut self, max_attempts: usize) -> Result<Self, EngineError> {
        if max_attempts == 0 {
            return Err(EngineError::InvalidCap {
                name: "feedback attempt budget",
                value: max_attempts,
            });
        }
        self.feedback_enabled = true;
        self.max_feedback_attempts = max_attempts;
        Ok(self)
    }

    /// Disable the constraint-feedback loop
    pub fn without_feedback(mut self) -> Self {
        self.feedback_enabled = false;
        self
    }

    /// Enable or disable the per-combination input cache
    pub fn with_input_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Use a specific constraint model for feedback inference
    pub fn with_model(mut self, model: Arc<dyn ConstraintModel>) -> Self {
        self.model = model;
        self
    }

    fn require_function(&self, name: &str) -> Result<(), EngineError> {
        if self.functions.iter().any(|f| f.name() == name) {
            Ok(())
        } else {
            Err(EngineError::UnknownFunction(name.to_string()))
        }
    }

    fn resolve_grammar(&self, spec: &GrammarSpec) -> Result<GrammarConfig, EngineError> {
        match spec {
            GrammarSpec::Source(id) => {
                let source = self
                    .sources
                    .get(id)
                    .ok_or_else(|| EngineError::UnknownSource(id.clone()))?;
                Ok(GrammarConfig::new(source.clone()))
            }
            GrammarSpec::SourceWithConstraints(id, constraints) => {
                let source = self
                    .sources
                    .get(id)
                    .ok_or_else(|| EngineError::UnknownSource(id.clone()))?;
                let config = GrammarConfig::new(source.clone());
                for constraint in constraints {
                    config.validate_constraint(constraint)?;
                }
                Ok(config.add_constraints(constraints.iter().cloned()))
            }
            GrammarSpec::Prebuilt(config) => Ok(config.clone()),
        }
    }

    /// Registered function names, in registration order
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name()).collect()
    }

    /// Resolve every registered function into a generation profile
    /// (per-function override, or the defaults)
    pub fn profiles(&self) -> Vec<FunctionProfile> {
        self.functions
            .iter()
            .map(|spec| {
                let grammar = self
                    .grammar_overrides
                    .get(spec.name())
                    .cloned()
                    .unwrap_or_else(|| self.default_grammar.clone());
                let parser = self
                    .parser_overrides
                    .get(spec.name())
                    .cloned()
                    .unwrap_or_else(|| self.default_parser.clone());
                FunctionProfile::new(spec.clone(), grammar, parser)
            })
            .collect()
    }

    /// The laws this run will drive: the explicit selection, or the whole
    /// catalog when nothing was selected
    pub fn effective_laws(&self) -> Vec<Arc<Law>> {
        if self.selected.is_empty() {
            self.registry.laws().to_vec()
        } else {
            self.selected.clone()
        }
    }

    /// Desired tuple count per combination
    pub fn example_count(&self) -> usize {
        self.example_count
    }

    /// Cap on recorded counterexamples/successes
    pub fn max_counterexamples(&self) -> usize {
        self.max_counterexamples
    }

    /// Comparison strategy for combinations
    pub fn strategy(&self) -> ComparisonStrategy {
        self.strategy
    }

    /// Whether the feedback loop is enabled
    pub fn feedback_enabled(&self) -> bool {
        self.feedback_enabled
    }

    /// Feedback attempt budget (the adaptive engine reads this as its
    /// iteration budget)
    pub fn max_feedback_attempts(&self) -> usize {
        self.max_feedback_attempts
    }

    /// Whether the per-combination input cache is enabled
    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// The configured constraint model
    pub fn model(&self) -> Arc<dyn ConstraintModel> {
        self.model.clone()
    }
}
