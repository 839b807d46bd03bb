//! Memoizing input generation per function combination
//!
//! The [`InputGenerator`] is the sole consumer of the external generator
//! boundary. It resolves a merged grammar and a shared parser for each
//! combination, asks the service for roughly twice the desired population to
//! absorb rejection, drops unparseable items, and memoizes the surviving
//! tuples keyed by the ordered function-name tuple.
//!
//! Failed attempts are memoized too (as absent), so a combination that cannot
//! produce inputs is not retried within one run. Both reads and writes are
//! skipped whenever a grammar override is supplied: cached inputs would not
//! reflect the override's constraints.

use crate::client::{DerivationService, GenerationRequest};
use crate::parser::TupleParser;
use crate::profile::FunctionProfile;
use crate::GenError;
use lawprove_core::{GrammarConfig, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Generates and memoizes input tuples for function combinations
pub struct InputGenerator {
    service: Arc<dyn DerivationService>,
    example_count: usize,
    cache_enabled: bool,
    cache: HashMap<Vec<String>, Option<Vec<Vec<Value>>>>,
}

impl InputGenerator {
    /// Create a generator over a derivation service
    pub fn new(service: Arc<dyn DerivationService>, example_count: usize, cache_enabled: bool) -> Self {
        Self {
            service,
            example_count,
            cache_enabled,
            cache: HashMap::new(),
        }
    }

    /// Desired tuple count per combination
    pub fn example_count(&self) -> usize {
        self.example_count
    }

    /// Merge the grammar configurations of a combination. Returns `None`
    /// when any two functions disagree on the generation source: the
    /// combination is inapplicable, not an error.
    pub fn build_grammar_for_functions(profiles: &[FunctionProfile]) -> Option<GrammarConfig> {
        GrammarConfig::merged(profiles.iter().map(|p| &p.grammar))
    }

    /// The shared parser of a combination, if every function resolves to an
    /// identical parser specification; otherwise `None` and the combination
    /// is skipped.
    pub fn get_parser_for_functions(profiles: &[FunctionProfile]) -> Option<TupleParser> {
        let mut iter = profiles.iter();
        let first = iter.next()?.parser.clone();
        for profile in iter {
            if profile.parser != first {
                return None;
            }
        }
        Some(first)
    }

    fn combination_key(profiles: &[FunctionProfile]) -> Vec<String> {
        profiles.iter().map(|p| p.name().to_string()).collect()
    }

    /// Obtain input tuples for a combination.
    ///
    /// Without an override, cached results (including memoized failures) are
    /// returned as defensive copies. With an override the cache is neither
    /// read nor written.
    pub async fn get_inputs_for_combination(
        &mut self,
        profiles: &[FunctionProfile],
        grammar_override: Option<&GrammarConfig>,
    ) -> Result<Option<Vec<Vec<Value>>>, GenError> {
        let key = Self::combination_key(profiles);

        if grammar_override.is_none() && self.cache_enabled {
            if let Some(cached) = self.cache.get(&key) {
                debug!(combination = ?key, "input cache hit");
                return Ok(cached.clone());
            }
        }

        let grammar = match grammar_override {
            Some(grammar) => Some(grammar.clone()),
            None => Self::build_grammar_for_functions(profiles),
        };
        let parser = Self::get_parser_for_functions(profiles);

        let (Some(grammar), Some(parser)) = (grammar, parser) else {
            debug!(combination = ?key, "no shared grammar or parser; combination skipped");
            if grammar_override.is_none() && self.cache_enabled {
                self.cache.insert(key, None);
            }
            return Ok(None);
        };

        let request = GenerationRequest::for_grammar(&grammar, self.example_count);
        let items = self.service.generate(&request).await?;

        let mut tuples = Vec::with_capacity(items.len().min(self.example_count));
        for item in &items {
            if tuples.len() >= self.example_count {
                break;
            }
            match self.service.parse(&grammar, item).await {
                Ok(tree) => match parser.parse_tuple(&tree) {
                    Some(tuple) => tuples.push(tuple),
                    None => {
                        warn!(item = %item, "derivation did not match parser shape; dropped");
                    }
                },
                Err(err) => {
                    warn!(item = %item, error = %err, "failed to parse derivation; dropped");
                }
            }
        }

        debug!(
            combination = ?key,
            generated = items.len(),
            parsed = tuples.len(),
            "generated inputs"
        );

        if grammar_override.is_none() && self.cache_enabled {
            self.cache.insert(key, Some(tuples.clone()));
        }
        Ok(Some(tuples))
    }
}
