//! Tuple extraction from derivation trees
//!
//! A [`TupleParser`] describes how one parsed derivation becomes a tuple of
//! raw values: by selecting every node of one symbol, by selecting one node
//! per symbol from an ordered list, or by a prebuilt extraction strategy
//! (fixed-arity tree positions or recursive leaf collection with separator
//! stripping).

use crate::tree::DerivationTree;
use lawprove_core::Value;
use serde::{Deserialize, Serialize};

/// Caller-supplied extraction strategy over a derivation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TupleExtraction {
    /// Values sit at known child-index paths from the root
    FixedArity {
        /// One path per tuple position
        paths: Vec<Vec<usize>>,
    },
    /// Collect every leaf, stripping separator texts
    Leaves {
        /// Leaf texts to discard (whitespace-only leaves are always dropped)
        separators: Vec<String>,
    },
}

impl TupleExtraction {
    /// Extract a value tuple from a tree, or `None` when the tree does not
    /// have the expected shape
    pub fn extract(&self, tree: &DerivationTree) -> Option<Vec<Value>> {
        match self {
            TupleExtraction::FixedArity { paths } => {
                let mut values = Vec::with_capacity(paths.len());
                for path in paths {
                    let node = tree.at_path(path)?;
                    values.push(Value::parse_leaf(&node.text_content()));
                }
                Some(values)
            }
            TupleExtraction::Leaves { separators } => {
                let values: Vec<Value> = tree
                    .leaf_texts()
                    .into_iter()
                    .filter(|text| {
                        !text.trim().is_empty() && !separators.contains(text)
                    })
                    .map(|text| Value::parse_leaf(&text))
                    .collect();
                if values.is_empty() {
                    None
                } else {
                    Some(values)
                }
            }
        }
    }
}

/// How a function's input tuples are read out of parsed derivations.
///
/// Two functions can share a combination only when their parsers resolve to
/// an identical specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TupleParser {
    /// Every node with this symbol contributes one tuple position, in
    /// preorder
    Symbol(String),
    /// One node per selector, in the given order
    Symbols(Vec<String>),
    /// A prebuilt extraction strategy
    Extraction(TupleExtraction),
}

impl TupleParser {
    /// Read a value tuple from a parsed derivation, or `None` when the tree
    /// does not match this parser's shape
    pub fn parse_tuple(&self, tree: &DerivationTree) -> Option<Vec<Value>> {
        match self {
            TupleParser::Symbol(symbol) => {
                let nodes = tree.find_all(symbol);
                if nodes.is_empty() {
                    return None;
                }
                Some(
                    nodes
                        .iter()
                        .map(|node| Value::parse_leaf(&node.text_content()))
                        .collect(),
                )
            }
            TupleParser::Symbols(selectors) => {
                let mut values = Vec::with_capacity(selectors.len());
                for selector in selectors {
                    let node = tree.find_all(selector).into_iter().next()?;
                    values.push(Value::parse_leaf(&node.text_content()));
                }
                Some(values)
            }
            TupleParser::Extraction(extraction) => extraction.extract(tree),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_tree() -> DerivationTree {
        DerivationTree::node(
            "start",
            vec![
                DerivationTree::node("n", vec![DerivationTree::leaf("digit", "12")]),
                DerivationTree::leaf("sep", ","),
                DerivationTree::node("m", vec![DerivationTree::leaf("digit", "-3")]),
            ],
        )
    }

    #[test]
    fn test_symbol_parser_collects_all_matches() {
        let parser = TupleParser::Symbol("digit".to_string());
        assert_eq!(
            parser.parse_tuple(&pair_tree()),
            Some(vec![Value::Int(12), Value::Int(-3)])
        );
    }

    #[test]
    fn test_symbols_parser_selects_in_order() {
        let parser = TupleParser::Symbols(vec!["m".to_string(), "n".to_string()]);
        assert_eq!(
            parser.parse_tuple(&pair_tree()),
            Some(vec![Value::Int(-3), Value::Int(12)])
        );
    }

    #[test]
    fn test_missing_selector_is_none() {
        let parser = TupleParser::Symbols(vec!["n".to_string(), "zzz".to_string()]);
        assert_eq!(parser.parse_tuple(&pair_tree()), None);
    }

    #[test]
    fn test_fixed_arity_extraction() {
        let parser = TupleParser::Extraction(TupleExtraction::FixedArity {
            paths: vec![vec![0], vec![2]],
        });
        assert_eq!(
            parser.parse_tuple(&pair_tree()),
            Some(vec![Value::Int(12), Value::Int(-3)])
        );
    }

    #[test]
    fn test_leaf_extraction_strips_separators() {
        let parser = TupleParser::Extraction(TupleExtraction::Leaves {
            separators: vec![",".to_string()],
        });
        assert_eq!(
            parser.parse_tuple(&pair_tree()),
            Some(vec![Value::Int(12), Value::Int(-3)])
        );
    }

    #[test]
    fn test_identical_parsers_compare_equal() {
        let a = TupleParser::Symbols(vec!["n".to_string()]);
        let b = TupleParser::Symbols(vec!["n".to_string()]);
        let c = TupleParser::Symbol("n".to_string());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
