//! Derivation trees returned by the external generator

use serde::{Deserialize, Serialize};

/// A structured derivation: a symbol, an optional terminal text, and child
/// derivations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationTree {
    /// Grammar symbol this node was derived from
    pub symbol: String,
    /// Terminal text, present on leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Child derivations, empty on leaves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DerivationTree>,
}

impl DerivationTree {
    /// A leaf node carrying terminal text
    pub fn leaf(symbol: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    /// An interior node over child derivations
    pub fn node(symbol: impl Into<String>, children: Vec<DerivationTree>) -> Self {
        Self {
            symbol: symbol.into(),
            text: None,
            children,
        }
    }

    /// Whether this node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated terminal text of this subtree
    pub fn text_content(&self) -> String {
        match &self.text {
            Some(text) if self.is_leaf() => text.clone(),
            _ => self
                .children
                .iter()
                .map(DerivationTree::text_content)
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// All nodes with the given symbol, in preorder
    pub fn find_all<'a>(&'a self, symbol: &str) -> Vec<&'a DerivationTree> {
        let mut found = Vec::new();
        self.collect_symbol(symbol, &mut found);
        found
    }

    fn collect_symbol<'a>(&'a self, symbol: &str, found: &mut Vec<&'a DerivationTree>) {
        if self.symbol == symbol {
            found.push(self);
        }
        for child in &self.children {
            child.collect_symbol(symbol, found);
        }
    }

    /// Node at a child-index path from the root
    pub fn at_path(&self, path: &[usize]) -> Option<&DerivationTree> {
        let mut node = self;
        for index in path {
            node = node.children.get(*index)?;
        }
        Some(node)
    }

    /// Terminal texts of all leaves, in order
    pub fn leaf_texts(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<String>) {
        if self.is_leaf() {
            if let Some(text) = &self.text {
                out.push(text.clone());
            }
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }
}
