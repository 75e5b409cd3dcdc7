//! Symbol classification
//!
//! Decides what a symbol "is" from its position in the tree and the function
//! registry. Rules are tried in a fixed order and the first applicable one
//! wins:
//!
//! 1. definition position: parameter, then let binding, then the operator of
//!    the innermost enclosing list decides the definition kind
//! 2. registry function, sub-classified by name
//! 3. special form keyword
//! 4. anything else is an unknown symbol
//!
//! Classification is a pure function of (node, tree, registry) and never
//! fails: a missing ancestor or an unexpected node kind just makes a rule
//! inapplicable.

use tracing::debug;

use super::category::{DefinitionKind, LibraryKind, SymbolCategory};
use super::forms::{
    is_one_of, ARITHMETIC_OPERATORS, COLLECTION_FUNCTIONS, COMPARISON_OPERATORS, SPECIAL_FORMS,
};
use super::scope::ScopeAnalyzer;
use crate::ir::{NodeId, SyntaxNodeKind, SyntaxTree};
use crate::registry::FunctionRegistry;

pub struct SymbolClassifier<'a, A: ScopeAnalyzer + ?Sized> {
    registry: &'a FunctionRegistry,
    analyzer: &'a A,
}

impl<'a, A: ScopeAnalyzer + ?Sized> SymbolClassifier<'a, A> {
    pub fn new(registry: &'a FunctionRegistry, analyzer: &'a A) -> Self {
        Self { registry, analyzer }
    }

    pub fn classify(&self, tree: &SyntaxTree, symbol: NodeId) -> SymbolCategory {
        let Some(name) = tree
            .node(symbol)
            .filter(|node| node.kind() == SyntaxNodeKind::Symbol)
            .and_then(|node| node.text())
        else {
            debug!("classify called on non-symbol node {}", symbol);
            return SymbolCategory::UnknownSymbol;
        };

        let category = self
            .classify_definition(tree, symbol)
            .or_else(|| self.registry.get_function(name).map(|_| classify_library_name(name)))
            .or_else(|| is_one_of(name, SPECIAL_FORMS).then_some(SymbolCategory::SpecialForm))
            .unwrap_or(SymbolCategory::UnknownSymbol);

        debug!("classified {} ({}) as {:?}", name, symbol, category);
        category
    }

    fn classify_definition(&self, tree: &SyntaxTree, symbol: NodeId) -> Option<SymbolCategory> {
        if !self.analyzer.is_definition(tree, symbol) {
            return None;
        }
        if self.analyzer.is_function_parameter(tree, symbol) {
            return Some(SymbolCategory::FunctionParameter);
        }
        if self.analyzer.is_let_binding(tree, symbol) {
            return Some(SymbolCategory::LetBinding);
        }

        let operator = tree
            .nearest_ancestor_list(symbol)
            .and_then(|list| tree.list_operator(list));
        Some(SymbolCategory::Definition(DefinitionKind::from_operator(operator)))
    }
}

/// Sub-classifies a registry function by its name
pub fn classify_library_name(name: &str) -> SymbolCategory {
    let kind = if name.ends_with('?') {
        LibraryKind::Predicate
    } else if is_one_of(name, ARITHMETIC_OPERATORS) {
        LibraryKind::Arithmetic
    } else if is_one_of(name, COMPARISON_OPERATORS) {
        LibraryKind::Comparison
    } else if is_one_of(name, COLLECTION_FUNCTIONS) {
        LibraryKind::Collection
    } else {
        LibraryKind::Core
    };
    SymbolCategory::LibraryFunction(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_name_precedence() {
        assert_eq!(
            classify_library_name("empty?"),
            SymbolCategory::LibraryFunction(LibraryKind::Predicate)
        );
        assert_eq!(
            classify_library_name("inc"),
            SymbolCategory::LibraryFunction(LibraryKind::Arithmetic)
        );
        assert_eq!(
            classify_library_name("<="),
            SymbolCategory::LibraryFunction(LibraryKind::Comparison)
        );
        assert_eq!(
            classify_library_name("reduce"),
            SymbolCategory::LibraryFunction(LibraryKind::Collection)
        );
        assert_eq!(
            classify_library_name("str/join"),
            SymbolCategory::LibraryFunction(LibraryKind::Core)
        );
    }
}
