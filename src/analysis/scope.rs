//! Definition and lexical scope analysis
//!
//! [`ScopeAnalyzer`] is the seam between the classifier/completion layers and
//! whatever knows the binding structure of the language. Hosts with their own
//! resolver implement it; [`LexicalScopeAnalyzer`] is the default, working
//! purely from the shape of Phel binding forms:
//!
//! ```text
//! (defn name [params] body)      parameters, name defined at top level
//! (fn ([a] ...) ([a b] ...))     one parameter vector per arity
//! (let [pattern value ...] body) pattern/value pairs, earlier pairs visible
//! (foreach [v coll] body)        every element but the last is bound
//! (def name value)               top-level definition
//! ```

use std::iter;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use super::category::DefinitionKind;
use super::forms::{
    is_one_of, DEFINITION_FORMS, FOREACH_FORMS, FUNCTION_FORMS, LET_FORMS, REST_MARKER,
};
use crate::ir::{NodeId, SyntaxNodeKind, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("node {0} is not part of the syntax tree")]
    UnknownNode(NodeId),

    #[error("scope resolver failed: {0}")]
    Resolver(String),
}

/// How a local name was introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    Parameter,
    LetBinding,
    Definition(DefinitionKind),
}

/// A name visible at a cursor position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSymbol {
    pub name: String,
    pub kind: BindingKind,
    /// Operator of the form that introduced the binding (`let`, `defn`, ...)
    pub binding_form: String,
    pub node: NodeId,
}

/// Where a symbol sits when it introduces a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSite {
    Parameter,
    LetBinding,
    DefinitionName,
}

pub trait ScopeAnalyzer: Send + Sync {
    /// True when the symbol introduces a name rather than referring to one
    fn is_definition(&self, tree: &SyntaxTree, symbol: NodeId) -> bool;

    fn is_function_parameter(&self, tree: &SyntaxTree, symbol: NodeId) -> bool;

    fn is_let_binding(&self, tree: &SyntaxTree, symbol: NodeId) -> bool;

    /// Names visible at `offset`, innermost and most recent first, unique by name
    ///
    /// `element` is the innermost node at the cursor.
    fn local_symbols_visible_at(
        &self,
        tree: &SyntaxTree,
        element: NodeId,
        offset: usize,
    ) -> Result<Vec<LocalSymbol>, AnalysisError>;
}

/// Scope analysis driven by the syntactic shape of binding forms
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScopeAnalyzer;

impl LexicalScopeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Classifies the binding position of a symbol, if it is one
    pub fn binding_site(&self, tree: &SyntaxTree, symbol: NodeId) -> Option<BindingSite> {
        if !tree.is_kind(symbol, SyntaxNodeKind::Symbol) || tree.text(symbol) == Some(REST_MARKER) {
            return None;
        }

        let mut current = symbol;
        loop {
            let form = tree.parent(current)?;
            if !tree.is_kind(form, SyntaxNodeKind::Form) {
                return None;
            }
            let container = tree.parent(form)?;
            match tree.kind(container)? {
                SyntaxNodeKind::List => {
                    if current != symbol {
                        return None;
                    }
                    let (index, _) = tree.enclosing_element(container, current)?;
                    let operator = tree.list_operator(container);
                    return (index == 1 && operator.is_some_and(|op| is_one_of(op, DEFINITION_FORMS)))
                        .then_some(BindingSite::DefinitionName);
                }
                SyntaxNodeKind::Vector => {
                    if let Some(site) = vector_binding_site(tree, container, current) {
                        return site;
                    }
                    current = container;
                }
                SyntaxNodeKind::Map => current = container,
                SyntaxNodeKind::File
                | SyntaxNodeKind::Form
                | SyntaxNodeKind::Symbol
                | SyntaxNodeKind::Keyword
                | SyntaxNodeKind::Literal
                | SyntaxNodeKind::Error => return None,
            }
        }
    }
}

impl ScopeAnalyzer for LexicalScopeAnalyzer {
    fn is_definition(&self, tree: &SyntaxTree, symbol: NodeId) -> bool {
        self.binding_site(tree, symbol).is_some()
    }

    fn is_function_parameter(&self, tree: &SyntaxTree, symbol: NodeId) -> bool {
        self.binding_site(tree, symbol) == Some(BindingSite::Parameter)
    }

    fn is_let_binding(&self, tree: &SyntaxTree, symbol: NodeId) -> bool {
        self.binding_site(tree, symbol) == Some(BindingSite::LetBinding)
    }

    fn local_symbols_visible_at(
        &self,
        tree: &SyntaxTree,
        element: NodeId,
        offset: usize,
    ) -> Result<Vec<LocalSymbol>, AnalysisError> {
        if !tree.contains(element) {
            return Err(AnalysisError::UnknownNode(element));
        }

        let mut groups: Vec<Vec<LocalSymbol>> = Vec::new();
        for scope in iter::once(element).chain(tree.ancestors(element)) {
            if !tree.is_kind(scope, SyntaxNodeKind::List) {
                continue;
            }
            let operator = tree.list_operator(scope).unwrap_or_default();

            if let Some(params) = arity_parameters(tree, scope) {
                if !is_within(tree, element, params) && visible_after(tree, params, offset) {
                    groups.push(bind_pattern(tree, params, BindingKind::Parameter, operator_of_arity(tree, scope)));
                }
            } else if is_one_of(operator, LET_FORMS) {
                if let Some(bindings) = first_vector(tree, scope) {
                    groups.push(let_bindings(tree, bindings, element, offset, operator));
                }
            } else if is_one_of(operator, FOREACH_FORMS) {
                if let Some(bindings) = first_vector(tree, scope) {
                    if !is_within(tree, element, bindings) && visible_after(tree, bindings, offset) {
                        let elements = tree.elements(bindings);
                        let patterns = &elements[..elements.len().saturating_sub(1)];
                        groups.push(bind_patterns(tree, patterns, BindingKind::LetBinding, operator));
                    }
                }
            }
        }

        groups.push(top_level_definitions(tree, element, offset));

        trace!("collected {} binding group(s) at offset {}", groups.len(), offset);
        Ok(merge_groups(groups))
    }
}

/// Decides a vector-level binding position; `None` means "keep climbing"
fn vector_binding_site(
    tree: &SyntaxTree,
    vector: NodeId,
    current: NodeId,
) -> Option<Option<BindingSite>> {
    let list = tree.parent(vector).and_then(|form| tree.parent(form))?;
    if !tree.is_kind(list, SyntaxNodeKind::List) {
        return None;
    }

    if arity_parameters(tree, list) == Some(vector) {
        return Some(Some(BindingSite::Parameter));
    }

    let operator = tree.list_operator(list)?;
    if first_vector(tree, list) != Some(vector) {
        return None;
    }
    let (index, _) = tree.enclosing_element(vector, current)?;
    if is_one_of(operator, LET_FORMS) {
        return Some((index % 2 == 0).then_some(BindingSite::LetBinding));
    }
    if is_one_of(operator, FOREACH_FORMS) {
        let count = tree.elements(vector).len();
        return Some((index + 1 < count).then_some(BindingSite::LetBinding));
    }
    None
}

/// Parameter vector of a function form or of one arity of a multi-arity function
fn arity_parameters(tree: &SyntaxTree, list: NodeId) -> Option<NodeId> {
    let operator = tree.list_operator(list);
    if operator.is_some_and(|op| is_one_of(op, FUNCTION_FORMS)) {
        return first_vector(tree, list);
    }

    // (defn f ([x] ...) ([x y] ...)): the arity list starts with its vector
    let first = *tree.elements(list).first()?;
    if !tree.is_kind(first, SyntaxNodeKind::Vector) {
        return None;
    }
    let outer = tree.parent(list).and_then(|form| tree.parent(form))?;
    tree.list_operator(outer)
        .is_some_and(|op| is_one_of(op, FUNCTION_FORMS))
        .then_some(first)
}

fn operator_of_arity<'a>(tree: &'a SyntaxTree, list: NodeId) -> &'a str {
    if let Some(operator) = tree.list_operator(list) {
        if is_one_of(operator, FUNCTION_FORMS) {
            return operator;
        }
    }
    tree.parent(list)
        .and_then(|form| tree.parent(form))
        .and_then(|outer| tree.list_operator(outer))
        .unwrap_or_default()
}

/// First vector element after the operator
fn first_vector(tree: &SyntaxTree, list: NodeId) -> Option<NodeId> {
    tree.elements(list)
        .into_iter()
        .skip(1)
        .find(|&element| tree.is_kind(element, SyntaxNodeKind::Vector))
}

fn is_within(tree: &SyntaxTree, node: NodeId, container: NodeId) -> bool {
    node == container || tree.ancestors(node).any(|ancestor| ancestor == container)
}

fn visible_after(tree: &SyntaxTree, node: NodeId, offset: usize) -> bool {
    tree.range(node).is_some_and(|range| range.end <= offset)
}

fn let_bindings(
    tree: &SyntaxTree,
    bindings: NodeId,
    element: NodeId,
    offset: usize,
    operator: &str,
) -> Vec<LocalSymbol> {
    let elements = tree.elements(bindings);
    let visible_pairs = if is_within(tree, element, bindings) {
        match tree.enclosing_element(bindings, element) {
            // Cursor inside a pattern or value: only earlier pairs are bound
            Some((index, _)) => index / 2,
            // Cursor in whitespace of the vector: pairs whose value is complete
            None => elements
                .chunks(2)
                .take_while(|pair| pair.len() == 2 && visible_after(tree, pair[1], offset))
                .count(),
        }
    } else if visible_after(tree, bindings, offset) {
        elements.len().div_ceil(2)
    } else {
        0
    };

    let patterns: Vec<NodeId> = elements
        .iter()
        .step_by(2)
        .take(visible_pairs)
        .copied()
        .collect();
    bind_patterns(tree, &patterns, BindingKind::LetBinding, operator)
}

fn bind_pattern(tree: &SyntaxTree, pattern: NodeId, kind: BindingKind, operator: &str) -> Vec<LocalSymbol> {
    bind_patterns(tree, &[pattern], kind, operator)
}

fn bind_patterns(tree: &SyntaxTree, patterns: &[NodeId], kind: BindingKind, operator: &str) -> Vec<LocalSymbol> {
    patterns
        .iter()
        .flat_map(|&pattern| tree.symbols_within(pattern))
        .filter_map(|symbol| {
            let name = tree.text(symbol)?;
            (name != REST_MARKER).then(|| LocalSymbol {
                name: name.to_string(),
                kind,
                binding_form: operator.to_string(),
                node: symbol,
            })
        })
        .collect()
}

fn top_level_definitions(tree: &SyntaxTree, element: NodeId, offset: usize) -> Vec<LocalSymbol> {
    tree.elements(tree.root())
        .into_iter()
        .filter(|&form| tree.range(form).is_some_and(|range| range.start < offset))
        .filter_map(|form| {
            let operator = tree.list_operator(form)?;
            if !is_one_of(operator, DEFINITION_FORMS) {
                return None;
            }
            let name = *tree.elements(form).get(1)?;
            if name == element || !tree.is_kind(name, SyntaxNodeKind::Symbol) {
                return None;
            }
            Some(LocalSymbol {
                name: tree.text(name)?.to_string(),
                kind: BindingKind::Definition(DefinitionKind::from_operator(Some(operator))),
                binding_form: operator.to_string(),
                node: name,
            })
        })
        .collect()
}

/// Flattens binding groups (innermost first). Inside a group a later binding
/// shadows an earlier one of the same name; across groups the inner one wins.
fn merge_groups(groups: Vec<Vec<LocalSymbol>>) -> Vec<LocalSymbol> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut merged = Vec::new();
    for group in groups {
        let mut accepted: Vec<LocalSymbol> = Vec::new();
        for symbol in group.into_iter().rev() {
            if seen.insert(symbol.name.clone()) {
                accepted.push(symbol);
            }
        }
        accepted.reverse();
        merged.extend(accepted);
    }
    merged
}
