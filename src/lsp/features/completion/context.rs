//! Context detection for code completion
//!
//! Determines where the cursor sits relative to the form structure. Phel
//! completion has two mutually exclusive modes:
//! 1. New form: nothing encloses the cursor, offer structural templates
//! 2. General: the cursor is inside an expression, offer locals and library
//!    functions

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ir::{NodeId, SyntaxNodeKind, SyntaxTree};
use crate::lsp::error::CompletionError;
use crate::lsp::features::node_finder::find_node_at_offset;

/// Which candidate set a request gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionMode {
    Template,
    General,
}

/// Completion context at a cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorContext {
    /// Innermost node at the cursor
    pub element: NodeId,

    /// Byte offset of the cursor
    pub offset: usize,

    /// True when no list, vector or map encloses the cursor
    pub should_suggest_new_form: bool,

    /// True when a list encloses the cursor
    pub is_inside_parentheses: bool,
}

impl CursorContext {
    /// Determine the completion context at a byte offset
    ///
    /// Returns `None` only for an empty tree.
    pub fn at(tree: &SyntaxTree, offset: usize) -> Option<Self> {
        let element = find_node_at_offset(tree, offset)?;
        let (should_suggest_new_form, is_inside_parentheses) = enclosure_flags(tree, element);

        let context = Self {
            element,
            offset,
            should_suggest_new_form,
            is_inside_parentheses,
        };
        debug!("completion context at {}: {:?}", offset, context);
        Some(context)
    }

    pub fn mode(&self) -> CompletionMode {
        if self.should_suggest_new_form {
            CompletionMode::Template
        } else {
            CompletionMode::General
        }
    }

    /// Checks a context against the tree it is about to be used with
    ///
    /// Contexts built by [`CursorContext::at`] always pass on their own tree.
    /// Host-supplied or stale contexts may not.
    pub fn validate(&self, tree: &SyntaxTree) -> Result<(), CompletionError> {
        let Some(node) = tree.node(self.element) else {
            return Err(CompletionError::DanglingNode {
                node: self.element,
                context: "cursor context".to_string(),
            });
        };

        if node.kind() == SyntaxNodeKind::Form {
            return Err(CompletionError::UnexpectedNodeKind {
                expected: "token or collection",
                found: SyntaxNodeKind::Form,
            });
        }

        let range = node.range();
        if node.kind() != SyntaxNodeKind::File && !range.touches(self.offset) {
            return Err(CompletionError::InvalidContext(format!(
                "offset {} lies outside {} {}..{}",
                self.offset,
                node.kind(),
                range.start,
                range.end
            )));
        }

        if enclosure_flags(tree, self.element) != (self.should_suggest_new_form, self.is_inside_parentheses) {
            return Err(CompletionError::InvalidContext(format!(
                "enclosure flags disagree with the tree at {}",
                self.element
            )));
        }

        for ancestor in tree.ancestors(self.element) {
            let Some(outer) = tree.node(ancestor) else {
                continue;
            };
            if outer.kind().is_collection() && !outer.range().contains_range(range) {
                return Err(CompletionError::MalformedTree(format!(
                    "{} at {}..{} extends beyond its enclosing {} at {}..{}",
                    node.kind(),
                    range.start,
                    range.end,
                    outer.kind(),
                    outer.range().start,
                    outer.range().end
                )));
            }
        }

        Ok(())
    }
}

/// `(should_suggest_new_form, is_inside_parentheses)` for a cursor element
fn enclosure_flags(tree: &SyntaxTree, element: NodeId) -> (bool, bool) {
    let enclosing = |kinds: &[SyntaxNodeKind]| {
        std::iter::once(element)
            .chain(tree.ancestors(element))
            .any(|node| tree.kind(node).is_some_and(|kind| kinds.contains(&kind)))
    };
    let should_suggest_new_form = !enclosing(&[
        SyntaxNodeKind::List,
        SyntaxNodeKind::Vector,
        SyntaxNodeKind::Map,
    ]);
    (should_suggest_new_form, enclosing(&[SyntaxNodeKind::List]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{SyntaxTreeBuilder, TextRange};

    /// Builds `de (inc )`
    fn tree() -> SyntaxTree {
        let mut builder = SyntaxTreeBuilder::new();
        builder.token(SyntaxNodeKind::Symbol, "de", TextRange::new(0, 2));
        builder.start_node(SyntaxNodeKind::List, 3);
        builder.token(SyntaxNodeKind::Symbol, "inc", TextRange::new(4, 7));
        builder.finish_node(9);
        builder.finish().unwrap()
    }

    #[test]
    fn test_top_level_token_suggests_new_form() {
        let tree = tree();
        let context = CursorContext::at(&tree, 2).unwrap();
        assert_eq!(tree.text(context.element), Some("de"));
        assert!(context.should_suggest_new_form);
        assert!(!context.is_inside_parentheses);
        assert_eq!(context.mode(), CompletionMode::Template);
    }

    #[test]
    fn test_inside_list_is_general() {
        let tree = tree();
        let context = CursorContext::at(&tree, 8).unwrap();
        assert!(tree.is_kind(context.element, SyntaxNodeKind::List));
        assert!(!context.should_suggest_new_form);
        assert!(context.is_inside_parentheses);
        assert_eq!(context.mode(), CompletionMode::General);
    }

    #[test]
    fn test_contexts_from_the_tree_validate() {
        let tree = tree();
        for offset in 0..=12 {
            let context = CursorContext::at(&tree, offset).unwrap();
            assert_eq!(context.validate(&tree), Ok(()), "offset {}", offset);
        }
    }

    #[test]
    fn test_form_element_is_rejected() {
        let tree = tree();
        let list = tree.elements(tree.root())[1];
        let form = tree.parent(list).unwrap();
        let context = CursorContext {
            element: form,
            offset: 5,
            should_suggest_new_form: false,
            is_inside_parentheses: true,
        };
        assert!(matches!(
            context.validate(&tree),
            Err(CompletionError::UnexpectedNodeKind { found: SyntaxNodeKind::Form, .. })
        ));
    }

    #[test]
    fn test_inconsistent_context_is_rejected() {
        let tree = tree();
        let mut context = CursorContext::at(&tree, 8).unwrap();
        context.is_inside_parentheses = false;
        assert!(matches!(context.validate(&tree), Err(CompletionError::InvalidContext(_))));

        let mut context = CursorContext::at(&tree, 5).unwrap();
        context.offset = 1;
        assert!(matches!(context.validate(&tree), Err(CompletionError::InvalidContext(_))));
    }

    #[test]
    fn test_token_outside_its_list_is_malformed() {
        // `(f` closed at 2 while its child claims 5..8
        let mut builder = SyntaxTreeBuilder::new();
        builder.start_node(SyntaxNodeKind::List, 0);
        builder.token(SyntaxNodeKind::Symbol, "foo", TextRange::new(5, 8));
        builder.finish_node(2);
        let tree = builder.finish().unwrap();

        let symbol = tree.symbols_within(tree.root())[0];
        let context = CursorContext {
            element: symbol,
            offset: 8,
            should_suggest_new_form: false,
            is_inside_parentheses: true,
        };
        assert!(matches!(context.validate(&tree), Err(CompletionError::MalformedTree(_))));
    }
}
