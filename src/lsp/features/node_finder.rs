//! Node lookup by cursor offset
//!
//! Finds the innermost syntax node under a cursor. Tokens claim the offset
//! right after their last character (the cursor position while typing), and
//! delimited collections only claim offsets strictly between their
//! delimiters. A collection left unclosed at the end of input also claims
//! its end offset.

use tracing::trace;

use crate::ir::{NodeId, SyntaxNodeKind, SyntaxTree};

/// Find the innermost node at a byte offset
///
/// Returns the root when no more specific node contains the offset, and
/// `None` only for an empty tree.
///
/// # Algorithm
/// 1. Start at the root
/// 2. Descend into the first child whose range claims the offset, preferring
///    tokens over the collection that follows them (`foo|(bar)`)
/// 3. Stop at the deepest claiming node; form wrappers resolve to what they wrap
pub fn find_node_at_offset(tree: &SyntaxTree, offset: usize) -> Option<NodeId> {
    if tree.is_empty() {
        return None;
    }

    let mut current = tree.root();
    'descend: loop {
        let mut fallback = None;
        for &child in tree.children(current) {
            let inner = tree.unwrap_form(child);
            let Some(node) = tree.node(inner) else {
                continue;
            };
            if !node.claims(offset) {
                continue;
            }
            if node.kind().is_token() {
                trace!("offset {} resolves to token {}", offset, inner);
                current = inner;
                break 'descend;
            }
            if fallback.is_none() {
                fallback = Some(inner);
            }
        }

        match fallback {
            Some(next) => {
                trace!("offset {} descends into {}", offset, next);
                current = next;
            }
            None => break,
        }
    }

    Some(current)
}

/// Find the symbol under the cursor, if the innermost node is one
pub fn find_symbol_at_offset(tree: &SyntaxTree, offset: usize) -> Option<NodeId> {
    let node = find_node_at_offset(tree, offset)?;
    if tree.is_kind(node, SyntaxNodeKind::Symbol) {
        Some(node)
    } else {
        tree.parent_of_type(node, SyntaxNodeKind::Symbol)
    }
}
