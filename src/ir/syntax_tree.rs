//! Immutable arena tree with parent/child navigation
//!
//! All accessors are total: an id that does not belong to the tree, or a
//! node that lacks the expected ancestor or child, yields `None` or an empty
//! slice. Callers treat that as "not applicable" rather than as a failure.

use super::syntax_node::{NodeId, SyntaxNode, SyntaxNodeKind, TextRange};

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) nodes: Vec<SyntaxNode>,
    pub(crate) root: NodeId,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> Option<SyntaxNodeKind> {
        self.node(id).map(SyntaxNode::kind)
    }

    pub fn range(&self, id: NodeId) -> Option<TextRange> {
        self.node(id).map(SyntaxNode::range)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(SyntaxNode::text)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(SyntaxNode::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(SyntaxNode::children).unwrap_or(&[])
    }

    pub fn is_kind(&self, id: NodeId, kind: SyntaxNodeKind) -> bool {
        self.kind(id) == Some(kind)
    }

    /// Strict ancestors, innermost first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Nearest strict ancestor of the given kind
    pub fn parent_of_type(&self, id: NodeId, kind: SyntaxNodeKind) -> Option<NodeId> {
        self.ancestors(id).find(|&ancestor| self.is_kind(ancestor, kind))
    }

    /// First direct child of the given kind
    pub fn first_child_of_type(&self, id: NodeId, kind: SyntaxNodeKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.is_kind(child, kind))
    }

    /// First descendant of the given kind in depth-first pre-order
    pub fn find_child_of_type(&self, id: NodeId, kind: SyntaxNodeKind) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.is_kind(current, kind) {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        None
    }

    pub fn nearest_ancestor_list(&self, id: NodeId) -> Option<NodeId> {
        self.parent_of_type(id, SyntaxNodeKind::List)
    }

    /// Unwraps a `Form` to the node it wraps; other nodes are returned as is
    pub fn unwrap_form(&self, id: NodeId) -> NodeId {
        match self.kind(id) {
            Some(SyntaxNodeKind::Form) => self.children(id).first().copied().unwrap_or(id),
            _ => id,
        }
    }

    /// Elements of a file or collection with their form wrappers removed
    pub fn elements(&self, container: NodeId) -> Vec<NodeId> {
        self.children(container)
            .iter()
            .map(|&child| self.unwrap_form(child))
            .collect()
    }

    /// Operator text of a list: the first symbol inside its first form
    pub fn list_operator(&self, list: NodeId) -> Option<&str> {
        if !self.is_kind(list, SyntaxNodeKind::List) {
            return None;
        }
        let first_form = self.find_child_of_type(list, SyntaxNodeKind::Form)?;
        let symbol = self.find_child_of_type(first_form, SyntaxNodeKind::Symbol)?;
        self.text(symbol)
    }

    /// The element of `container` (unwrapped) that contains `descendant`,
    /// together with its index
    pub fn enclosing_element(&self, container: NodeId, descendant: NodeId) -> Option<(usize, NodeId)> {
        let mut current = descendant;
        loop {
            let parent = self.parent(current)?;
            if parent == container {
                return self
                    .elements(container)
                    .iter()
                    .position(|&element| element == self.unwrap_form(current))
                    .map(|index| (index, self.unwrap_form(current)));
            }
            current = parent;
        }
    }

    /// All symbols at or below `id`, in source order
    pub fn symbols_within(&self, id: NodeId) -> Vec<NodeId> {
        let mut symbols = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.is_kind(current, SyntaxNodeKind::Symbol) {
                symbols.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        symbols
    }
}

/// Iterator over strict ancestors
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::tree_builder::SyntaxTreeBuilder;

    /// Builds `(defn foo [x] x)`
    fn defn_tree() -> SyntaxTree {
        let mut builder = SyntaxTreeBuilder::new();
        builder.start_node(SyntaxNodeKind::List, 0);
        builder.token(SyntaxNodeKind::Symbol, "defn", TextRange::new(1, 5));
        builder.token(SyntaxNodeKind::Symbol, "foo", TextRange::new(6, 9));
        builder.start_node(SyntaxNodeKind::Vector, 10);
        builder.token(SyntaxNodeKind::Symbol, "x", TextRange::new(11, 12));
        builder.finish_node(13);
        builder.token(SyntaxNodeKind::Symbol, "x", TextRange::new(14, 15));
        builder.finish_node(16);
        builder.finish().expect("balanced tree")
    }

    #[test]
    fn test_list_operator() {
        let tree = defn_tree();
        let list = tree.elements(tree.root())[0];
        assert_eq!(tree.list_operator(list), Some("defn"));
        assert_eq!(tree.list_operator(tree.root()), None);
    }

    #[test]
    fn test_ancestor_queries() {
        let tree = defn_tree();
        let list = tree.elements(tree.root())[0];
        let vector = tree.elements(list)[2];
        let param = tree.elements(vector)[0];

        assert_eq!(tree.text(param), Some("x"));
        assert_eq!(tree.parent_of_type(param, SyntaxNodeKind::Vector), Some(vector));
        assert_eq!(tree.nearest_ancestor_list(param), Some(list));
        assert_eq!(tree.parent_of_type(param, SyntaxNodeKind::Map), None);
        assert_eq!(tree.enclosing_element(list, param), Some((2, vector)));
    }

    #[test]
    fn test_unknown_ids_are_not_applicable() {
        let tree = defn_tree();
        let bogus = NodeId(10_000);
        assert!(tree.node(bogus).is_none());
        assert!(tree.children(bogus).is_empty());
        assert_eq!(tree.ancestors(bogus).count(), 0);
        assert_eq!(tree.nearest_ancestor_list(bogus), None);
    }

    #[test]
    fn test_symbols_within_in_source_order() {
        let tree = defn_tree();
        let names: Vec<_> = tree
            .symbols_within(tree.root())
            .into_iter()
            .filter_map(|id| tree.text(id))
            .collect();
        assert_eq!(names, vec!["defn", "foo", "x", "x"]);
    }
}
