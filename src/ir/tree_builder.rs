//! Event-style construction of a [`SyntaxTree`]
//!
//! An external parser drives the builder with `start_node` / `token` /
//! `finish_node` events carrying byte offsets. Every element of a file or
//! collection is wrapped in a `Form` node automatically, so consumers see the
//! same shape regardless of which parser produced the events.

use thiserror::Error;

use super::syntax_node::{NodeId, SyntaxNode, SyntaxNodeKind, TextRange};
use super::syntax_tree::SyntaxTree;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("{count} node(s) were started but never finished")]
    Unbalanced { count: usize },

    #[error("finish_node at offset {offset} without a matching start_node")]
    UnmatchedFinish { offset: usize },

    #[error("{kind} cannot be used as a {role}")]
    InvalidKind { kind: SyntaxNodeKind, role: &'static str },

    #[error("range {start}..{end} ends before it starts")]
    InvertedRange { start: usize, end: usize },
}

struct OpenNode {
    node: NodeId,
    form: Option<NodeId>,
}

pub struct SyntaxTreeBuilder {
    nodes: Vec<SyntaxNode>,
    stack: Vec<OpenNode>,
    error: Option<TreeError>,
}

impl Default for SyntaxTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        let root = SyntaxNode {
            kind: SyntaxNodeKind::File,
            range: TextRange::default(),
            text: None,
            parent: None,
            children: Vec::new(),
            closed: true,
        };
        Self {
            nodes: vec![root],
            stack: vec![OpenNode { node: NodeId(0), form: None }],
            error: None,
        }
    }

    /// Opens a composite node (`List`, `Vector`, `Map` or `Error`) at `offset`
    pub fn start_node(&mut self, kind: SyntaxNodeKind, offset: usize) {
        if !(kind.is_collection() || kind == SyntaxNodeKind::Error) {
            self.fail(TreeError::InvalidKind { kind, role: "composite node" });
            return;
        }
        let (parent, form) = self.attach_point(offset);
        let node = self.push(kind, TextRange::new(offset, offset), None, parent);
        self.stack.push(OpenNode { node, form });
    }

    /// Adds a leaf (`Symbol`, `Keyword`, `Literal` or `Error`)
    pub fn token(&mut self, kind: SyntaxNodeKind, text: &str, range: TextRange) {
        if !(kind.is_token() || kind == SyntaxNodeKind::Error) {
            self.fail(TreeError::InvalidKind { kind, role: "token" });
            return;
        }
        if range.end < range.start {
            self.fail(TreeError::InvertedRange { start: range.start, end: range.end });
            return;
        }
        let (parent, form) = self.attach_point(range.start);
        self.push(kind, range, Some(text.to_string()), parent);
        if let Some(form) = form {
            self.nodes[form.index()].range.end = range.end;
        }
    }

    /// Closes the innermost open node; `end` is the offset after its closing delimiter
    pub fn finish_node(&mut self, end: usize) {
        self.close(end, true);
    }

    /// Closes the innermost open node whose closing delimiter is missing
    ///
    /// Parsers emit this for collections still open at the end of input;
    /// `end` is normally the input length.
    pub fn finish_unclosed(&mut self, end: usize) {
        self.close(end, false);
    }

    pub fn finish(mut self) -> Result<SyntaxTree, TreeError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        if self.stack.len() > 1 {
            return Err(TreeError::Unbalanced { count: self.stack.len() - 1 });
        }
        let end = self.nodes.iter().map(|node| node.range.end).max().unwrap_or(0);
        self.nodes[0].range = TextRange::new(0, end);
        Ok(SyntaxTree {
            nodes: self.nodes,
            root: NodeId(0),
        })
    }

    fn close(&mut self, end: usize, closed: bool) {
        if self.stack.len() <= 1 {
            self.fail(TreeError::UnmatchedFinish { offset: end });
            return;
        }
        let Some(open) = self.stack.pop() else {
            return;
        };
        let node = &mut self.nodes[open.node.index()];
        if end < node.range.start {
            let start = node.range.start;
            self.fail(TreeError::InvertedRange { start, end });
            return;
        }
        node.range.end = end;
        node.closed = closed;
        if let Some(form) = open.form {
            self.nodes[form.index()].range.end = end;
        }
    }

    /// Parent for the next child, creating the form wrapper when needed
    fn attach_point(&mut self, offset: usize) -> (NodeId, Option<NodeId>) {
        let parent = self.stack.last().map(|open| open.node).unwrap_or(NodeId(0));
        if self.nodes[parent.index()].kind.wraps_children() {
            let form = self.push(
                SyntaxNodeKind::Form,
                TextRange::new(offset, offset),
                None,
                parent,
            );
            (form, Some(form))
        } else {
            (parent, None)
        }
    }

    fn push(
        &mut self,
        kind: SyntaxNodeKind,
        range: TextRange,
        text: Option<String>,
        parent: NodeId,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode {
            kind,
            range,
            text,
            parent: Some(parent),
            children: Vec::new(),
            closed: true,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    fn fail(&mut self, error: TreeError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}
