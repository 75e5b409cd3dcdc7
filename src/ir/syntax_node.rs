//! Node types for the read-only Phel syntax tree
//!
//! The tree is produced by an external parser and consumed here without
//! mutation. Node kinds form a closed set: every consumer matches on
//! [`SyntaxNodeKind`] exhaustively, and new kinds are added by extending the
//! enum.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a node inside a [`SyntaxTree`](super::syntax_tree::SyntaxTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminator for syntax nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxNodeKind {
    /// Root of a source file
    File,
    /// Parenthesized expression `( ... )`
    List,
    /// Bracketed expression `[ ... ]`
    Vector,
    /// Braced expression `{ ... }`
    Map,
    /// Generic wrapper around every element of a file, list, vector or map
    Form,
    Symbol,
    Keyword,
    /// Numbers, strings, booleans and `nil`
    Literal,
    /// Region the parser could not make sense of
    Error,
}

impl SyntaxNodeKind {
    /// Leaf kinds carry source text and have no children
    pub fn is_token(self) -> bool {
        matches!(
            self,
            SyntaxNodeKind::Symbol | SyntaxNodeKind::Keyword | SyntaxNodeKind::Literal
        )
    }

    /// Delimited collections that open a new nesting level
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            SyntaxNodeKind::List | SyntaxNodeKind::Vector | SyntaxNodeKind::Map
        )
    }

    /// Kinds whose children are wrapped in [`SyntaxNodeKind::Form`]
    pub fn wraps_children(self) -> bool {
        self == SyntaxNodeKind::File || self.is_collection()
    }
}

impl fmt::Display for SyntaxNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyntaxNodeKind::File => "File",
            SyntaxNodeKind::List => "List",
            SyntaxNodeKind::Vector => "Vector",
            SyntaxNodeKind::Map => "Map",
            SyntaxNodeKind::Form => "Form",
            SyntaxNodeKind::Symbol => "Symbol",
            SyntaxNodeKind::Keyword => "Keyword",
            SyntaxNodeKind::Literal => "Literal",
            SyntaxNodeKind::Error => "Error",
        };
        f.write_str(name)
    }
}

/// Half-open byte range `[start, end)` in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor test for tokens: a cursor sitting right after the last
    /// character still belongs to the token being typed.
    pub fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Cursor test for delimited nodes: strictly between the delimiters
    pub fn strictly_contains(&self, offset: usize) -> bool {
        self.start < offset && offset < self.end
    }

    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A single node in the arena
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub(crate) kind: SyntaxNodeKind,
    pub(crate) range: TextRange,
    pub(crate) text: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// False for a collection whose closing delimiter is missing
    pub(crate) closed: bool,
}

impl SyntaxNode {
    pub fn kind(&self) -> SyntaxNodeKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Source text of a token; `None` for composite nodes
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether a cursor at `offset` belongs to this node
    ///
    /// Tokens include their end offset. Collections need the cursor strictly
    /// between their delimiters, except that an unclosed collection also
    /// owns its end, which is where the user is still typing.
    pub fn claims(&self, offset: usize) -> bool {
        match self.kind {
            SyntaxNodeKind::Symbol
            | SyntaxNodeKind::Keyword
            | SyntaxNodeKind::Literal
            | SyntaxNodeKind::Error => self.range.touches(offset),
            SyntaxNodeKind::List | SyntaxNodeKind::Vector | SyntaxNodeKind::Map => {
                self.range.strictly_contains(offset)
                    || (!self.closed && self.range.start < offset && offset == self.range.end)
            }
            SyntaxNodeKind::File | SyntaxNodeKind::Form => false,
        }
    }
}
