//! Read-only syntax tree consumed by the analysis and completion layers
//!
//! The tree is produced by an external parser through [`SyntaxTreeBuilder`]
//! and never mutated afterwards.

pub mod syntax_node;
pub mod syntax_tree;
pub mod tree_builder;

pub use syntax_node::{NodeId, SyntaxNode, SyntaxNodeKind, TextRange};
pub use syntax_tree::{Ancestors, SyntaxTree};
pub use tree_builder::{SyntaxTreeBuilder, TreeError};
