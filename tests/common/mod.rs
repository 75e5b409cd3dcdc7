//! Shared fixtures: turns reader output into engine syntax trees

#![allow(dead_code)]

use phel_language_tools::ir::{NodeId, SyntaxNodeKind, SyntaxTree, SyntaxTreeBuilder, TextRange};
use test_utils::ir::{read, read_fixture, NodeKind, ReadNode};

pub struct Source {
    pub text: String,
    pub tree: SyntaxTree,
    pub cursor: usize,
}

/// Parse a fixture with a `|` cursor marker
pub fn fixture(marked: &str) -> Source {
    let fixture = read_fixture(marked).expect("fixture should read");
    let tree = build_tree(&fixture.forms);
    Source {
        cursor: fixture.cursor.unwrap_or(fixture.source.len()),
        text: fixture.source,
        tree,
    }
}

/// Parse plain source; `None` when the reader rejects it
pub fn parse(source: &str) -> Option<SyntaxTree> {
    read(source).ok().map(|forms| build_tree(&forms))
}

pub fn build_tree(forms: &[ReadNode]) -> SyntaxTree {
    let mut builder = SyntaxTreeBuilder::new();
    for form in forms {
        feed(&mut builder, form);
    }
    builder.finish().expect("reader output is balanced")
}

fn feed(builder: &mut SyntaxTreeBuilder, node: &ReadNode) {
    match node.kind {
        NodeKind::List | NodeKind::Vector | NodeKind::Map => {
            let kind = match node.kind {
                NodeKind::List => SyntaxNodeKind::List,
                NodeKind::Vector => SyntaxNodeKind::Vector,
                _ => SyntaxNodeKind::Map,
            };
            builder.start_node(kind, node.start);
            for child in &node.children {
                feed(builder, child);
            }
            if node.closed {
                builder.finish_node(node.end);
            } else {
                builder.finish_unclosed(node.end);
            }
        }
        NodeKind::Symbol | NodeKind::Keyword | NodeKind::Literal => {
            let kind = match node.kind {
                NodeKind::Symbol => SyntaxNodeKind::Symbol,
                NodeKind::Keyword => SyntaxNodeKind::Keyword,
                _ => SyntaxNodeKind::Literal,
            };
            let text = node.text.as_deref().unwrap_or_default();
            builder.token(kind, text, TextRange::new(node.start, node.end));
        }
    }
}

/// The `occurrence`-th symbol (0-based, source order) with the given text
pub fn nth_symbol(tree: &SyntaxTree, name: &str, occurrence: usize) -> NodeId {
    tree.symbols_within(tree.root())
        .into_iter()
        .filter(|&id| tree.text(id) == Some(name))
        .nth(occurrence)
        .unwrap_or_else(|| panic!("no occurrence {} of symbol {}", occurrence, name))
}

pub fn labels<T: AsRef<str>>(labels: impl IntoIterator<Item = T>) -> Vec<String> {
    labels.into_iter().map(|label| label.as_ref().to_string()).collect()
}
