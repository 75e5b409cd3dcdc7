//! Hover tooltips
//!
//! # Architecture
//!
//! ```text
//! User hovers over symbol
//!       ↓
//! GenericHover::hover()
//!       ├─→ Find symbol at offset
//!       ├─→ Render its DocRecord (registry doc or synthesized)
//!       └─→ Return markdown hover, with a range when the source text is known
//! ```

use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};
use ropey::Rope;
use tracing::debug;

use crate::analysis::ScopeAnalyzer;
use crate::ir::SyntaxTree;
use crate::lsp::features::documentation::DocumentationRenderer;
use crate::lsp::features::node_finder::find_symbol_at_offset;
use crate::lsp::position::range_of;

pub struct GenericHover;

impl GenericHover {
    /// Provide hover information at a byte offset
    ///
    /// # Arguments
    /// * `tree` - Syntax tree of the document
    /// * `offset` - Byte offset where hover was requested
    /// * `renderer` - Documentation renderer bound to a registry and analyzer
    /// * `text` - Source text, used to report the hovered range
    ///
    /// # Returns
    /// `Some(Hover)` with markdown documentation, or `None` when no symbol is
    /// under the cursor
    pub fn hover<A: ScopeAnalyzer + ?Sized>(
        &self,
        tree: &SyntaxTree,
        offset: usize,
        renderer: &DocumentationRenderer<'_, A>,
        text: Option<&Rope>,
    ) -> Option<Hover> {
        let Some(symbol) = find_symbol_at_offset(tree, offset) else {
            debug!("no symbol at offset {} for hover", offset);
            return None;
        };
        let doc = renderer.render_doc(tree, symbol)?;

        let range = text
            .zip(tree.range(symbol))
            .and_then(|(text, range)| range_of(text, range));

        debug!("returning hover for {} at {:?}", doc.title, range);
        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: doc.to_markdown(),
            }),
            range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::LexicalScopeAnalyzer;
    use crate::ir::{SyntaxNodeKind, SyntaxTreeBuilder, TextRange};
    use crate::registry::{FunctionEntry, FunctionRegistry};
    use lsp_types::{Position, Range};

    #[test]
    fn test_hover_over_registry_function() {
        let mut builder = SyntaxTreeBuilder::new();
        builder.start_node(SyntaxNodeKind::List, 0);
        builder.token(SyntaxNodeKind::Symbol, "count", TextRange::new(1, 6));
        builder.token(SyntaxNodeKind::Symbol, "xs", TextRange::new(7, 9));
        builder.finish_node(10);
        let tree = builder.finish().unwrap();

        let registry = FunctionRegistry::from_entries(vec![FunctionEntry::new(
            "count",
            "core",
            "(count coll)",
            "Counts the number of elements in a sequence.",
            90,
        )]);
        let analyzer = LexicalScopeAnalyzer::new();
        let renderer = DocumentationRenderer::new(&registry, &analyzer);
        let text = Rope::from_str("(count xs)");

        let hover = GenericHover.hover(&tree, 3, &renderer, Some(&text)).unwrap();
        assert_eq!(
            hover.range,
            Some(Range::new(Position::new(0, 1), Position::new(0, 6)))
        );
        let HoverContents::Markup(content) = hover.contents else {
            panic!("expected markup hover");
        };
        assert!(content.value.starts_with("### count"));
        assert!(content.value.contains("(count coll)"));

        assert!(GenericHover.hover(&tree, 0, &renderer, None).is_none());
    }
}
