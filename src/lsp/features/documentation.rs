//! Documentation records for hover and quick info
//!
//! Resolution order for a symbol:
//! 1. registry documentation for the symbol's literal text wins outright
//! 2. otherwise a minimal record is synthesized from the symbol's category,
//!    with the registry signature if any, else the bare symbol text

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{ScopeAnalyzer, SymbolCategory, SymbolClassifier};
use crate::ir::{NodeId, SyntaxNodeKind, SyntaxTree};
use crate::registry::{FunctionEntry, FunctionRegistry};

pub const UNDOCUMENTED_BODY: &str = "Documentation not available for this symbol.";

/// Structured documentation for one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    pub title: String,
    pub signature_line: String,
    pub body_text: String,
    /// Set on synthesized records only
    pub category: Option<SymbolCategory>,
}

impl DocRecord {
    pub fn from_entry(entry: &FunctionEntry) -> Self {
        Self {
            title: entry.name.clone(),
            signature_line: entry.signature.clone(),
            body_text: entry.description.clone(),
            category: None,
        }
    }

    /// HTML fragment in the layout IDE documentation popups expect
    pub fn to_html(&self) -> String {
        let mut html = String::from("<html><body>");
        html.push_str(&format!("<h3>{}</h3>", escape_html(&self.title)));
        if let Some(category) = self.category {
            html.push_str(&format!("<p><b>Type:</b> {}</p>", escape_html(category.label())));
        }
        html.push_str(&format!(
            "<p><b>Signature:</b> <code>{}</code></p>",
            escape_html(&self.signature_line)
        ));
        html.push_str(&format!("<p>{}</p>", escape_html(&self.body_text)));
        html.push_str("</body></html>");
        html
    }

    pub fn to_markdown(&self) -> String {
        let mut markdown = format!("### {}\n\n", self.title);
        if let Some(category) = self.category {
            markdown.push_str(&format!("*{}*\n\n", category.label()));
        }
        markdown.push_str(&format!("```phel\n{}\n```\n\n", self.signature_line));
        markdown.push_str(&self.body_text);
        markdown
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub struct DocumentationRenderer<'a, A: ScopeAnalyzer + ?Sized> {
    registry: &'a FunctionRegistry,
    classifier: SymbolClassifier<'a, A>,
}

impl<'a, A: ScopeAnalyzer + ?Sized> DocumentationRenderer<'a, A> {
    pub fn new(registry: &'a FunctionRegistry, analyzer: &'a A) -> Self {
        Self {
            registry,
            classifier: SymbolClassifier::new(registry, analyzer),
        }
    }

    /// Documentation for a symbol node; `None` when the node is not a symbol
    pub fn render_doc(&self, tree: &SyntaxTree, symbol: NodeId) -> Option<DocRecord> {
        let name = symbol_text(tree, symbol)?;

        if let Some(entry) = self.registry.get_function(name) {
            debug!("registry documentation for {}", name);
            return Some(DocRecord::from_entry(entry));
        }

        let category = self.classifier.classify(tree, symbol);
        debug!("synthesized documentation for {} ({})", name, category);
        Some(DocRecord {
            title: name.to_string(),
            signature_line: name.to_string(),
            body_text: UNDOCUMENTED_BODY.to_string(),
            category: Some(category),
        })
    }

    /// Single-line `"name signature"` summary, only for registry functions
    pub fn quick_info(&self, tree: &SyntaxTree, symbol: NodeId) -> Option<String> {
        let name = symbol_text(tree, symbol)?;
        let entry = self.registry.get_function(name)?;
        Some(format!("{} {}", name, entry.signature))
    }
}

fn symbol_text(tree: &SyntaxTree, symbol: NodeId) -> Option<&str> {
    tree.node(symbol)
        .filter(|node| node.kind() == SyntaxNodeKind::Symbol)
        .and_then(|node| node.text())
        .filter(|text| !text.is_empty())
}
