//! Completion candidates and insertion templates

use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionItemLabelDetails, Documentation,
    InsertTextFormat, MarkupContent, MarkupKind,
};
use serde::{Deserialize, Serialize};

use crate::analysis::{BindingKind, DefinitionKind};

/// Where a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateKind {
    /// Structural template offered when starting a new form
    Template,
    /// Name bound in an enclosing scope
    Local(BindingKind),
    /// Registry function
    LibraryFunction,
    /// Inert item reporting a failed request
    Placeholder,
}

impl CandidateKind {
    pub fn lsp_kind(&self) -> CompletionItemKind {
        match self {
            CandidateKind::Template => CompletionItemKind::SNIPPET,
            CandidateKind::Local(BindingKind::Parameter | BindingKind::LetBinding) => {
                CompletionItemKind::VARIABLE
            }
            CandidateKind::Local(BindingKind::Definition(kind)) => match kind {
                DefinitionKind::Function | DefinitionKind::Macro => CompletionItemKind::FUNCTION,
                DefinitionKind::Variable => CompletionItemKind::VARIABLE,
                DefinitionKind::Struct => CompletionItemKind::STRUCT,
                DefinitionKind::Generic => CompletionItemKind::REFERENCE,
            },
            CandidateKind::LibraryFunction => CompletionItemKind::FUNCTION,
            CandidateKind::Placeholder => CompletionItemKind::TEXT,
        }
    }
}

/// A named editable region of an insertion template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// Literal insertion text with placeholder regions and a caret position
///
/// Written with markers: `${name}` marks a placeholder whose default text is
/// `name`, `$0` marks where the caret lands. Without `$0` the caret goes to the
/// first placeholder, or the end of the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertTemplate {
    pub text: String,
    pub placeholders: Vec<Placeholder>,
    pub caret: usize,
}

impl InsertTemplate {
    /// Plain text with the caret at the end
    pub fn literal(text: &str) -> Self {
        Self {
            text: text.to_string(),
            placeholders: Vec::new(),
            caret: text.len(),
        }
    }

    pub fn parse(marked: &str) -> Self {
        let mut text = String::with_capacity(marked.len());
        let mut placeholders = Vec::new();
        let mut caret = None;

        let mut rest = marked;
        while let Some(dollar) = rest.find('$') {
            text.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];
            if let Some(tail) = after.strip_prefix('0') {
                caret = Some(text.len());
                rest = tail;
            } else if let Some(body) = after.strip_prefix('{') {
                match body.find('}') {
                    Some(close) => {
                        let name = &body[..close];
                        let start = text.len();
                        text.push_str(name);
                        placeholders.push(Placeholder {
                            name: name.to_string(),
                            start,
                            end: text.len(),
                        });
                        rest = &body[close + 1..];
                    }
                    None => {
                        text.push('$');
                        rest = after;
                    }
                }
            } else {
                text.push('$');
                rest = after;
            }
        }
        text.push_str(rest);

        let caret = caret
            .or_else(|| placeholders.first().map(|p: &Placeholder| p.start))
            .unwrap_or(text.len());
        Self { text, placeholders, caret }
    }

    /// Text with the placeholders' default values, as inserted without snippet support
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    /// LSP snippet syntax: `${1:name}` per placeholder and `$0` at the caret
    ///
    /// Fields are public, so regions that are inverted, out of bounds or off a
    /// char boundary are skipped, as is such a caret.
    pub fn to_snippet(&self) -> String {
        let mut placeholders: Vec<(&Placeholder, &str)> = self
            .placeholders
            .iter()
            .filter_map(|p| Some((p, self.text.get(p.start..p.end)?)))
            .collect();
        placeholders.sort_by_key(|(p, _)| p.start);

        // A caret inside a placeholder is already covered by tab stop 1
        let mut caret_pending = self.text.is_char_boundary(self.caret)
            && !placeholders
                .iter()
                .any(|(p, _)| p.start <= self.caret && self.caret <= p.end);

        let mut snippet = String::with_capacity(self.text.len() + 8 * placeholders.len());
        let mut cursor = 0;
        let mut tab_stop = 0;
        for (placeholder, default) in placeholders {
            if placeholder.start < cursor {
                continue;
            }
            self.push_literal(&mut snippet, cursor, placeholder.start, &mut caret_pending);
            tab_stop += 1;
            snippet.push_str(&format!("${{{}:{}}}", tab_stop, escape_snippet(default)));
            cursor = placeholder.end;
        }
        self.push_literal(&mut snippet, cursor, self.text.len(), &mut caret_pending);
        snippet
    }

    fn push_literal(&self, snippet: &mut String, from: usize, to: usize, caret_pending: &mut bool) {
        let slice = |a: usize, b: usize| self.text.get(a..b).unwrap_or_default();
        if *caret_pending && from <= self.caret && self.caret <= to {
            snippet.push_str(&escape_snippet(slice(from, self.caret)));
            snippet.push_str("$0");
            snippet.push_str(&escape_snippet(slice(self.caret, to)));
            *caret_pending = false;
        } else {
            snippet.push_str(&escape_snippet(slice(from, to)));
        }
    }
}

fn escape_snippet(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '$' | '}' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// One suggested completion item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCandidate {
    pub label: String,
    /// Short type hint (signature, binding kind or template shape)
    pub type_text: String,
    /// Text shown after the label: the failure on placeholders, a marker on locals
    pub tail_text: Option<String>,
    pub priority: i32,
    pub kind: CandidateKind,
    /// Registry namespace, for library functions
    pub namespace: Option<String>,
    pub documentation: Option<String>,
    pub insert_template: Option<InsertTemplate>,
}

impl CompletionCandidate {
    /// Convert to LSP CompletionItem
    ///
    /// `sort_order` is the candidate's position in the ranked output; it is
    /// encoded in `sort_text` so clients keep the engine's order.
    pub fn to_completion_item(&self, sort_order: usize) -> CompletionItem {
        let mut item = CompletionItem {
            label: self.label.clone(),
            kind: Some(self.kind.lsp_kind()),
            detail: Some(self.type_text.clone()),
            ..Default::default()
        };

        if self.tail_text.is_some() || self.namespace.is_some() {
            item.label_details = Some(CompletionItemLabelDetails {
                detail: self.tail_text.clone(),
                description: self.namespace.clone(),
            });
        }

        if let Some(ref doc) = self.documentation {
            item.documentation = Some(Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: doc.clone(),
            }));
        }

        if let Some(ref template) = self.insert_template {
            if template.placeholders.is_empty() && template.caret == template.text.len() {
                item.insert_text = Some(template.text.clone());
                item.insert_text_format = Some(InsertTextFormat::PLAIN_TEXT);
            } else {
                item.insert_text = Some(template.to_snippet());
                item.insert_text_format = Some(InsertTextFormat::SNIPPET);
            }
        }

        if self.kind == CandidateKind::Placeholder {
            item.filter_text = Some(self.label.clone());
        }

        // Sort text ensures proper ordering (lower numbers first)
        item.sort_text = Some(format!("{:04}", sort_order));

        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placeholders_and_caret() {
        let template = InsertTemplate::parse("(def ${name} ${value})");
        assert_eq!(template.text, "(def name value)");
        assert_eq!(template.placeholders.len(), 2);
        assert_eq!(&template.text[template.placeholders[1].start..template.placeholders[1].end], "value");
        assert_eq!(template.caret, 5);

        let parens = InsertTemplate::parse("($0)");
        assert_eq!(parens.text, "()");
        assert_eq!(parens.caret, 1);
        assert!(parens.placeholders.is_empty());
    }

    #[test]
    fn test_snippet_conversion() {
        let template = InsertTemplate::parse("(fn [${args}] ${body})");
        assert_eq!(template.to_snippet(), "(fn [${1:args}] ${2:body})");

        let parens = InsertTemplate::parse("($0)");
        assert_eq!(parens.to_snippet(), "($0)");
    }

    #[test]
    fn test_snippet_escapes_literal_dollars() {
        let template = InsertTemplate::parse("(php/aget $x ${index})");
        assert_eq!(template.text, "(php/aget $x index)");
        assert_eq!(template.to_snippet(), "(php/aget \\$x ${1:index})");
    }

    #[test]
    fn test_snippet_skips_invalid_regions() {
        let template = InsertTemplate {
            text: "(é x)".to_string(),
            placeholders: vec![
                Placeholder { name: "inverted".to_string(), start: 4, end: 2 },
                Placeholder { name: "split".to_string(), start: 2, end: 3 },
                Placeholder { name: "x".to_string(), start: 4, end: 5 },
                Placeholder { name: "past".to_string(), start: 9, end: 12 },
            ],
            caret: 2,
        };
        assert_eq!(template.to_snippet(), "(é ${1:x})");

        let template = InsertTemplate {
            text: "(inc )".to_string(),
            placeholders: Vec::new(),
            caret: 40,
        };
        assert_eq!(template.to_snippet(), "(inc )");
    }

    #[test]
    fn test_placeholder_item_is_inert() {
        let candidate = CompletionCandidate {
            label: "⚠️ Malformed syntax".to_string(),
            type_text: String::new(),
            tail_text: Some(" - Completion failed".to_string()),
            priority: 0,
            kind: CandidateKind::Placeholder,
            namespace: None,
            documentation: None,
            insert_template: Some(InsertTemplate::literal("")),
        };
        let item = candidate.to_completion_item(0);
        assert_eq!(item.insert_text.as_deref(), Some(""));
        assert_eq!(item.kind, Some(CompletionItemKind::TEXT));
        assert_eq!(item.sort_text.as_deref(), Some("0000"));
        assert_eq!(
            item.label_details.and_then(|details| details.detail).as_deref(),
            Some(" - Completion failed")
        );
    }
}
