//! Structural templates offered when the cursor starts a new form

use super::candidate::{CandidateKind, CompletionCandidate, InsertTemplate};

/// `(label, type text, marked insertion text)` in presentation order
const STRUCTURAL_TEMPLATES: &[(&str, &str, &str)] = &[
    ("()", "(...)", "($0)"),
    ("defn", "(defn name [args] body)", "(defn ${name} [${args}]\n  ${body})"),
    ("def", "(def name value)", "(def ${name} ${value})"),
    ("let", "(let [bindings] body)", "(let [${bindings}]\n  ${body})"),
    ("if", "(if condition then else)", "(if ${condition}\n  ${then}\n  ${else})"),
    ("fn", "(fn [args] body)", "(fn [${args}] ${body})"),
];

/// The fixed template list; independent of the registry and of the tree
pub fn template_candidates() -> Vec<CompletionCandidate> {
    let count = STRUCTURAL_TEMPLATES.len() as i32;
    STRUCTURAL_TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, (label, type_text, marked))| CompletionCandidate {
            label: (*label).to_string(),
            type_text: (*type_text).to_string(),
            tail_text: None,
            priority: count - index as i32,
            kind: CandidateKind::Template,
            namespace: None,
            documentation: None,
            insert_template: Some(InsertTemplate::parse(marked)),
        })
        .collect()
}
