//! Errors raised by completion steps and their user-visible placeholders

use std::any::Any;

use thiserror::Error;

use crate::ir::{NodeId, SyntaxNodeKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("node {node} is missing from the syntax tree ({context})")]
    DanglingNode { node: NodeId, context: String },

    #[error("malformed syntax: {0}")]
    MalformedTree(String),

    #[error("expected {expected} node, found {found}")]
    UnexpectedNodeKind {
        expected: &'static str,
        found: SyntaxNodeKind,
    },

    #[error("invalid completion context: {0}")]
    InvalidContext(String),

    #[error("{0}")]
    Internal(String),
}

impl CompletionError {
    /// Label of the inert completion item reporting this error
    pub fn placeholder_label(&self) -> &'static str {
        match self {
            CompletionError::DanglingNode { .. } => "⚠️ Syntax tree issue",
            CompletionError::MalformedTree(_) => "⚠️ Malformed syntax",
            CompletionError::UnexpectedNodeKind { .. } => "⚠️ Type mismatch",
            CompletionError::InvalidContext(_) | CompletionError::Internal(_) => "❌ Completion error",
        }
    }

    /// Tail text shown after the placeholder label
    pub fn placeholder_tail(&self) -> String {
        let description = match self {
            CompletionError::DanglingNode { context, .. } => {
                format!("Completion failed due to a missing syntax node in {}", context)
            }
            CompletionError::MalformedTree(_) => {
                "Completion failed due to unexpected syntax structure".to_string()
            }
            CompletionError::UnexpectedNodeKind { .. } => {
                "Completion failed due to unexpected syntax node type".to_string()
            }
            other => format!("Unexpected error: {}", other),
        };
        format!(" - {}", description)
    }
}

/// Message carried by a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_labels() {
        let dangling = CompletionError::DanglingNode {
            node: NodeId(7),
            context: "cursor context".to_string(),
        };
        assert_eq!(dangling.placeholder_label(), "⚠️ Syntax tree issue");
        assert_eq!(
            dangling.placeholder_tail(),
            " - Completion failed due to a missing syntax node in cursor context"
        );

        let mismatch = CompletionError::UnexpectedNodeKind {
            expected: "token or collection",
            found: SyntaxNodeKind::Form,
        };
        assert_eq!(mismatch.placeholder_label(), "⚠️ Type mismatch");
        assert_eq!(mismatch.to_string(), "expected token or collection node, found Form");

        let internal = CompletionError::Internal("boom".to_string());
        assert_eq!(internal.placeholder_label(), "❌ Completion error");
        assert_eq!(internal.placeholder_tail(), " - Unexpected error: boom");
    }

    #[test]
    fn test_context_errors() {
        let malformed = CompletionError::MalformedTree("List at 0..2 extends beyond".to_string());
        assert_eq!(malformed.placeholder_label(), "⚠️ Malformed syntax");
        assert_eq!(
            malformed.placeholder_tail(),
            " - Completion failed due to unexpected syntax structure"
        );

        let invalid = CompletionError::InvalidContext("offset 9 lies outside Symbol 1..4".to_string());
        assert_eq!(invalid.placeholder_label(), "❌ Completion error");
        assert_eq!(
            invalid.placeholder_tail(),
            " - Unexpected error: invalid completion context: offset 9 lies outside Symbol 1..4"
        );
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&"owned".to_string()), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }
}
