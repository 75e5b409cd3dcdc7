//! Request boundary for completion and documentation
//!
//! Every public entry point returns a best-effort result. Errors from the
//! builder steps and panics anywhere below are caught here, logged, and
//! turned into a single inert placeholder completion (or no documentation).

use std::panic::{catch_unwind, AssertUnwindSafe};

use lsp_types::{CompletionItem, Hover};
use ropey::Rope;
use tracing::{debug, error, warn};

use crate::analysis::{LexicalScopeAnalyzer, ScopeAnalyzer, SymbolCategory, SymbolClassifier};
use crate::config::{CompletionConfig, EngineConfig};
use crate::ir::SyntaxTree;
use crate::lsp::error::{panic_message, CompletionError};
use crate::lsp::features::completion::{
    CandidateKind, CompletionBuilder, CompletionCandidate, CursorContext, InsertTemplate,
};
use crate::lsp::features::documentation::{DocRecord, DocumentationRenderer};
use crate::lsp::features::hover::GenericHover;
use crate::lsp::features::node_finder::find_symbol_at_offset;
use crate::registry::FunctionRegistry;

pub struct PhelEngine<A: ScopeAnalyzer = LexicalScopeAnalyzer> {
    registry: FunctionRegistry,
    analyzer: A,
    config: CompletionConfig,
}

impl PhelEngine<LexicalScopeAnalyzer> {
    pub fn new(registry: FunctionRegistry) -> Self {
        Self::with_analyzer(registry, LexicalScopeAnalyzer::new())
    }

    /// Engine over the compiled-in registry
    pub fn builtin() -> Self {
        Self::new(FunctionRegistry::builtin())
    }
}

impl<A: ScopeAnalyzer> PhelEngine<A> {
    pub fn with_analyzer(registry: FunctionRegistry, analyzer: A) -> Self {
        Self {
            registry,
            analyzer,
            config: CompletionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.config = config.completion.clone();
        self
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Ordered completion candidates at a byte offset
    pub fn provide_completions(&self, tree: &SyntaxTree, offset: usize) -> Vec<CompletionCandidate> {
        match CursorContext::at(tree, offset) {
            Some(context) => self.complete(tree, &context),
            None => {
                debug!("no completion context at offset {}", offset);
                Vec::new()
            }
        }
    }

    /// Ordered completion candidates for a context supplied by the host
    pub fn complete(&self, tree: &SyntaxTree, context: &CursorContext) -> Vec<CompletionCandidate> {
        let builder = CompletionBuilder::new(&self.registry, &self.analyzer)
            .with_local_symbols(self.config.local_symbols);

        let error = match catch_unwind(AssertUnwindSafe(|| builder.build_candidates(tree, context))) {
            Ok(Ok(candidates)) => return candidates,
            Ok(Err(e)) => {
                warn!("completion failed at offset {}: {}", context.offset, e);
                e
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("completion panicked at offset {}: {}", context.offset, message);
                CompletionError::Internal(message)
            }
        };

        if self.config.error_placeholders {
            vec![placeholder_candidate(&error)]
        } else {
            Vec::new()
        }
    }

    /// Completion items ready for an LSP response, ordered through `sort_text`
    pub fn completion_items(&self, tree: &SyntaxTree, offset: usize) -> Vec<CompletionItem> {
        self.provide_completions(tree, offset)
            .iter()
            .enumerate()
            .map(|(order, candidate)| candidate.to_completion_item(order))
            .collect()
    }

    /// `"name signature"` for the registry function under the cursor
    pub fn provide_quick_info(&self, tree: &SyntaxTree, offset: usize) -> Option<String> {
        self.guarded("quick info", offset, || {
            let symbol = find_symbol_at_offset(tree, offset)?;
            self.renderer().quick_info(tree, symbol)
        })
    }

    pub fn provide_documentation(&self, tree: &SyntaxTree, offset: usize) -> Option<DocRecord> {
        self.guarded("documentation", offset, || {
            let symbol = find_symbol_at_offset(tree, offset)?;
            self.renderer().render_doc(tree, symbol)
        })
    }

    /// Markdown hover; `text` lets the hover carry the symbol's range
    pub fn provide_hover(&self, tree: &SyntaxTree, offset: usize, text: Option<&Rope>) -> Option<Hover> {
        self.guarded("hover", offset, || {
            GenericHover.hover(tree, offset, &self.renderer(), text)
        })
    }

    /// Category of the symbol under the cursor
    pub fn classify_at(&self, tree: &SyntaxTree, offset: usize) -> Option<SymbolCategory> {
        self.guarded("classification", offset, || {
            let symbol = find_symbol_at_offset(tree, offset)?;
            Some(SymbolClassifier::new(&self.registry, &self.analyzer).classify(tree, symbol))
        })
    }

    fn renderer(&self) -> DocumentationRenderer<'_, A> {
        DocumentationRenderer::new(&self.registry, &self.analyzer)
    }

    fn guarded<T>(&self, request: &str, offset: usize, f: impl FnOnce() -> Option<T>) -> Option<T> {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => result,
            Err(payload) => {
                error!(
                    "{} request panicked at offset {}: {}",
                    request,
                    offset,
                    panic_message(payload.as_ref())
                );
                None
            }
        }
    }
}

/// Inert completion item describing a failed request; inserting it inserts nothing
pub fn placeholder_candidate(error: &CompletionError) -> CompletionCandidate {
    CompletionCandidate {
        label: error.placeholder_label().to_string(),
        type_text: String::new(),
        tail_text: Some(error.placeholder_tail()),
        priority: 0,
        kind: CandidateKind::Placeholder,
        namespace: None,
        documentation: None,
        insert_template: Some(InsertTemplate::literal("")),
    }
}
