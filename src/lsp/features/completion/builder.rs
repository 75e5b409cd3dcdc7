//! Completion candidate assembly
//!
//! Template mode returns the fixed structural templates. General mode
//! returns locally visible symbols followed by registry functions grouped
//! by namespace. A failure or panic while collecting local symbols only
//! empties the local section; the registry section is always produced.

use std::panic::{catch_unwind, AssertUnwindSafe};

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use super::candidate::{CandidateKind, CompletionCandidate};
use super::context::{CompletionMode, CursorContext};
use super::ranking::{rank_library_candidates, LOCAL_SYMBOL_PRIORITY, NAMESPACE_ORDER};
use super::templates::template_candidates;
use crate::analysis::{BindingKind, LocalSymbol, ScopeAnalyzer};
use crate::ir::SyntaxTree;
use crate::lsp::error::{panic_message, CompletionError};
use crate::registry::{FunctionEntry, FunctionRegistry};

pub struct CompletionBuilder<'a, A: ScopeAnalyzer + ?Sized> {
    registry: &'a FunctionRegistry,
    analyzer: &'a A,
    include_local_symbols: bool,
}

impl<'a, A: ScopeAnalyzer + ?Sized> CompletionBuilder<'a, A> {
    pub fn new(registry: &'a FunctionRegistry, analyzer: &'a A) -> Self {
        Self {
            registry,
            analyzer,
            include_local_symbols: true,
        }
    }

    pub fn with_local_symbols(mut self, enabled: bool) -> Self {
        self.include_local_symbols = enabled;
        self
    }

    /// Ordered candidates for a cursor context
    ///
    /// Deterministic: the same tree, registry and context always give the
    /// same output.
    pub fn build_candidates(
        &self,
        tree: &SyntaxTree,
        context: &CursorContext,
    ) -> Result<Vec<CompletionCandidate>, CompletionError> {
        context.validate(tree)?;

        match context.mode() {
            CompletionMode::Template => Ok(template_candidates()),
            CompletionMode::General => {
                let mut candidates = if self.include_local_symbols {
                    self.local_candidates(tree, context)
                } else {
                    Vec::new()
                };
                let local_count = candidates.len();
                candidates.extend(self.library_candidates());
                debug!(
                    "general completion at {}: {} local, {} library",
                    context.offset,
                    local_count,
                    candidates.len() - local_count
                );
                Ok(candidates)
            }
        }
    }

    fn local_candidates(&self, tree: &SyntaxTree, context: &CursorContext) -> Vec<CompletionCandidate> {
        let lookup = catch_unwind(AssertUnwindSafe(|| {
            self.analyzer
                .local_symbols_visible_at(tree, context.element, context.offset)
        }));
        let symbols = match lookup {
            Ok(Ok(symbols)) => symbols,
            Ok(Err(e)) => {
                warn!("local symbol lookup failed at {}, continuing without locals: {}", context.offset, e);
                return Vec::new();
            }
            Err(payload) => {
                warn!(
                    "local symbol lookup panicked at {}, continuing without locals: {}",
                    context.offset,
                    panic_message(payload.as_ref())
                );
                return Vec::new();
            }
        };

        let mut seen: FxHashSet<String> = FxHashSet::default();
        symbols
            .into_iter()
            .filter(|symbol| seen.insert(symbol.name.clone()))
            .map(local_candidate)
            .collect()
    }

    fn library_candidates(&self) -> Vec<CompletionCandidate> {
        let candidates = NAMESPACE_ORDER
            .iter()
            .flat_map(|namespace| self.registry.get_functions(namespace))
            .map(library_candidate)
            .collect();
        rank_library_candidates(candidates)
    }
}

/// Sets a local apart from a registry function with the same label
pub const LOCAL_TAIL_TEXT: &str = " (local)";

fn local_candidate(symbol: LocalSymbol) -> CompletionCandidate {
    let type_text = match symbol.kind {
        BindingKind::Parameter => "parameter".to_string(),
        BindingKind::LetBinding if symbol.binding_form == "let" || symbol.binding_form.is_empty() => {
            "let binding".to_string()
        }
        BindingKind::LetBinding | BindingKind::Definition(_) => symbol.binding_form.clone(),
    };
    CompletionCandidate {
        label: symbol.name,
        type_text,
        tail_text: Some(LOCAL_TAIL_TEXT.to_string()),
        priority: LOCAL_SYMBOL_PRIORITY,
        kind: CandidateKind::Local(symbol.kind),
        namespace: None,
        documentation: None,
        insert_template: None,
    }
}

fn library_candidate(entry: &FunctionEntry) -> CompletionCandidate {
    CompletionCandidate {
        label: entry.name.clone(),
        type_text: entry.signature.clone(),
        tail_text: None,
        priority: entry.priority,
        kind: CandidateKind::LibraryFunction,
        namespace: Some(entry.namespace.clone()),
        documentation: Some(entry.description.clone()),
        insert_template: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisError, LexicalScopeAnalyzer};
    use crate::ir::{NodeId, SyntaxNodeKind, SyntaxTreeBuilder, TextRange};

    struct FailingAnalyzer;

    impl ScopeAnalyzer for FailingAnalyzer {
        fn is_definition(&self, _tree: &SyntaxTree, _symbol: NodeId) -> bool {
            false
        }

        fn is_function_parameter(&self, _tree: &SyntaxTree, _symbol: NodeId) -> bool {
            false
        }

        fn is_let_binding(&self, _tree: &SyntaxTree, _symbol: NodeId) -> bool {
            false
        }

        fn local_symbols_visible_at(
            &self,
            _tree: &SyntaxTree,
            _element: NodeId,
            _offset: usize,
        ) -> Result<Vec<LocalSymbol>, AnalysisError> {
            Err(AnalysisError::Resolver("resolver unavailable".to_string()))
        }
    }

    struct PanickingLookup;

    impl ScopeAnalyzer for PanickingLookup {
        fn is_definition(&self, _tree: &SyntaxTree, _symbol: NodeId) -> bool {
            false
        }

        fn is_function_parameter(&self, _tree: &SyntaxTree, _symbol: NodeId) -> bool {
            false
        }

        fn is_let_binding(&self, _tree: &SyntaxTree, _symbol: NodeId) -> bool {
            false
        }

        fn local_symbols_visible_at(
            &self,
            _tree: &SyntaxTree,
            _element: NodeId,
            _offset: usize,
        ) -> Result<Vec<LocalSymbol>, AnalysisError> {
            panic!("scope index poisoned");
        }
    }

    fn registry() -> FunctionRegistry {
        FunctionRegistry::from_entries(vec![
            FunctionEntry::new("str/join", "str", "(str/join sep xs)", "Joins strings.", 80),
            FunctionEntry::new("count", "core", "(count coll)", "Counts.", 90),
            FunctionEntry::new("map", "core", "(map f coll)", "Maps.", 100),
        ])
    }

    /// Builds `(fn [x] (m ))`
    fn tree() -> SyntaxTree {
        let mut builder = SyntaxTreeBuilder::new();
        builder.start_node(SyntaxNodeKind::List, 0);
        builder.token(SyntaxNodeKind::Symbol, "fn", TextRange::new(1, 3));
        builder.start_node(SyntaxNodeKind::Vector, 4);
        builder.token(SyntaxNodeKind::Symbol, "x", TextRange::new(5, 6));
        builder.finish_node(7);
        builder.start_node(SyntaxNodeKind::List, 8);
        builder.token(SyntaxNodeKind::Symbol, "m", TextRange::new(9, 10));
        builder.finish_node(12);
        builder.finish_node(13);
        builder.finish().unwrap()
    }

    fn labels(candidates: &[CompletionCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_general_mode_locals_then_namespaces() {
        let (tree, registry) = (tree(), registry());
        let analyzer = LexicalScopeAnalyzer::new();
        let builder = CompletionBuilder::new(&registry, &analyzer);

        let context = CursorContext::at(&tree, 11).unwrap();
        let candidates = builder.build_candidates(&tree, &context).unwrap();
        assert_eq!(labels(&candidates), vec!["x", "map", "count", "str/join"]);
        assert_eq!(candidates[0].type_text, "parameter");
        assert_eq!(candidates[0].tail_text.as_deref(), Some(LOCAL_TAIL_TEXT));
        assert_eq!(candidates[0].priority, LOCAL_SYMBOL_PRIORITY);
        assert_eq!(candidates[1].tail_text, None);
    }

    #[test]
    fn test_failing_analyzer_keeps_registry_candidates() {
        let (tree, registry) = (tree(), registry());
        let builder = CompletionBuilder::new(&registry, &FailingAnalyzer);

        let context = CursorContext::at(&tree, 11).unwrap();
        let candidates = builder.build_candidates(&tree, &context).unwrap();
        assert_eq!(labels(&candidates), vec!["map", "count", "str/join"]);
    }

    #[test]
    fn test_panicking_lookup_keeps_registry_candidates() {
        let (tree, registry) = (tree(), registry());
        let builder = CompletionBuilder::new(&registry, &PanickingLookup);

        let context = CursorContext::at(&tree, 11).unwrap();
        let candidates = builder.build_candidates(&tree, &context).unwrap();
        assert_eq!(labels(&candidates), vec!["map", "count", "str/join"]);
    }

    #[test]
    fn test_local_symbols_can_be_disabled() {
        let (tree, registry) = (tree(), registry());
        let analyzer = LexicalScopeAnalyzer::new();
        let builder = CompletionBuilder::new(&registry, &analyzer).with_local_symbols(false);

        let context = CursorContext::at(&tree, 11).unwrap();
        let candidates = builder.build_candidates(&tree, &context).unwrap();
        assert_eq!(labels(&candidates), vec!["map", "count", "str/join"]);
    }

    #[test]
    fn test_dangling_element_is_an_error() {
        let (tree, registry) = (tree(), registry());
        let analyzer = LexicalScopeAnalyzer::new();
        let builder = CompletionBuilder::new(&registry, &analyzer);

        let context = CursorContext {
            element: NodeId(500),
            offset: 3,
            should_suggest_new_form: false,
            is_inside_parentheses: true,
        };
        assert!(matches!(
            builder.build_candidates(&tree, &context),
            Err(CompletionError::DanglingNode { .. })
        ));
    }

    #[test]
    fn test_context_errors_reach_the_caller() {
        let (tree, registry) = (tree(), registry());
        let analyzer = LexicalScopeAnalyzer::new();
        let builder = CompletionBuilder::new(&registry, &analyzer);

        // Inside `(m )` but claiming no enclosing collection
        let mut context = CursorContext::at(&tree, 11).unwrap();
        context.should_suggest_new_form = true;
        assert!(matches!(
            builder.build_candidates(&tree, &context),
            Err(CompletionError::InvalidContext(_))
        ));

        let inner = tree.elements(tree.elements(tree.root())[0])[2];
        let context = CursorContext {
            element: tree.parent(inner).unwrap(),
            offset: 11,
            should_suggest_new_form: false,
            is_inside_parentheses: true,
        };
        assert!(matches!(
            builder.build_candidates(&tree, &context),
            Err(CompletionError::UnexpectedNodeKind { .. })
        ));
    }
}
