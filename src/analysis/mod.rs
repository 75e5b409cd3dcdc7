//! Symbol analysis: binding structure, scopes and semantic categories

pub mod category;
pub mod classifier;
pub mod forms;
pub mod scope;

pub use category::{DefinitionKind, LibraryKind, SymbolCategory};
pub use classifier::{classify_library_name, SymbolClassifier};
pub use scope::{AnalysisError, BindingKind, BindingSite, LexicalScopeAnalyzer, LocalSymbol, ScopeAnalyzer};
