//! Semantic categories assigned to symbols

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of definition introduced a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    Function,
    Macro,
    Variable,
    Struct,
    Generic,
}

impl DefinitionKind {
    /// Maps the operator of a defining form to the kind it defines
    pub fn from_operator(operator: Option<&str>) -> Self {
        match operator {
            Some("defn") | Some("defn-") => DefinitionKind::Function,
            Some("defmacro") | Some("defmacro-") => DefinitionKind::Macro,
            Some("def") => DefinitionKind::Variable,
            Some("defstruct") => DefinitionKind::Struct,
            _ => DefinitionKind::Generic,
        }
    }
}

/// Sub-classification of registry functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LibraryKind {
    Predicate,
    Arithmetic,
    Comparison,
    Collection,
    Core,
}

/// Semantic category of a symbol, computed on demand and never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolCategory {
    FunctionParameter,
    LetBinding,
    Definition(DefinitionKind),
    LibraryFunction(LibraryKind),
    SpecialForm,
    UnknownSymbol,
}

impl SymbolCategory {
    /// Human readable label used in documentation
    pub fn label(&self) -> &'static str {
        match self {
            SymbolCategory::FunctionParameter => "Function Parameter",
            SymbolCategory::LetBinding => "Let Binding",
            SymbolCategory::Definition(DefinitionKind::Function) => "Function Definition",
            SymbolCategory::Definition(DefinitionKind::Macro) => "Macro Definition",
            SymbolCategory::Definition(DefinitionKind::Variable) => "Variable Definition",
            SymbolCategory::Definition(DefinitionKind::Struct) => "Struct Definition",
            SymbolCategory::Definition(DefinitionKind::Generic) => "Definition",
            SymbolCategory::LibraryFunction(LibraryKind::Predicate) => "Predicate Function",
            SymbolCategory::LibraryFunction(LibraryKind::Arithmetic) => "Arithmetic Function",
            SymbolCategory::LibraryFunction(LibraryKind::Comparison) => "Comparison Function",
            SymbolCategory::LibraryFunction(LibraryKind::Collection) => "Collection Function",
            SymbolCategory::LibraryFunction(LibraryKind::Core) => "Core Function",
            SymbolCategory::SpecialForm => "Special Form",
            SymbolCategory::UnknownSymbol => "Symbol",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, SymbolCategory::FunctionParameter | SymbolCategory::LetBinding)
    }
}

impl fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
