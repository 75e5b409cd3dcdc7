/// Integration tests for symbol classification
///
/// Tests verify:
/// - Binding positions (parameters, let patterns, destructuring, foreach)
/// - Definition kinds taken from the defining operator
/// - Registry sub-classification by name
/// - Precedence: binding position beats registry, registry beats special forms

mod common;

use indoc::indoc;
use phel_language_tools::analysis::{
    DefinitionKind, LexicalScopeAnalyzer, LibraryKind, SymbolCategory, SymbolClassifier,
};
use phel_language_tools::registry::{FunctionEntry, FunctionRegistry};

use common::{fixture, nth_symbol};

fn classify(source: &str, name: &str, occurrence: usize) -> SymbolCategory {
    let registry = FunctionRegistry::builtin();
    classify_with(&registry, source, name, occurrence)
}

fn classify_with(
    registry: &FunctionRegistry,
    source: &str,
    name: &str,
    occurrence: usize,
) -> SymbolCategory {
    let analyzer = LexicalScopeAnalyzer::new();
    let source = fixture(source);
    let symbol = nth_symbol(&source.tree, name, occurrence);
    SymbolClassifier::new(registry, &analyzer).classify(&source.tree, symbol)
}

#[test]
fn test_let_binding_not_in_registry() {
    assert_eq!(classify("(let [x 1] x)", "x", 0), SymbolCategory::LetBinding);
    // The body reference is not a binding position
    assert_eq!(classify("(let [x 1] x)", "x", 1), SymbolCategory::UnknownSymbol);
}

#[test]
fn test_parameter_beats_registry() {
    let source = "(defn apply-all [map] (map inc map))";
    assert_eq!(classify(source, "map", 0), SymbolCategory::FunctionParameter);
    assert_eq!(
        classify(source, "map", 1),
        SymbolCategory::LibraryFunction(LibraryKind::Collection)
    );
}

#[test]
fn test_definition_kinds() {
    let source = indoc! {r#"
        (defn greet [name] (str "hi " name))
        (defn- helper [] nil)
        (defmacro unless [c body] nil)
        (def answer 42)
        (defstruct point [x y])
        (declare later)
    "#};
    assert_eq!(classify(source, "greet", 0), SymbolCategory::Definition(DefinitionKind::Function));
    assert_eq!(classify(source, "helper", 0), SymbolCategory::Definition(DefinitionKind::Function));
    assert_eq!(classify(source, "unless", 0), SymbolCategory::Definition(DefinitionKind::Macro));
    assert_eq!(classify(source, "answer", 0), SymbolCategory::Definition(DefinitionKind::Variable));
    assert_eq!(classify(source, "point", 0), SymbolCategory::Definition(DefinitionKind::Struct));
    assert_eq!(classify(source, "later", 0), SymbolCategory::Definition(DefinitionKind::Generic));
    assert_eq!(classify(source, "name", 0), SymbolCategory::FunctionParameter);
}

#[test]
fn test_destructuring_and_rest_marker() {
    let source = "(let [[a & rest] xs {b :b} m] (a rest b))";
    assert_eq!(classify(source, "a", 0), SymbolCategory::LetBinding);
    assert_eq!(classify(source, "rest", 0), SymbolCategory::LetBinding);
    assert_eq!(classify(source, "b", 0), SymbolCategory::LetBinding);
    assert_eq!(classify(source, "&", 0), SymbolCategory::UnknownSymbol);
    assert_eq!(classify(source, "xs", 0), SymbolCategory::UnknownSymbol);
    assert_eq!(
        classify(source, "rest", 1),
        SymbolCategory::LibraryFunction(LibraryKind::Collection)
    );
}

#[test]
fn test_multi_arity_parameters() {
    let source = "(defn sum ([x] x) ([x y] (+ x y)))";
    assert_eq!(classify(source, "sum", 0), SymbolCategory::Definition(DefinitionKind::Function));
    assert_eq!(classify(source, "x", 0), SymbolCategory::FunctionParameter);
    assert_eq!(classify(source, "x", 2), SymbolCategory::FunctionParameter);
    assert_eq!(classify(source, "y", 0), SymbolCategory::FunctionParameter);
    assert_eq!(classify(source, "+", 0), SymbolCategory::LibraryFunction(LibraryKind::Arithmetic));
}

#[test]
fn test_foreach_binds_all_but_collection() {
    let source = "(foreach [v items] (println v))";
    assert_eq!(classify(source, "v", 0), SymbolCategory::LetBinding);
    assert_eq!(classify(source, "items", 0), SymbolCategory::UnknownSymbol);
}

#[test]
fn test_library_sub_classification() {
    let source = "(if (empty? xs) (count xs) (<= 1 (inc 2)))";
    assert_eq!(classify(source, "empty?", 0), SymbolCategory::LibraryFunction(LibraryKind::Predicate));
    assert_eq!(classify(source, "count", 0), SymbolCategory::LibraryFunction(LibraryKind::Core));
    assert_eq!(classify(source, "<=", 0), SymbolCategory::LibraryFunction(LibraryKind::Comparison));
    assert_eq!(classify(source, "inc", 0), SymbolCategory::LibraryFunction(LibraryKind::Arithmetic));
    assert_eq!(classify(source, "if", 0), SymbolCategory::SpecialForm);
}

#[test]
fn test_registry_beats_special_form() {
    let registry = FunctionRegistry::from_entries(vec![FunctionEntry::new(
        "when",
        "core",
        "(when test & body)",
        "Evaluates body when test is true.",
        50,
    )]);
    assert_eq!(
        classify_with(&registry, "(when ok (do 1))", "when", 0),
        SymbolCategory::LibraryFunction(LibraryKind::Core)
    );
    assert_eq!(classify_with(&registry, "(when ok (do 1))", "do", 0), SymbolCategory::SpecialForm);
}

#[test]
fn test_unknown_symbol() {
    assert_eq!(classify("(foobar123 1)", "foobar123", 0), SymbolCategory::UnknownSymbol);
    assert_eq!(SymbolCategory::UnknownSymbol.label(), "Symbol");
}
