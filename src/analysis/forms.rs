//! Fixed operator and keyword sets of the Phel language

/// Forms whose first vector is a parameter vector
pub const FUNCTION_FORMS: &[&str] = &["defn", "defn-", "defmacro", "defmacro-", "fn"];

/// Forms whose first vector holds pattern/value pairs
pub const LET_FORMS: &[&str] = &["let", "loop", "binding", "if-let", "when-let"];

/// Forms whose first vector binds every element but the last
pub const FOREACH_FORMS: &[&str] = &["foreach"];

/// Forms that introduce a name in the element after the operator
pub const DEFINITION_FORMS: &[&str] = &[
    "def",
    "defn",
    "defn-",
    "defmacro",
    "defmacro-",
    "defstruct",
    "definterface",
    "declare",
];

pub const ARITHMETIC_OPERATORS: &[&str] = &["+", "-", "*", "/", "%", "**", "inc", "dec"];

pub const COMPARISON_OPERATORS: &[&str] = &["=", "<", ">", "<=", ">="];

pub const COLLECTION_FUNCTIONS: &[&str] = &["map", "filter", "reduce", "first", "rest"];

pub const SPECIAL_FORMS: &[&str] = &[
    "def", "defn", "let", "if", "when", "do", "fn", "quote", "var", "throw", "try",
];

/// Marker for variadic parameters; never a binding
pub const REST_MARKER: &str = "&";

pub fn is_one_of(name: &str, set: &[&str]) -> bool {
    set.contains(&name)
}
