//! Module for generating random Phel code for property-based testing.
//!
//! `PhelForm` is a plain s-expression value; its `Display` output is valid
//! Phel source that the fixture reader accepts. Generation is biased toward
//! binding forms (`defn`, `fn`, `let`, `foreach`, `def`) so scope analysis
//! sees realistic shapes, including destructuring and multi-arity functions.
//!
//! Generation functions use a depth parameter to limit recursion.

use quickcheck::{Arbitrary, Gen};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhelForm {
    Symbol(String),
    Keyword(String),
    Literal(String),
    List(Vec<PhelForm>),
    Vector(Vec<PhelForm>),
    Map(Vec<PhelForm>),
}

/// A whole file: top-level forms separated by newlines
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhelProgram(pub Vec<PhelForm>);

/// Maximum recursion depth for generation to prevent excessive tree depth.
const MAX_DEPTH: usize = 5;

/// Names that are often also registry functions, so shadowing is exercised.
const LIBRARY_NAMES: &[&str] = &[
    "map", "filter", "reduce", "first", "rest", "count", "inc", "dec", "+", "=", "str/join",
    "empty?", "nil?",
];

const BINDING_OPERATORS: &[&str] = &["let", "loop", "if-let", "when-let", "binding"];

impl fmt::Display for PhelForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[PhelForm]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            PhelForm::Symbol(name) => write!(f, "{}", name),
            PhelForm::Keyword(name) => write!(f, ":{}", name),
            PhelForm::Literal(text) => write!(f, "{}", text),
            PhelForm::List(items) => {
                write!(f, "(")?;
                join(f, items)?;
                write!(f, ")")
            }
            PhelForm::Vector(items) => {
                write!(f, "[")?;
                join(f, items)?;
                write!(f, "]")
            }
            PhelForm::Map(items) => {
                write!(f, "{{")?;
                join(f, items)?;
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for PhelProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, form) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", form)?;
        }
        Ok(())
    }
}

/// Generates a random number in the range [min, max] inclusive.
fn gen_range(g: &mut Gen, min: u32, max: u32) -> u32 {
    min + (u32::arbitrary(g) % (max - min + 1))
}

fn pick<'a>(g: &mut Gen, choices: &'a [&'a str]) -> &'a str {
    choices[gen_range(g, 0, choices.len() as u32 - 1) as usize]
}

/// Generates a random local name; sometimes reuses a library function name.
fn gen_name(g: &mut Gen) -> String {
    if gen_range(g, 0, 4) == 0 {
        return pick(g, LIBRARY_NAMES).to_string();
    }
    let starters: Vec<char> = "abcdefghijklmnopqrstuvwxyz".chars().collect();
    let continuers: Vec<char> = "abcdefghijklmnopqrstuvwxyz0123456789-".chars().collect();
    let len = gen_range(g, 1, 6);
    let mut name = String::new();
    name.push(starters[gen_range(g, 0, starters.len() as u32 - 1) as usize]);
    for _ in 1..len {
        name.push(continuers[gen_range(g, 0, continuers.len() as u32 - 1) as usize]);
    }
    name
}

fn gen_literal(g: &mut Gen) -> PhelForm {
    match gen_range(g, 0, 3) {
        0 => PhelForm::Literal(gen_range(g, 0, 1000).to_string()),
        1 => PhelForm::Literal(format!("\"{}\"", gen_name(g))),
        2 => PhelForm::Literal(pick(g, &["nil", "true", "false"]).to_string()),
        _ => PhelForm::Keyword(gen_name(g)),
    }
}

fn gen_atom(g: &mut Gen) -> PhelForm {
    if bool::arbitrary(g) {
        PhelForm::Symbol(gen_name(g))
    } else {
        gen_literal(g)
    }
}

/// Binding pattern: a name, or sometimes a destructuring vector/map
fn gen_pattern(g: &mut Gen, depth: usize) -> PhelForm {
    match gen_range(g, 0, 5) {
        0 if depth > 0 => {
            let mut items: Vec<PhelForm> = (0..gen_range(g, 1, 2))
                .map(|_| gen_pattern(g, depth - 1))
                .collect();
            if bool::arbitrary(g) {
                items.push(PhelForm::Symbol("&".to_string()));
                items.push(PhelForm::Symbol(gen_name(g)));
            }
            PhelForm::Vector(items)
        }
        1 if depth > 0 => PhelForm::Map(vec![
            PhelForm::Symbol(gen_name(g)),
            PhelForm::Keyword(gen_name(g)),
        ]),
        _ => PhelForm::Symbol(gen_name(g)),
    }
}

fn gen_params(g: &mut Gen, depth: usize) -> PhelForm {
    PhelForm::Vector((0..gen_range(g, 0, 3)).map(|_| gen_pattern(g, depth)).collect())
}

fn gen_body(g: &mut Gen, depth: usize) -> Vec<PhelForm> {
    (0..gen_range(g, 1, 2)).map(|_| gen_expr(g, depth)).collect()
}

fn list(head: &str, rest: Vec<PhelForm>) -> PhelForm {
    let mut items = vec![PhelForm::Symbol(head.to_string())];
    items.extend(rest);
    PhelForm::List(items)
}

fn gen_expr(g: &mut Gen, depth: usize) -> PhelForm {
    if depth == 0 {
        return gen_atom(g);
    }
    let depth = depth - 1;
    match gen_range(g, 0, 8) {
        0 | 1 => gen_atom(g),
        2 => {
            // Ordinary call
            let args = (0..gen_range(g, 0, 3)).map(|_| gen_expr(g, depth)).collect();
            list(&gen_name(g), args)
        }
        3 => {
            let mut bindings = Vec::new();
            for _ in 0..gen_range(g, 1, 3) {
                bindings.push(gen_pattern(g, depth));
                bindings.push(gen_expr(g, depth));
            }
            let mut rest = vec![PhelForm::Vector(bindings)];
            rest.extend(gen_body(g, depth));
            list(pick(g, BINDING_OPERATORS), rest)
        }
        4 => {
            let mut rest = vec![gen_params(g, depth)];
            rest.extend(gen_body(g, depth));
            list("fn", rest)
        }
        5 => {
            let binding = vec![PhelForm::Symbol(gen_name(g)), gen_expr(g, depth)];
            let mut rest = vec![PhelForm::Vector(binding)];
            rest.extend(gen_body(g, depth));
            list("foreach", rest)
        }
        6 => list("if", (0..3).map(|_| gen_expr(g, depth)).collect()),
        7 => PhelForm::Vector((0..gen_range(g, 0, 3)).map(|_| gen_expr(g, depth)).collect()),
        _ => PhelForm::Map(
            (0..gen_range(g, 0, 2))
                .flat_map(|_| [PhelForm::Keyword(gen_name(g)), gen_expr(g, depth)])
                .collect(),
        ),
    }
}

fn gen_top_level(g: &mut Gen, depth: usize) -> PhelForm {
    let depth = depth.min(MAX_DEPTH);
    match gen_range(g, 0, 4) {
        0 => {
            let mut rest = vec![PhelForm::Symbol(gen_name(g)), gen_params(g, depth)];
            rest.extend(gen_body(g, depth));
            list(pick(g, &["defn", "defn-", "defmacro"]), rest)
        }
        1 => {
            // Multi-arity function
            let arities = (0..gen_range(g, 1, 2))
                .map(|_| {
                    let mut arity = vec![gen_params(g, depth)];
                    arity.extend(gen_body(g, depth));
                    PhelForm::List(arity)
                })
                .collect::<Vec<_>>();
            let mut rest = vec![PhelForm::Symbol(gen_name(g))];
            rest.extend(arities);
            list("defn", rest)
        }
        2 => list("def", vec![PhelForm::Symbol(gen_name(g)), gen_expr(g, depth)]),
        3 => list("defstruct", vec![PhelForm::Symbol(gen_name(g)), gen_params(g, 0)]),
        _ => gen_expr(g, depth),
    }
}

impl Arbitrary for PhelForm {
    fn arbitrary(g: &mut Gen) -> Self {
        gen_top_level(g, g.size().min(MAX_DEPTH))
    }
}

impl Arbitrary for PhelProgram {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = gen_range(g, 1, 4);
        PhelProgram((0..count).map(|_| PhelForm::arbitrary(g)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let forms = self.0.clone();
        let candidates = if forms.len() > 1 { forms.len() } else { 0 };
        Box::new((0..candidates).map(move |skip| {
            PhelProgram(
                forms
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != skip)
                    .map(|(_, form)| form.clone())
                    .collect(),
            )
        }))
    }
}
