//! Minimal Phel reader for test fixtures.
//!
//! Produces a span-annotated s-expression tree. A single `|` outside of
//! strings marks the cursor; it is removed from the source and its byte
//! offset recorded. Collections left open at the end of input are closed
//! there, so fixtures can describe half-typed code like `(map |`.

use anyhow::{bail, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Symbol,
    Keyword,
    Literal,
    List,
    Vector,
    Map,
}

impl NodeKind {
    pub fn is_collection(self) -> bool {
        matches!(self, NodeKind::List | NodeKind::Vector | NodeKind::Map)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadNode {
    pub kind: NodeKind,
    /// Byte range in the source with the cursor marker removed
    pub start: usize,
    pub end: usize,
    /// Token text; `None` for collections
    pub text: Option<String>,
    pub children: Vec<ReadNode>,
    /// False for a collection closed only by the end of input
    pub closed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixture {
    pub source: String,
    pub cursor: Option<usize>,
    pub forms: Vec<ReadNode>,
}

impl Fixture {
    /// Cursor offset; panics when the fixture has no `|` marker
    pub fn cursor(&self) -> usize {
        self.cursor.expect("fixture has no cursor marker")
    }
}

/// Read a fixture, extracting the `|` cursor marker if present
pub fn read_fixture(marked: &str) -> Result<Fixture> {
    let (source, cursor) = strip_cursor(marked)?;
    let forms = read(&source)?;
    Ok(Fixture { source, cursor, forms })
}

fn strip_cursor(marked: &str) -> Result<(String, Option<usize>)> {
    let mut source = String::with_capacity(marked.len());
    let mut cursor = None;
    let mut in_string = false;
    let mut escaped = false;
    for ch in marked.chars() {
        if in_string {
            source.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '|' => {
                if cursor.is_some() {
                    bail!("fixture has more than one cursor marker");
                }
                cursor = Some(source.len());
            }
            '"' => {
                in_string = true;
                source.push(ch);
            }
            _ => source.push(ch),
        }
    }
    Ok((source, cursor))
}

/// Read all top-level forms of `source`
pub fn read(source: &str) -> Result<Vec<ReadNode>> {
    let bytes = source.as_bytes();
    let mut pos = 0;
    // Open collections: (kind, start, children)
    let mut stack: Vec<(NodeKind, usize, Vec<ReadNode>)> = Vec::new();
    let mut top: Vec<ReadNode> = Vec::new();

    fn push(stack: &mut [(NodeKind, usize, Vec<ReadNode>)], top: &mut Vec<ReadNode>, node: ReadNode) {
        match stack.last_mut() {
            Some((_, _, children)) => children.push(node),
            None => top.push(node),
        }
    }

    while pos < bytes.len() {
        let ch = bytes[pos];
        match ch {
            b' ' | b'\t' | b'\n' | b'\r' | b',' => pos += 1,
            b';' => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
            }
            b'(' | b'[' | b'{' => {
                let kind = match ch {
                    b'(' => NodeKind::List,
                    b'[' => NodeKind::Vector,
                    _ => NodeKind::Map,
                };
                stack.push((kind, pos, Vec::new()));
                pos += 1;
            }
            b')' | b']' | b'}' => {
                let expected = match ch {
                    b')' => NodeKind::List,
                    b']' => NodeKind::Vector,
                    _ => NodeKind::Map,
                };
                let Some((kind, start, children)) = stack.pop() else {
                    bail!("unmatched '{}' at offset {}", ch as char, pos);
                };
                if kind != expected {
                    bail!("mismatched '{}' at offset {}", ch as char, pos);
                }
                pos += 1;
                let node = ReadNode { kind, start, end: pos, text: None, children, closed: true };
                push(&mut stack, &mut top, node);
            }
            b'"' => {
                let start = pos;
                pos += 1;
                let mut escaped = false;
                loop {
                    if pos >= bytes.len() {
                        bail!("unterminated string starting at offset {}", start);
                    }
                    let c = bytes[pos];
                    pos += 1;
                    if escaped {
                        escaped = false;
                    } else if c == b'\\' {
                        escaped = true;
                    } else if c == b'"' {
                        break;
                    }
                }
                let node = token(NodeKind::Literal, source, start, pos);
                push(&mut stack, &mut top, node);
            }
            _ => {
                let start = pos;
                while pos < bytes.len() && !is_delimiter(bytes[pos]) {
                    pos += 1;
                }
                let text = &source[start..pos];
                let kind = if text.starts_with(':') {
                    NodeKind::Keyword
                } else if is_literal(text) {
                    NodeKind::Literal
                } else {
                    NodeKind::Symbol
                };
                let node = token(kind, source, start, pos);
                push(&mut stack, &mut top, node);
            }
        }
    }

    // Close whatever is still open at end of input
    while let Some((kind, start, children)) = stack.pop() {
        let node = ReadNode {
            kind,
            start,
            end: source.len(),
            text: None,
            children,
            closed: false,
        };
        push(&mut stack, &mut top, node);
    }

    Ok(top)
}

fn token(kind: NodeKind, source: &str, start: usize, end: usize) -> ReadNode {
    ReadNode {
        kind,
        start,
        end,
        text: Some(source[start..end].to_string()),
        children: Vec::new(),
        closed: true,
    }
}

fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b' ' | b'\t' | b'\n' | b'\r' | b',' | b';' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'"'
    )
}

fn is_literal(text: &str) -> bool {
    if matches!(text, "nil" | "true" | "false") {
        return true;
    }
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit())
}
