//! Conversion between LSP positions and byte offsets
//!
//! Positions count characters within a line; a character past the end of
//! its line clamps to the line end.

use lsp_types::{Position, Range};
use ropey::Rope;
use tracing::debug;

use crate::ir::TextRange;

/// Byte offset of an LSP position, or `None` when the line is out of bounds
pub fn offset_at(text: &Rope, position: Position) -> Option<usize> {
    let line = position.line as usize;
    if line >= text.len_lines() {
        debug!("line {} out of bounds (rope has {} lines)", line, text.len_lines());
        return None;
    }

    let line_start_byte = text.try_line_to_byte(line).ok()?;
    let line_text = text.line(line);
    let char_offset = (position.character as usize).min(line_text.len_chars());
    Some(line_start_byte + line_text.char_to_byte(char_offset))
}

/// LSP position of a byte offset, or `None` past the end of the text
pub fn position_at(text: &Rope, offset: usize) -> Option<Position> {
    let char_index = text.try_byte_to_char(offset).ok()?;
    let line = text.try_char_to_line(char_index).ok()?;
    let line_start = text.try_line_to_char(line).ok()?;
    Some(Position::new(line as u32, (char_index - line_start) as u32))
}

pub fn range_of(text: &Rope, range: TextRange) -> Option<Range> {
    Some(Range::new(position_at(text, range.start)?, position_at(text, range.end)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_at() {
        let text = Rope::from_str("(defn f [x]\n  (inc x))\n");
        assert_eq!(offset_at(&text, Position::new(0, 0)), Some(0));
        assert_eq!(offset_at(&text, Position::new(1, 3)), Some(15));
        // Clamped to the line length
        assert_eq!(offset_at(&text, Position::new(0, 99)), Some(12));
        assert_eq!(offset_at(&text, Position::new(7, 0)), None);
    }

    #[test]
    fn test_multibyte_characters() {
        let text = Rope::from_str("(str/join \"é\" xs)");
        assert_eq!(offset_at(&text, Position::new(0, 13)), Some(14));
        assert_eq!(position_at(&text, 14), Some(Position::new(0, 13)));
    }

    #[test]
    fn test_range_round_trip() {
        let text = Rope::from_str("(inc x)\n(dec y)");
        let range = range_of(&text, TextRange::new(9, 12)).unwrap();
        assert_eq!(range, Range::new(Position::new(1, 1), Position::new(1, 4)));
    }
}
