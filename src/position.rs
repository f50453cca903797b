//! Module with the position type and functions.
//! A position is a struct that contains a line and column number.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position in the journal source.
/// The position is represented by a line and column number.
/// The line and column numbers are 1-based, columns count characters, not bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// The line number of the position.
    pub line: usize,
    /// The column number of the position.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        debug_assert!(line > 0, "line number must be greater than 0");
        debug_assert!(column > 0, "column number must be greater than 0");
        Self { line, column }
    }

    /// Get the line number of the position.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the column number of the position.
    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the position reached after `text` has been consumed starting at this position.
    /// A `\r\n` pair counts as a single line break.
    pub fn advance(self, text: &str) -> Position {
        let mut line = self.line;
        let mut column = self.column;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' if chars.peek() == Some(&'\n') => {}
                '\r' | '\n' => {
                    line += 1;
                    column = 1;
                }
                _ => column += 1,
            }
        }
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line: {}, column: {}", self.line, self.column)
    }
}

/// A trait for providing the line and column information of a given byte offset in the source.
pub trait PositionProvider {
    /// Returns the position of the given offset.
    fn position(&self, offset: usize) -> Position;

    /// Returns the line of the token returned most recently.
    /// Before any token has been returned this is line 1.
    fn line_number(&self) -> usize;
}

/// Computes the position of the byte `offset` in `input`.
/// Offsets beyond the input are clamped to its end. Line breaks are counted like in
/// [`Position::advance`].
pub(crate) fn position_in(input: &str, offset: usize) -> Position {
    let mut offset = offset.min(input.len());
    while !input.is_char_boundary(offset) {
        offset -= 1;
    }
    Position::default().advance(&input[..offset])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let pos = Position::new(1, 1);
        assert_eq!(pos.line(), 1);
        assert_eq!(pos.column(), 1);
        assert_eq!(format!("{}", pos), "line: 1, column: 1");
    }

    #[test]
    fn test_advance() {
        let pos = Position::default().advance("2016/09/09 Payee");
        assert_eq!(pos, Position::new(1, 17));
        let pos = pos.advance("\n");
        assert_eq!(pos, Position::new(2, 1));
        let pos = pos.advance("  Äccount\r\n");
        assert_eq!(pos, Position::new(3, 1));
    }

    #[test]
    fn test_position_in() {
        let input = "2016/09/09 Payee\n Account  20 €\n";
        assert_eq!(position_in(input, 0), Position::new(1, 1));
        assert_eq!(position_in(input, 11), Position::new(1, 12));
        assert_eq!(position_in(input, 18), Position::new(2, 2));
        assert_eq!(position_in(input, input.len()), Position::new(3, 1));
        assert_eq!(position_in(input, 1000), Position::new(3, 1));
    }

    #[test]
    fn test_position_in_with_carriage_returns() {
        let input = "account A\rinclude x\r\ninclude y";
        assert_eq!(position_in(input, 10), Position::new(2, 1));
        assert_eq!(position_in(input, 18), Position::new(2, 9));
        assert_eq!(position_in(input, 21), Position::new(3, 1));
    }
}
