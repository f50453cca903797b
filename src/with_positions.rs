use crate::{Position, PositionProvider, Token};

/// A token with the line and column of its start and end.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PositionedToken<'h> {
    /// The token.
    pub token: Token<'h>,
    /// The position of the first character of the token.
    pub start: Position,
    /// The position behind the last character of the token.
    /// The end position is exclusive.
    pub end: Position,
}

/// An iterator over tokens with positions.
///
/// Positions are tracked incrementally while the tokens follow each other without gaps, so
/// the whole source is only walked once.
#[derive(Debug)]
pub struct WithPositions<I> {
    iter: I,
    // Byte offset and position behind the last token
    offset: usize,
    position: Position,
}

impl<I> WithPositions<I> {
    /// Create a new `WithPositions` iterator.
    pub(crate) fn new(iter: I) -> Self {
        Self {
            iter,
            offset: 0,
            position: Position::default(),
        }
    }
}

impl<'h, I> Iterator for WithPositions<I>
where
    I: Iterator<Item = Token<'h>> + PositionProvider,
{
    type Item = PositionedToken<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.iter.next()?;
        let start = if token.start() == self.offset {
            self.position
        } else {
            self.iter.position(token.start())
        };
        let end = match token.kind() {
            crate::TokenKind::Error => start,
            _ => start.advance(token.text()),
        };
        self.offset = token.end();
        self.position = end;
        Some(PositionedToken { token, start, end })
    }
}

impl<I> PositionProvider for WithPositions<I>
where
    I: PositionProvider,
{
    fn position(&self, offset: usize) -> Position {
        self.iter.position(offset)
    }

    fn line_number(&self) -> usize {
        self.iter.line_number()
    }
}

/// An extension trait for iterators over tokens.
pub trait TokenIterator<'h>: Iterator<Item = Token<'h>> + PositionProvider + Sized {
    /// An iterator that yields tokens with positions.
    fn with_positions(self) -> WithPositions<Self> {
        WithPositions::new(self)
    }
}

// Implement the trait for all types that implement the required traits.
impl<'h, I: Iterator<Item = Token<'h>> + PositionProvider + Sized> TokenIterator<'h> for I {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Scanner, TokenKind};

    #[test]
    fn test_with_positions() {
        let input = "2016/09/09 Payee\n  Äccount  20 CAD\n";
        let tokens: Vec<_> = Scanner::new("test", input).with_positions().collect();
        let account = tokens
            .iter()
            .find(|t| t.token.kind() == TokenKind::AccountName)
            .unwrap();
        assert_eq!(account.start, Position::new(2, 3));
        assert_eq!(account.end, Position::new(2, 10));
        let last = tokens.last().unwrap();
        assert_eq!(last.token.kind(), TokenKind::EndOfInput);
        assert_eq!(last.start, Position::new(3, 1));
        for t in &tokens {
            let scanner = Scanner::new("test", input);
            assert_eq!(t.start, scanner.position(t.token.start()));
        }
    }

    #[test]
    fn test_lone_carriage_return() {
        let input = "account A\rinclude x";
        let mut scanner = Scanner::new("test", input);
        let tokens: Vec<_> = Scanner::new("test", input).with_positions().collect();
        let include = tokens
            .iter()
            .find(|t| t.token.kind() == TokenKind::Keyword(crate::Keyword::Include))
            .unwrap();
        assert_eq!(include.start, Position::new(2, 1));
        assert_eq!(include.start, scanner.position(include.token.start()));
        let _ = scanner.by_ref().take(5).count();
        assert_eq!(scanner.line_number(), 2);
    }

    #[test]
    fn test_error_position() {
        let tokens: Vec<_> = Scanner::new("test", "account A\n  @")
            .with_positions()
            .collect();
        let error = tokens.last().unwrap();
        assert_eq!(error.token.kind(), TokenKind::Error);
        assert_eq!(error.start, Position::new(2, 3));
        assert_eq!(error.end, error.start);
    }
}
