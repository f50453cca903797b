use crate::{
    internal::{ScanOptions, StateMachine},
    position::position_in,
    Position, PositionProvider, Result, ScanError, ScanErrorKind, ScannerBuilder, Token,
    TokenKind,
};

/// A scanner for a single journal source.
///
/// The scanner is a pull-based iterator over the [`Token`]s of the source. It stops after it
/// returned an error token or the end-of-input token.
///
/// * `'h` represents the lifetime of the source being scanned.
///
/// To create a scanner with non-default options use the [`ScannerBuilder`].
#[derive(Debug, Clone)]
pub struct Scanner<'h> {
    name: String,
    machine: StateMachine<'h>,
    // Start of the last token returned, errors excluded
    last_pos: usize,
}

impl<'h> Scanner<'h> {
    /// Creates a scanner with default options. `name` is only used in diagnostics.
    pub fn new(name: &str, input: &'h str) -> Self {
        ScannerBuilder::new().name(name).build(input)
    }

    pub(crate) fn with_options(name: &str, input: &'h str, options: ScanOptions) -> Self {
        Self {
            name: name.to_string(),
            machine: StateMachine::new(input, options),
            last_pos: 0,
        }
    }

    /// The name of the scanned source.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scanned source.
    #[inline]
    pub fn input(&self) -> &'h str {
        self.machine.input()
    }

    /// Returns the next token.
    ///
    /// Returns `None` after the error or end-of-input token has been returned.
    pub fn next_token(&mut self) -> Option<Token<'h>> {
        let token = self.machine.next_token()?;
        if token.kind() != TokenKind::Error {
            self.last_pos = token.start();
        }
        Some(token)
    }

    /// The error that stopped the scanner, if any.
    #[inline]
    pub fn error(&self) -> Option<&ScanErrorKind> {
        self.machine.error()
    }

    /// Scans the complete source.
    ///
    /// Returns all tokens up to and including the end-of-input token, or the first error.
    /// The line of the error is the line of the last token scanned before it.
    pub fn tokenize(mut self) -> Result<Vec<Token<'h>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            if token.kind() == TokenKind::Error {
                let kind = self
                    .error()
                    .cloned()
                    .unwrap_or(ScanErrorKind::UnexpectedEndOfFile);
                return Err(ScanError::new(
                    &self.name,
                    self.line_number(),
                    token.start(),
                    kind,
                ));
            }
            tokens.push(token);
        }
        Ok(tokens)
    }
}

impl<'h> Iterator for Scanner<'h> {
    type Item = Token<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}

impl PositionProvider for Scanner<'_> {
    fn position(&self, offset: usize) -> Position {
        position_in(self.input(), offset)
    }

    /// Line numbers are computed from the start of the last token returned so a parser can
    /// report the line of the construct it was working on when an error arrived.
    fn line_number(&self) -> usize {
        self.machine.line_of(self.last_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_line_number_follows_returned_tokens() {
        init();
        let mut scanner = Scanner::new("test", "account A\n\n2016/09/09\n");
        assert_eq!(scanner.line_number(), 1);
        let tokens: Vec<_> = scanner.by_ref().take(6).collect();
        assert_eq!(tokens[5].kind(), TokenKind::Date);
        assert_eq!(scanner.line_number(), 3);
        let error = scanner.next_token().unwrap();
        assert_eq!(error.text(), "unexpected end-of-line");
        assert_eq!(scanner.line_number(), 3);
        assert!(scanner.next_token().is_none());
    }

    #[test]
    fn test_tokenize() {
        init();
        let tokens = Scanner::new("test", "include a.journal\n").tokenize().unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[4].kind(), TokenKind::EndOfInput);

        let err = Scanner::new("test.journal", "account A\n@")
            .tokenize()
            .unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.offset, 10);
        assert_eq!(
            err.to_string(),
            "test.journal:1: unrecognized character in directive: U+0040 '@'"
        );
    }

    #[test]
    fn test_position() {
        let scanner = Scanner::new("test", "2016/09/09 Payee\n  Account");
        assert_eq!(scanner.position(19), Position::new(2, 3));
    }
}
