use std::fmt;

use thiserror::Error;

/// The result type for the `ledger_scnr` crate.
pub type Result<T> = std::result::Result<T, ScanError>;

/// A rune as it is reported in error messages.
///
/// `None` stands for the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rune(
    /// The rune, `None` for the end of the input.
    pub Option<char>,
);

impl fmt::Display for Rune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) if c.is_control() => write!(f, "U+{:04X}", c as u32),
            Some(c) => write!(f, "U+{:04X} '{}'", c as u32, c),
            None => write!(f, "end-of-file"),
        }
    }
}

/// The error returned by [`crate::Scanner::tokenize`].
///
/// It carries the name of the scanned source and the line the error was found on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    /// The name of the source, e.g. a file name.
    pub name: String,
    /// The 1-based line number, anchored on the last token returned before the error.
    pub line: usize,
    /// The byte offset the error token was reported at.
    pub offset: usize,
    /// The source of the error.
    pub source: Box<ScanErrorKind>,
}

impl ScanError {
    /// Create a new `ScanError`.
    pub fn new(name: &str, line: usize, offset: usize, kind: ScanErrorKind) -> Self {
        ScanError {
            name: name.to_string(),
            line,
            offset,
            source: Box::new(kind),
        }
    }

    /// The kind of the error.
    #[inline]
    pub fn kind(&self) -> &ScanErrorKind {
        &self.source
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.name, self.line, self.source)
    }
}

/// The error kind type.
///
/// The `Display` output of a kind is the text of the error token the scanner emits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// A rune that can't start any top-level construct.
    #[error("unrecognized character in directive: {0}")]
    UnrecognizedCharacter(Rune),

    /// A date that doesn't follow one of the supported layouts.
    #[error(
        "date format error, expects YYYY-MM-DD with '/', '-' or '.' as separators, \
         received character {0}"
    )]
    DateFormat(Rune),

    /// A date that isn't followed by a field separator.
    #[error("invalid character in transaction date specification: {0}")]
    InvalidDateCharacter(Rune),

    /// The input ended where more was required.
    #[error("unexpected end-of-file")]
    UnexpectedEndOfFile,

    /// The line ended where more was required.
    #[error("unexpected end-of-line")]
    UnexpectedEndOfLine,

    /// An identifier that isn't terminated by whitespace or the end of a line.
    #[error("bad character {0}")]
    BadTerminator(Rune),

    /// A directive keyword without its mandatory operand.
    #[error("missing {operand} after '{keyword}'")]
    MissingOperand {
        /// The keyword text.
        keyword: &'static str,
        /// What was expected after the keyword.
        operand: &'static str,
    },

    /// A `(` or `[` account without its closing delimiter.
    #[error("unterminated account reference")]
    UnterminatedAccountReference,

    /// A quoted commodity without its closing quote.
    #[error("unterminated quoted commodity")]
    UnterminatedCommodity,

    /// A closing delimiter in an amount that doesn't match the open annotation.
    #[error("unbalanced '{0}' in amount")]
    UnbalancedAnnotation(char),

    /// The line ended inside a lot annotation.
    #[error("unterminated lot annotation")]
    UnterminatedAnnotation,

    /// A rune that can't be part of an amount.
    #[error("invalid character in amount: {0}")]
    InvalidAmountCharacter(Rune),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rune_display() {
        assert_eq!(Rune(Some('e')).to_string(), "U+0065 'e'");
        assert_eq!(Rune(Some('€')).to_string(), "U+20AC '€'");
        assert_eq!(Rune(Some('\t')).to_string(), "U+0009");
        assert_eq!(Rune(None).to_string(), "end-of-file");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ScanErrorKind::DateFormat(Rune(Some('9'))).to_string(),
            "date format error, expects YYYY-MM-DD with '/', '-' or '.' as separators, \
             received character U+0039 '9'"
        );
        assert_eq!(
            ScanErrorKind::MissingOperand {
                keyword: "include",
                operand: "filename"
            }
            .to_string(),
            "missing filename after 'include'"
        );
        let err = ScanError::new("test.journal", 3, 42, ScanErrorKind::UnexpectedEndOfLine);
        assert_eq!(err.to_string(), "test.journal:3: unexpected end-of-line");
        assert_eq!(err.kind(), &ScanErrorKind::UnexpectedEndOfLine);
    }
}
