use std::{borrow::Cow, fmt, sync::LazyLock};

use rustc_hash::FxHashMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The directive keywords of the journal language.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Keyword {
    /// `include <file>`
    Include,
    /// `account <name>`
    Account,
    /// `end <what>`
    End,
    /// `alias <alias>=<account>`
    Alias,
    /// `P <date> <commodity> <amount>`
    Price,
    /// `payee <regex>` inside an `account` block
    Payee,
}

impl Keyword {
    /// The source text of the keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Include => "include",
            Keyword::Account => "account",
            Keyword::End => "end",
            Keyword::Alias => "alias",
            Keyword::Price => "P",
            Keyword::Payee => "payee",
        }
    }

    /// Looks up a bareword in the keyword table.
    pub fn lookup(word: &str) -> Option<Keyword> {
        KEYWORDS.get(word).copied()
    }
}

static KEYWORDS: LazyLock<FxHashMap<&'static str, Keyword>> = LazyLock::new(|| {
    [
        Keyword::Include,
        Keyword::Account,
        Keyword::End,
        Keyword::Alias,
        Keyword::Price,
        Keyword::Payee,
    ]
    .into_iter()
    .map(|k| (k.as_str(), k))
    .collect()
});

/// The kind of a token.
///
/// Some kinds are reserved for the parser and never produced by the scanner. They are part of
/// the enumeration so that a parser can use the same type for synthesized tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    /// An error occurred, the token text is the error message.
    Error,
    /// The end of the input.
    EndOfInput,
    /// A quoted or bare string, e.g. a payee, a file name or a period expression.
    String,
    /// A note, from `;` to the end of the line.
    Note,
    /// Reserved.
    Journal,
    /// Reserved.
    JournalItem,
    /// A date like `2016/09/09`.
    Date,
    /// A run of spaces and tabs.
    Whitespace,
    /// `\n`, `\r` or `\r\n`.
    EndOfLine,
    /// Text in a posting line that starts neither an account, a flag nor a note.
    Text,
    /// `=`
    Equals,
    /// `*`, the cleared flag.
    Asterisk,
    /// `!`, the pending flag.
    Exclamation,
    /// Reserved, a `;` is always part of a [`TokenKind::Note`].
    Semicolon,
    /// A commodity like `CAD`, `$` or `"ACME 1"`.
    Commodity,
    /// A bareword that is not a keyword.
    Identifier,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `-` in front of an amount.
    Negation,
    /// A decimal number like `20.00`.
    Quantity,
    /// `~` at the start of a periodic transaction.
    Tilde,
    /// Reserved.
    PeriodExpression,
    /// `.` that is not part of a quantity.
    Dot,
    /// Reserved for a combined cleared status.
    Status,
    /// An account name like `Expenses:Misc`.
    AccountName,
    /// A virtual account like `(Expenses:Misc)` or `[Expenses:Misc]`.
    AccountReference,
    /// Reserved marker for automated transactions.
    AutomatedTransaction,
    /// Reserved marker for periodic transactions.
    PeriodicTransaction,
    /// Reserved marker for plain transactions.
    PlainTransaction,
    /// `@`, a per-unit price.
    At,
    /// `@@`, a total price.
    AtAt,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// A directive keyword.
    Keyword(Keyword),
}

impl TokenKind {
    /// Returns true for the kinds that end a token stream.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TokenKind::Error | TokenKind::EndOfInput)
    }
}

/// A token of the journal source.
///
/// The text of all tokens but errors is a slice of the scanned source.
/// * `'h` represents the lifetime of the source being scanned.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Token<'h> {
    kind: TokenKind,
    start: usize,
    text: Cow<'h, str>,
}

impl<'h> Token<'h> {
    /// Create a token that borrows its text from the source.
    pub fn new(kind: TokenKind, start: usize, text: &'h str) -> Self {
        Self {
            kind,
            start,
            text: Cow::Borrowed(text),
        }
    }

    /// Create an error token carrying `message`.
    pub fn error(start: usize, message: String) -> Self {
        Self {
            kind: TokenKind::Error,
            start,
            text: Cow::Owned(message),
        }
    }

    /// Get the kind of the token.
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Get the byte offset of the token in the source.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the byte offset behind the token.
    /// Error tokens don't cover any source text.
    #[inline]
    pub fn end(&self) -> usize {
        match self.kind {
            TokenKind::Error => self.start,
            _ => self.start + self.text.len(),
        }
    }

    /// Get the covered source range.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }

    /// Get the token text, the error message for error tokens.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check if this is an error or the end of the input.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "EOF"),
            TokenKind::Error => write!(f, "{}", self.text),
            TokenKind::Keyword(_) => write!(f, "<{}>", self.text),
            _ if self.text.chars().count() > 10 => {
                let head: String = self.text.chars().take(10).collect();
                write!(f, "{:?}...", head)
            }
            _ => write!(f, "{:?}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(Keyword::lookup("include"), Some(Keyword::Include));
        assert_eq!(Keyword::lookup("account"), Some(Keyword::Account));
        assert_eq!(Keyword::lookup("P"), Some(Keyword::Price));
        assert_eq!(Keyword::lookup("payee"), Some(Keyword::Payee));
        assert_eq!(Keyword::lookup("Include"), None);
        assert_eq!(Keyword::lookup("p"), None);
        assert_eq!(Keyword::lookup("apply"), None);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::new(TokenKind::EndOfInput, 5, "").to_string(), "EOF");
        assert_eq!(
            Token::error(0, "unexpected end-of-file".to_string()).to_string(),
            "unexpected end-of-file"
        );
        assert_eq!(
            Token::new(TokenKind::Keyword(Keyword::Include), 0, "include").to_string(),
            "<include>"
        );
        assert_eq!(Token::new(TokenKind::Date, 0, "2016/09/09").to_string(), "\"2016/09/09\"");
        assert_eq!(
            Token::new(TokenKind::AccountName, 0, "Expenses:Misc").to_string(),
            "\"Expenses:M\"..."
        );
    }

    #[test]
    fn test_token_range() {
        let token = Token::new(TokenKind::Quantity, 12, "20.00");
        assert_eq!(token.range(), 12..17);
        let error = Token::error(12, "bad character U+002E '.'".to_string());
        assert_eq!(error.range(), 12..12);
        assert!(error.is_terminal());
        assert!(!token.is_terminal());
    }
}
