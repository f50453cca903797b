//! Character classes of the journal language.
//!
//! All functions take an `Option<char>` because the cursor reports the end of the input as
//! `None`. No class contains the end of the input.

/// Space or tab.
#[inline]
pub(crate) fn is_space(c: Option<char>) -> bool {
    matches!(c, Some(' ' | '\t'))
}

/// Carriage return or line feed.
#[inline]
pub(crate) fn is_end_of_line(c: Option<char>) -> bool {
    matches!(c, Some('\r' | '\n'))
}

/// A letter, an ASCII digit or underscore.
#[inline]
pub(crate) fn is_alphanumeric(c: Option<char>) -> bool {
    matches!(c, Some(c) if c == '_' || c.is_alphabetic() || c.is_ascii_digit())
}

#[inline]
pub(crate) fn is_letter(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_alphabetic())
}

/// ASCII digits only, quantities and dates never contain other digits.
#[inline]
pub(crate) fn is_digit(c: Option<char>) -> bool {
    matches!(c, Some('0'..='9'))
}

#[inline]
pub(crate) fn is_date_separator(c: Option<char>) -> bool {
    matches!(c, Some('/' | '-' | '.'))
}

/// Line-leading characters that start a comment line.
#[inline]
pub(crate) fn is_comment_start(c: Option<char>) -> bool {
    matches!(c, Some(';' | '#' | '%' | '|' | '*'))
}

/// Two spaces, a tab, or a space followed by a tab delimit an account name from its amount.
#[inline]
pub(crate) fn is_field_separator(rest: &str) -> bool {
    rest.starts_with('\t') || rest.starts_with("  ") || rest.starts_with(" \t")
}

/// Characters that may appear in an unquoted commodity, like `CAD`, `$` or `€`.
pub(crate) fn is_commodity_char(c: Option<char>) -> bool {
    match c {
        None => false,
        Some(c) => {
            !(c.is_whitespace()
                || c.is_ascii_digit()
                || matches!(
                    c,
                    '.' | '"'
                        | ';'
                        | '-'
                        | '+'
                        | '*'
                        | '/'
                        | '^'
                        | '&'
                        | '|'
                        | '='
                        | '<'
                        | '>'
                        | '{'
                        | '}'
                        | '['
                        | ']'
                        | '('
                        | ')'
                        | '@'
                        | '!'
                        | ','
                ))
        }
    }
}
