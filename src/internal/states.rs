use std::collections::VecDeque;

use log::{debug, trace};

use crate::{errors::Rune, Keyword, ScanErrorKind, Token, TokenKind};

use super::{
    char_class::{
        is_alphanumeric, is_comment_start, is_digit, is_end_of_line, is_field_separator,
        is_letter, is_space,
    },
    date::scan_date,
    Cursor,
};

/// Options that change the behavior of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanOptions {
    /// Line-leading `;`, `#`, `%`, `|` and `*` start a comment line.
    /// Off by default, the characters are unrecognized at the top level then.
    pub(crate) comment_lines: bool,
    /// Dates must follow the `YYYY/MM/DD` layout.
    pub(crate) strict_dates: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            comment_lines: false,
            strict_dates: true,
        }
    }
}

/// The states of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScannerState {
    TopLevel,
    Bareword,
    /// The barewords behind `end`, keywords without operands.
    EndOperands,
    PeriodicTransactionHeader,
    AutomatedTransactionHeader,
    TransactionDate,
    TransactionHeaderRest,
    PostingsBlock,
    PostingAmount,
    /// The amount of a `P` directive, resumes at [`ScannerState::TopLevel`].
    PriceAmount,
    /// An error or the end of the input has been emitted.
    Halted,
}

/// The scanner state machine.
///
/// Each state is a method that consumes runes, queues zero or more tokens and returns the next
/// state. Once an error or the end of the input is queued the machine is halted.
#[derive(Debug, Clone)]
pub(crate) struct StateMachine<'h> {
    pub(super) cursor: Cursor<'h>,
    pub(super) options: ScanOptions,
    state: ScannerState,
    pending: VecDeque<Token<'h>>,
    // True right after an end of line inside a postings block
    expect_indent: bool,
    // Closing delimiters of the open lot annotations in an amount
    pub(super) annotations: Vec<char>,
    error: Option<ScanErrorKind>,
}

impl<'h> StateMachine<'h> {
    pub(crate) fn new(input: &'h str, options: ScanOptions) -> Self {
        Self {
            cursor: Cursor::new(input),
            options,
            state: ScannerState::TopLevel,
            pending: VecDeque::new(),
            expect_indent: false,
            annotations: Vec::new(),
            error: None,
        }
    }

    /// Returns the next token, runs the state functions until one is available.
    /// Returns `None` after the error or end-of-input token has been returned.
    pub(crate) fn next_token(&mut self) -> Option<Token<'h>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.state == ScannerState::Halted {
                return None;
            }
            let next = self.step();
            if next != self.state {
                trace!("{:?} -> {:?}", self.state, next);
            }
            self.state = next;
        }
    }

    /// The error that halted the machine, if any.
    #[inline]
    pub(crate) fn error(&self) -> Option<&ScanErrorKind> {
        self.error.as_ref()
    }

    #[inline]
    pub(crate) fn input(&self) -> &'h str {
        self.cursor.input()
    }

    #[inline]
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        self.cursor.line_of(offset)
    }

    fn step(&mut self) -> ScannerState {
        match self.state {
            ScannerState::TopLevel => self.top_level(),
            ScannerState::Bareword => self.bareword(),
            ScannerState::EndOperands => self.end_operands(),
            ScannerState::PeriodicTransactionHeader
            | ScannerState::AutomatedTransactionHeader => self.template_header(),
            ScannerState::TransactionDate => self.transaction_date(),
            ScannerState::TransactionHeaderRest => self.transaction_header_rest(),
            ScannerState::PostingsBlock => self.postings_block(),
            ScannerState::PostingAmount => self.amount(ScannerState::PostingsBlock),
            ScannerState::PriceAmount => self.amount(ScannerState::TopLevel),
            ScannerState::Halted => ScannerState::Halted,
        }
    }

    /// Queues the pending lexeme as a token of the given kind.
    pub(super) fn emit(&mut self, kind: TokenKind) {
        let token = self.cursor.emit(kind);
        trace!("{:?} {} at {}", kind, token, token.start());
        self.pending.push_back(token);
    }

    /// Queues an error token at the start of the pending lexeme, which is dropped, and halts
    /// the machine.
    pub(super) fn fail(&mut self, kind: ScanErrorKind) -> ScannerState {
        debug!("scan error at {}: {}", self.cursor.start(), kind);
        self.pending
            .push_back(Token::error(self.cursor.start(), kind.to_string()));
        self.cursor.ignore();
        self.error = Some(kind);
        ScannerState::Halted
    }

    // -------------------------------------------------------------------------------------------
    // States
    // -------------------------------------------------------------------------------------------

    /// Top-level journal constructs.
    fn top_level(&mut self) -> ScannerState {
        let c = self.cursor.next();
        match c {
            _ if is_space(c) => {
                self.cursor.accept_run(is_space);
                self.emit(TokenKind::Whitespace);
            }
            Some('~') => {
                self.emit(TokenKind::Tilde);
                return ScannerState::PeriodicTransactionHeader;
            }
            Some('=') => {
                self.emit(TokenKind::Equals);
                return ScannerState::AutomatedTransactionHeader;
            }
            _ if is_digit(c) => {
                self.cursor.backup();
                return ScannerState::TransactionDate;
            }
            _ if is_alphanumeric(c) => {
                self.cursor.backup();
                return ScannerState::Bareword;
            }
            _ if is_end_of_line(c) => self.end_of_line(c),
            None => {
                self.emit(TokenKind::EndOfInput);
                return ScannerState::Halted;
            }
            _ if self.options.comment_lines && is_comment_start(c) => self.scan_note(),
            _ => return self.fail(ScanErrorKind::UnrecognizedCharacter(Rune(c))),
        }
        ScannerState::TopLevel
    }

    /// A bareword, either a directive keyword with its operands or a plain identifier.
    fn bareword(&mut self) -> ScannerState {
        let keyword = match self.scan_word() {
            Ok(Some(keyword)) => keyword,
            Ok(None) => {
                self.emit(TokenKind::Identifier);
                return ScannerState::TopLevel;
            }
            Err(kind) => return self.fail(kind),
        };
        self.emit(TokenKind::Keyword(keyword));
        self.scan_spaces();
        match keyword {
            Keyword::Include => {
                if !self.scan_string_to_eol() {
                    return self.missing(keyword, "filename");
                }
            }
            Keyword::Account => {
                if !self.scan_account_name() {
                    return self.missing(keyword, "account name");
                }
            }
            Keyword::Alias => return self.alias(),
            Keyword::Payee => {
                if !self.scan_string_to_eol() {
                    return self.missing(keyword, "payee");
                }
            }
            Keyword::End => {
                if is_alphanumeric(self.cursor.peek()) {
                    return ScannerState::EndOperands;
                }
            }
            Keyword::Price => return self.price_directive(),
        }
        ScannerState::TopLevel
    }

    /// `end apply account`: every bareword up to the end of the line is a single token.
    fn end_operands(&mut self) -> ScannerState {
        let kind = match self.scan_word() {
            Ok(Some(keyword)) => TokenKind::Keyword(keyword),
            Ok(None) => TokenKind::Identifier,
            Err(kind) => return self.fail(kind),
        };
        self.emit(kind);
        self.scan_spaces();
        if is_alphanumeric(self.cursor.peek()) {
            ScannerState::EndOperands
        } else {
            ScannerState::TopLevel
        }
    }

    /// The header of a periodic (`~`) or automated (`=`) transaction.
    fn template_header(&mut self) -> ScannerState {
        self.scan_spaces();
        self.scan_string_note();
        self.enter_postings()
    }

    /// The date of a plain transaction or its effective date after `=`.
    fn transaction_date(&mut self) -> ScannerState {
        let result = self.scan_date().and_then(|()| self.end_date(true));
        match result {
            Ok(()) => ScannerState::TransactionHeaderRest,
            Err(kind) => self.fail(kind),
        }
    }

    /// The part of a transaction header behind the date.
    fn transaction_header_rest(&mut self) -> ScannerState {
        match self.cursor.next() {
            Some('=') => {
                self.emit(TokenKind::Equals);
                self.scan_spaces();
                return ScannerState::TransactionDate;
            }
            Some('*') => {
                self.emit(TokenKind::Asterisk);
                self.scan_spaces();
            }
            Some('!') => {
                self.emit(TokenKind::Exclamation);
                self.scan_spaces();
            }
            Some('(') => {
                self.emit(TokenKind::LeftParen);
                self.scan_string_until(')');
            }
            Some(')') => {
                self.emit(TokenKind::RightParen);
                self.scan_spaces();
            }
            _ => {
                self.cursor.backup();
                self.scan_string_note();
                return self.enter_postings();
            }
        }
        ScannerState::TransactionHeaderRest
    }

    /// The indented lines of a transaction.
    /// A line that doesn't start with whitespace ends the block.
    fn postings_block(&mut self) -> ScannerState {
        let c = self.cursor.next();
        if is_end_of_line(c) {
            self.end_of_line(c);
            self.expect_indent = true;
            return ScannerState::PostingsBlock;
        }
        if self.expect_indent {
            self.expect_indent = false;
            if is_space(c) {
                self.cursor.accept_run(is_space);
                self.emit(TokenKind::Whitespace);
                return ScannerState::PostingsBlock;
            }
            self.cursor.backup();
            return ScannerState::TopLevel;
        }
        match c {
            None => {
                self.cursor.backup();
                return ScannerState::TopLevel;
            }
            Some('*') => {
                self.emit(TokenKind::Asterisk);
                self.scan_spaces();
            }
            Some('!') => {
                self.emit(TokenKind::Exclamation);
                self.scan_spaces();
            }
            Some(';') => self.scan_note(),
            Some(open @ ('(' | '[')) => return self.account_reference(open),
            _ if is_letter(c) => {
                self.scan_account_name();
                return ScannerState::PostingAmount;
            }
            _ => {
                self.cursor.accept_run(|c| {
                    !(c.is_none()
                        || is_end_of_line(c)
                        || is_letter(c)
                        || matches!(c, Some('*' | '!' | ';' | '(' | '[')))
                });
                self.emit(TokenKind::Text);
            }
        }
        ScannerState::PostingsBlock
    }

    // -------------------------------------------------------------------------------------------
    // Helpers used by several states
    // -------------------------------------------------------------------------------------------

    fn enter_postings(&mut self) -> ScannerState {
        self.expect_indent = false;
        ScannerState::PostingsBlock
    }

    /// Consumes a bareword, which must be followed by whitespace or the end of a line.
    /// Returns its keyword if it is one.
    fn scan_word(&mut self) -> Result<Option<Keyword>, ScanErrorKind> {
        self.cursor.accept_run(is_alphanumeric);
        let next = self.cursor.peek();
        if !(is_space(next) || is_end_of_line(next) || next.is_none()) {
            return Err(ScanErrorKind::BadTerminator(Rune(next)));
        }
        Ok(Keyword::lookup(self.cursor.current()))
    }

    fn missing(&mut self, keyword: Keyword, operand: &'static str) -> ScannerState {
        self.fail(ScanErrorKind::MissingOperand {
            keyword: keyword.as_str(),
            operand,
        })
    }

    /// Emits an end of line, `c` has been consumed already. `\r\n` is a single token.
    fn end_of_line(&mut self, c: Option<char>) {
        if c == Some('\r') {
            self.cursor.accept(|c| c == Some('\n'));
        }
        self.emit(TokenKind::EndOfLine);
    }

    /// Emits a run of spaces and tabs if there is one.
    pub(super) fn scan_spaces(&mut self) -> bool {
        if self.cursor.accept_run(is_space) {
            self.emit(TokenKind::Whitespace);
            true
        } else {
            false
        }
    }

    /// Emits everything up to the end of the line as a note.
    pub(super) fn scan_note(&mut self) {
        self.cursor.accept_run(|c| !(c.is_none() || is_end_of_line(c)));
        self.emit(TokenKind::Note);
    }

    pub(super) fn scan_date(&mut self) -> Result<(), ScanErrorKind> {
        scan_date(&mut self.cursor, self.options.strict_dates)
    }

    /// Checks the rune behind a date and emits the date.
    /// A date is followed by whitespace, or by `=` if it may carry an effective date.
    fn end_date(&mut self, effective: bool) -> Result<(), ScanErrorKind> {
        let next = self.cursor.peek();
        match next {
            _ if is_space(next) => {
                self.emit(TokenKind::Date);
                self.scan_spaces();
                Ok(())
            }
            Some('=') if effective => {
                self.emit(TokenKind::Date);
                Ok(())
            }
            None => {
                self.emit(TokenKind::Date);
                Err(ScanErrorKind::UnexpectedEndOfFile)
            }
            _ if is_end_of_line(next) => {
                self.emit(TokenKind::Date);
                Err(ScanErrorKind::UnexpectedEndOfLine)
            }
            _ => Err(ScanErrorKind::InvalidDateCharacter(Rune(next))),
        }
    }

    /// Emits the rest of the line as a string. Returns false if the line is empty.
    fn scan_string_to_eol(&mut self) -> bool {
        self.cursor
            .accept_run(|c| !(c.is_none() || is_end_of_line(c)));
        if !self.cursor.is_pending() {
            return false;
        }
        self.emit(TokenKind::String);
        true
    }

    /// Emits the text up to `until` or the end of the line as a string.
    pub(super) fn scan_string_until(&mut self, until: char) -> bool {
        self.cursor
            .accept_run(|c| !(c.is_none() || is_end_of_line(c) || c == Some(until)));
        if !self.cursor.is_pending() {
            return false;
        }
        self.emit(TokenKind::String);
        true
    }

    /// Emits the rest of the line as a string, split into a string and a note at the first `;`.
    fn scan_string_note(&mut self) {
        self.cursor
            .accept_run(|c| !(c.is_none() || is_end_of_line(c) || c == Some(';')));
        if self.cursor.is_pending() {
            self.emit(TokenKind::String);
        }
        if self.cursor.accept(|c| c == Some(';')) {
            self.scan_note();
        }
    }

    /// Emits an account name that ends at the end of the line or at a field separator.
    /// Returns false if there is no account name.
    fn scan_account_name(&mut self) -> bool {
        while !is_field_separator(self.cursor.rest()) {
            let c = self.cursor.next();
            if c.is_none() || is_end_of_line(c) {
                self.cursor.backup();
                break;
            }
        }
        if !self.cursor.is_pending() {
            return false;
        }
        self.emit(TokenKind::AccountName);
        true
    }

    /// A virtual account in parentheses or brackets, `open` has been consumed.
    fn account_reference(&mut self, open: char) -> ScannerState {
        let close = if open == '(' { ')' } else { ']' };
        loop {
            let c = self.cursor.next();
            if c == Some(close) {
                break;
            }
            if c.is_none() || is_end_of_line(c) {
                self.cursor.backup();
                return self.fail(ScanErrorKind::UnterminatedAccountReference);
            }
        }
        self.emit(TokenKind::AccountReference);
        ScannerState::PostingAmount
    }

    /// The operands of `alias`: `<alias>[=<account>]`.
    fn alias(&mut self) -> ScannerState {
        // Blanks inside the alias belong to it, blanks in front of `=` don't.
        loop {
            let ahead = self.cursor.rest().trim_start_matches([' ', '\t']);
            if ahead.is_empty() || ahead.starts_with(['=', '\r', '\n']) {
                break;
            }
            self.cursor.next();
        }
        if !self.cursor.is_pending() {
            return self.missing(Keyword::Alias, "alias");
        }
        self.emit(TokenKind::AccountName);
        self.scan_spaces();
        if self.cursor.accept(|c| c == Some('=')) {
            self.emit(TokenKind::Equals);
            self.scan_spaces();
            if !self.scan_account_name() {
                return self.missing(Keyword::Alias, "account name");
            }
        }
        ScannerState::TopLevel
    }

    /// The operands of `P`: `<date> <commodity> <amount>`.
    fn price_directive(&mut self) -> ScannerState {
        if let Err(kind) = self.scan_date().and_then(|()| self.end_date(false)) {
            return self.fail(kind);
        }
        match self.scan_commodity() {
            Ok(true) => {}
            Ok(false) => return self.missing(Keyword::Price, "commodity"),
            Err(kind) => return self.fail(kind),
        }
        ScannerState::PriceAmount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, String)> {
        let mut machine = StateMachine::new(input, ScanOptions::default());
        std::iter::from_fn(|| machine.next_token())
            .map(|t| (t.kind(), t.text().to_string()))
            .collect()
    }

    #[test]
    fn test_halts_after_terminal_token() {
        let mut machine = StateMachine::new("2016/09", ScanOptions::default());
        assert_eq!(machine.next_token().map(|t| t.kind()), Some(TokenKind::Error));
        assert!(machine.next_token().is_none());
        assert!(machine.next_token().is_none());
        assert_eq!(
            machine.error(),
            Some(&ScanErrorKind::DateFormat(Rune(None)))
        );
    }

    #[test]
    fn test_postings_end_at_unindented_line() {
        let tokens = kinds("2016/09/09 Payee\n Account\nalias a=b");
        let texts: Vec<_> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "2016/09/09",
                " ",
                "Payee",
                "\n",
                " ",
                "Account",
                "\n",
                "alias",
                " ",
                "a",
                "=",
                "b",
                ""
            ]
        );
        assert_eq!(tokens[7].0, TokenKind::Keyword(Keyword::Alias));
        assert_eq!(tokens[9].0, TokenKind::AccountName);
        assert_eq!(tokens[10].0, TokenKind::Equals);
        assert_eq!(tokens[11].0, TokenKind::AccountName);
    }

    #[test]
    fn test_unclassified_posting_text() {
        let tokens = kinds("~ monthly\n  42 Account\n");
        assert_eq!(
            tokens[5..],
            [
                (TokenKind::Text, "42 ".to_string()),
                (TokenKind::AccountName, "Account".to_string()),
                (TokenKind::EndOfLine, "\n".to_string()),
                (TokenKind::EndOfInput, String::new()),
            ]
        );
    }

    #[test]
    fn test_alias_without_trailing_blanks() {
        let tokens = kinds("alias food stuff = Expenses:Food\nalias x \n");
        let texts: Vec<_> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "alias",
                " ",
                "food stuff",
                " ",
                "=",
                " ",
                "Expenses:Food",
                "\n",
                "alias",
                " ",
                "x",
                " ",
                "\n",
                ""
            ]
        );
        assert_eq!(tokens[2].0, TokenKind::AccountName);
        assert_eq!(tokens[3].0, TokenKind::Whitespace);
        assert_eq!(tokens[10].0, TokenKind::AccountName);
    }

    #[test]
    fn test_end_takes_no_operands() {
        let tokens = kinds("end apply account\nend payee\n");
        let expected = [
            TokenKind::Keyword(Keyword::End),
            TokenKind::Whitespace,
            TokenKind::Identifier,
            TokenKind::Whitespace,
            TokenKind::Keyword(Keyword::Account),
            TokenKind::EndOfLine,
            TokenKind::Keyword(Keyword::End),
            TokenKind::Whitespace,
            TokenKind::Keyword(Keyword::Payee),
            TokenKind::EndOfLine,
            TokenKind::EndOfInput,
        ];
        assert_eq!(tokens.iter().map(|(k, _)| *k).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_error_drops_pending_lexeme() {
        let mut machine = StateMachine::new("2016/09/09x", ScanOptions::default());
        let error = machine.next_token().unwrap();
        assert_eq!(error.start(), 0);
        assert!(!machine.cursor.is_pending());
    }

    #[test]
    fn test_crlf_is_one_end_of_line() {
        let tokens = kinds("account A\r\n");
        assert_eq!(tokens[3], (TokenKind::EndOfLine, "\r\n".to_string()));
        assert_eq!(tokens.len(), 5);
    }
}
