//! The amount behind an account name or in a `P` directive.
//!
//! The amount is only split into tokens, the order of the tokens is left to the parser:
//!
//! ```text
//! values_opt: spacer amount_expr price_opt | [epsilon] ;
//! amount:     neg_opt commodity quantity annotation | quantity commodity annotation ;
//! price:      '@' amount_expr | '@@' amount_expr ;
//! annotation: lot_price_opt lot_date_opt lot_note_opt ;
//! lot_price:  '{' amount '}' ;
//! lot_date:   '[' date ']' ;
//! lot_note:   '(' string ')' ;
//! ```

use crate::{errors::Rune, ScanErrorKind, TokenKind};

use super::{
    char_class::{is_commodity_char, is_digit, is_end_of_line, is_space},
    ScannerState, StateMachine,
};

impl StateMachine<'_> {
    /// Scans one element of an amount. At the end of the line the machine continues with
    /// `resume` without consuming the line end.
    pub(super) fn amount(&mut self, resume: ScannerState) -> ScannerState {
        let this = match resume {
            ScannerState::TopLevel => ScannerState::PriceAmount,
            _ => ScannerState::PostingAmount,
        };
        let c = self.cursor.next();
        match c {
            _ if c.is_none() || is_end_of_line(c) => {
                self.cursor.backup();
                if !self.annotations.is_empty() {
                    return self.fail(ScanErrorKind::UnterminatedAnnotation);
                }
                return resume;
            }
            _ if is_space(c) => {
                self.cursor.accept_run(is_space);
                self.emit(TokenKind::Whitespace);
            }
            Some(';') => self.scan_note(),
            Some('-') => self.emit(TokenKind::Negation),
            _ if is_digit(c) => self.scan_quantity(),
            Some('.') => self.emit(TokenKind::Dot),
            Some('"') => {
                if let Err(kind) = self.scan_quoted_commodity() {
                    return self.fail(kind);
                }
            }
            Some('@') => {
                if self.cursor.accept(|c| c == Some('@')) {
                    self.emit(TokenKind::AtAt);
                } else {
                    self.emit(TokenKind::At);
                }
            }
            Some('=') => self.emit(TokenKind::Equals),
            Some(open @ ('{' | '[' | '(')) => {
                if let Err(kind) = self.open_annotation(open) {
                    return self.fail(kind);
                }
            }
            Some(close @ ('}' | ']' | ')')) => {
                if self.annotations.last() != Some(&close) {
                    return self.fail(ScanErrorKind::UnbalancedAnnotation(close));
                }
                self.annotations.pop();
                self.emit(match close {
                    '}' => TokenKind::RightBrace,
                    ']' => TokenKind::RightBracket,
                    _ => TokenKind::RightParen,
                });
            }
            _ if is_commodity_char(c) => {
                self.cursor.accept_run(is_commodity_char);
                self.emit(TokenKind::Commodity);
            }
            _ => return self.fail(ScanErrorKind::InvalidAmountCharacter(Rune(c))),
        }
        this
    }

    /// Scans a commodity at the cursor, either quoted or a run of commodity characters.
    /// Returns false if there is none.
    pub(super) fn scan_commodity(&mut self) -> Result<bool, ScanErrorKind> {
        if self.cursor.accept(|c| c == Some('"')) {
            self.scan_quoted_commodity()?;
            Ok(true)
        } else if self.cursor.accept_run(is_commodity_char) {
            self.emit(TokenKind::Commodity);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // `[0-9]+(\.[0-9]+)?`, the first digit has been consumed.
    fn scan_quantity(&mut self) {
        self.cursor.accept_run(is_digit);
        let mut rest = self.cursor.rest().chars();
        if rest.next() == Some('.') && is_digit(rest.next()) {
            self.cursor.next();
            self.cursor.accept_run(is_digit);
        }
        self.emit(TokenKind::Quantity);
    }

    // The opening quote has been consumed.
    fn scan_quoted_commodity(&mut self) -> Result<(), ScanErrorKind> {
        loop {
            let c = self.cursor.next();
            if c == Some('"') {
                break;
            }
            if c.is_none() || is_end_of_line(c) {
                self.cursor.backup();
                return Err(ScanErrorKind::UnterminatedCommodity);
            }
        }
        self.emit(TokenKind::Commodity);
        Ok(())
    }

    // The opening delimiter has been consumed.
    fn open_annotation(&mut self, open: char) -> Result<(), ScanErrorKind> {
        let (kind, close) = match open {
            '{' => (TokenKind::LeftBrace, '}'),
            '[' => (TokenKind::LeftBracket, ']'),
            _ => (TokenKind::LeftParen, ')'),
        };
        self.emit(kind);
        self.annotations.push(close);
        match open {
            '[' => {
                self.scan_date()?;
                let next = self.cursor.peek();
                if next != Some(']') {
                    return Err(ScanErrorKind::InvalidDateCharacter(Rune(next)));
                }
                self.emit(TokenKind::Date);
            }
            '(' => {
                self.scan_string_until(')');
            }
            _ => {}
        }
        Ok(())
    }
}
