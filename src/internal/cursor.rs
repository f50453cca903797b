use crate::{position::position_in, Token, TokenKind};

/// A cursor over the runes of the source.
///
/// The cursor keeps the start of the pending lexeme and its current position as byte offsets.
/// Pushing back a rune subtracts the width of the rune consumed last, which is why only a
/// single rune can be pushed back after each call of [`Cursor::next`].
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'h> {
    input: &'h str,
    // Start of the pending lexeme
    start: usize,
    // Current position
    pos: usize,
    // Width of the rune consumed last, `None` right after a backup
    width: Option<usize>,
}

impl<'h> Cursor<'h> {
    pub(crate) fn new(input: &'h str) -> Self {
        Self {
            input,
            start: 0,
            pos: 0,
            width: None,
        }
    }

    /// Consumes the next rune. Returns `None` at the end of the input.
    #[inline]
    pub(crate) fn next(&mut self) -> Option<char> {
        match self.input[self.pos..].chars().next() {
            Some(c) => {
                let width = c.len_utf8();
                self.width = Some(width);
                self.pos += width;
                Some(c)
            }
            None => {
                self.width = Some(0);
                None
            }
        }
    }

    /// Returns the next rune without consuming it.
    #[inline]
    pub(crate) fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Steps back one rune. Can only be called once per call of `next`.
    #[inline]
    pub(crate) fn backup(&mut self) {
        let width = self.width.take();
        debug_assert!(width.is_some(), "backup without a preceding next");
        self.pos -= width.unwrap_or(0);
    }

    /// Consumes the next rune if it satisfies `pred`.
    #[inline]
    pub(crate) fn accept(&mut self, pred: impl Fn(Option<char>) -> bool) -> bool {
        if pred(self.next()) {
            true
        } else {
            self.backup();
            false
        }
    }

    /// Consumes a run of runes satisfying `pred`. Returns true if at least one was consumed.
    #[inline]
    pub(crate) fn accept_run(&mut self, pred: impl Fn(Option<char>) -> bool) -> bool {
        let before = self.pos;
        while pred(self.next()) {}
        self.backup();
        self.pos > before
    }

    /// The unconsumed rest of the input.
    #[inline]
    pub(crate) fn rest(&self) -> &'h str {
        &self.input[self.pos..]
    }

    /// The text of the pending lexeme.
    #[inline]
    pub(crate) fn current(&self) -> &'h str {
        &self.input[self.start..self.pos]
    }

    /// Returns true if the pending lexeme is not empty.
    #[inline]
    pub(crate) fn is_pending(&self) -> bool {
        self.pos > self.start
    }

    /// The start offset of the pending lexeme.
    #[inline]
    pub(crate) fn start(&self) -> usize {
        self.start
    }

    /// Turns the pending lexeme into a token and starts a new one.
    #[inline]
    pub(crate) fn emit(&mut self, kind: TokenKind) -> Token<'h> {
        let token = Token::new(kind, self.start, self.current());
        self.start = self.pos;
        token
    }

    /// Skips over the pending input before this point.
    #[inline]
    pub(crate) fn ignore(&mut self) {
        self.start = self.pos;
    }

    /// The 1-based line number of the byte `offset`.
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        position_in(self.input, offset).line
    }

    #[inline]
    pub(crate) fn input(&self) -> &'h str {
        self.input
    }
}
