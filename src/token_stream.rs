//! Module with the concurrent token stream.
//!
//! A [`TokenStream`] runs a [`Scanner`] on a scoped worker thread. Tokens are handed over a
//! rendezvous channel, so the scanner never runs ahead of the consumer by more than the token
//! it is currently offering.
//!
//! # Example
//! ```rust
//! use ledger_scnr::{scan_concurrently, Scanner, TokenKind};
//!
//! let scanner = Scanner::new("main.journal", "2016/09/09 Payee\n Account  20 CAD\n");
//! let accounts = scan_concurrently(scanner, |stream| {
//!     stream
//!         .filter(|t| t.kind() == TokenKind::AccountName)
//!         .map(|t| t.text().to_string())
//!         .collect::<Vec<_>>()
//! });
//! assert_eq!(accounts, vec!["Account".to_string()]);
//! ```

use std::thread::{self, Scope};

use crossbeam::channel::{bounded, Receiver, Sender};
use log::{debug, trace};

use crate::{position::position_in, Position, PositionProvider, Scanner, Token, TokenKind};

/// The consumer side of a scanner running on its own thread.
///
/// The stream ends after the error or end-of-input token. Dropping the stream stops the
/// scanner at its next handoff.
#[derive(Debug)]
pub struct TokenStream<'h> {
    name: String,
    input: &'h str,
    receiver: Receiver<Token<'h>>,
    // Start of the last token returned, errors excluded
    last_pos: usize,
}

impl<'h> TokenStream<'h> {
    /// Moves `scanner` to a new thread of `scope` and returns the stream of its tokens.
    pub fn spawn<'scope, 'env>(
        scope: &'scope Scope<'scope, 'env>,
        scanner: Scanner<'h>,
    ) -> Self
    where
        'h: 'scope,
    {
        let (sender, receiver) = bounded(0);
        let name = scanner.name().to_string();
        let input = scanner.input();
        scope.spawn(move || produce(scanner, sender));
        Self {
            name,
            input,
            receiver,
            last_pos: 0,
        }
    }

    /// The name of the scanned source.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the next token.
    ///
    /// Returns `None` after the error or end-of-input token has been returned.
    pub fn next_token(&mut self) -> Option<Token<'h>> {
        let token = self.receiver.recv().ok()?;
        if token.kind() != TokenKind::Error {
            self.last_pos = token.start();
        }
        Some(token)
    }

    /// Disposes of all tokens not consumed yet so that the scanner thread can finish.
    /// Returns the number of discarded tokens.
    pub fn drain(&mut self) -> usize {
        let count = self.receiver.iter().count();
        trace!("{}: drained {} tokens", self.name, count);
        count
    }
}

impl<'h> Iterator for TokenStream<'h> {
    type Item = Token<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl PositionProvider for TokenStream<'_> {
    fn position(&self, offset: usize) -> Position {
        position_in(self.input, offset)
    }

    fn line_number(&self) -> usize {
        position_in(self.input, self.last_pos).line
    }
}

// The producer loop, it ends when the scanner is exhausted or the consumer hung up.
fn produce<'h>(scanner: Scanner<'h>, sender: Sender<Token<'h>>) {
    let name = scanner.name().to_string();
    for token in scanner {
        if sender.send(token).is_err() {
            debug!("{}: consumer hung up, stopping the scanner", name);
            return;
        }
    }
    trace!("{}: scanner finished", name);
}

/// Runs `scanner` on a worker thread while `consume` pulls its tokens.
///
/// Tokens left over when `consume` returns are drained before this function returns.
pub fn scan_concurrently<'h, R>(
    scanner: Scanner<'h>,
    consume: impl FnOnce(&mut TokenStream<'h>) -> R,
) -> R {
    thread::scope(|scope| {
        let mut stream = TokenStream::spawn(scope, scanner);
        let result = consume(&mut stream);
        stream.drain();
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_same_tokens_as_scanner() {
        init();
        let input = "2016/09/09 * Payee ; note\n    Account  -20.00 CAD\n    Other\n";
        let expected: Vec<_> = Scanner::new("test", input).collect();
        let streamed = scan_concurrently(Scanner::new("test", input), |stream| {
            stream.by_ref().collect::<Vec<_>>()
        });
        assert_eq!(streamed, expected);
    }

    #[test]
    fn test_drain() {
        init();
        let drained = scan_concurrently(Scanner::new("test", "account A\n"), |stream| {
            let first = stream.next_token().unwrap();
            assert_eq!(first.text(), "account");
            assert_eq!(stream.name(), "test");
            stream.drain()
        });
        assert_eq!(drained, 4);
    }

    #[test]
    fn test_line_number() {
        init();
        scan_concurrently(Scanner::new("test", "account A\n\n@"), |stream| {
            let tokens: Vec<_> = stream.by_ref().collect();
            assert_eq!(tokens.last().map(|t| t.kind()), Some(TokenKind::Error));
            assert_eq!(stream.line_number(), 2);
            assert_eq!(PositionProvider::position(&*stream, 11), Position::new(3, 1));
        });
    }
}
