#![forbid(missing_docs)]
//! # `ledger_scnr`
//! The `ledger_scnr` crate is a tokenizer for plain-text, line-oriented accounting journals in
//! the style of Ledger. It turns the journal source into a stream of typed tokens with byte
//! offsets that a parser consumes one at a time.
//!
//! The scanner is a hand-written state machine. Its states follow the structure of a journal:
//! top-level directives, transaction headers, indented posting blocks and the amounts of
//! postings. Whitespace is significant. Two spaces or a tab separate an account name from its
//! amount and a line without indentation ends a posting block.
//!
//! The scanner never panics on malformed input. It emits a single error token instead and stops.
//!
//! # Example
//! ```rust
//! use ledger_scnr::{Scanner, TokenKind};
//!
//! const INPUT: &str = "2016/09/09 * Payee ; So help me God
//!     Expenses:Food  -20.00 CAD
//!     Assets:Cash
//! ";
//!
//! fn main() {
//!     let scanner = Scanner::new("example.journal", INPUT);
//!     for token in scanner {
//!         if token.kind() != TokenKind::Whitespace {
//!             println!("{:?}: {}", token.kind(), token);
//!         }
//!     }
//! }
//! ```
//! The output of the example is:
//! ```text
//! Date: "2016/09/09"
//! Asterisk: "*"
//! String: "Payee "
//! Note: "; So help "...
//! EndOfLine: "\n"
//! AccountName: "Expenses:F"...
//! Negation: "-"
//! Quantity: "20.00"
//! Commodity: "CAD"
//! EndOfLine: "\n"
//! AccountName: "Assets:Cas"...
//! EndOfLine: "\n"
//! EndOfInput: EOF
//! ```
//!
//! To scan on a separate thread use [`scan_concurrently`] or [`TokenStream::spawn`].
//!
//! # Crate features
//! - `serde`: Enabled by default. Derives `Serialize` and `Deserialize` for the token kinds and
//!   positions and `Serialize` for tokens.

/// Module with error definitions
mod errors;
pub use errors::{Result, Rune, ScanError, ScanErrorKind};

/// The module with internal implementation details.
mod internal;

/// Module that provides a position type
mod position;
pub use position::{Position, PositionProvider};

/// The module with the scanner.
mod scanner;
pub use scanner::Scanner;

/// The module with the scanner builder.
mod scanner_builder;
pub use scanner_builder::ScannerBuilder;

/// Module that provides the token types
mod token;
pub use token::{Keyword, Token, TokenKind};

/// Module that provides the concurrent token stream
mod token_stream;
pub use token_stream::{scan_concurrently, TokenStream};

/// Module that provides a WithPositions type
mod with_positions;
pub use with_positions::{PositionedToken, TokenIterator, WithPositions};
