/// Module with the posting amount sub-scanner.
mod amount;

/// Module with the character classes of the journal language.
pub(crate) mod char_class;

/// Module that provides the rune cursor.
mod cursor;
pub(crate) use cursor::Cursor;

/// Module with the date recognizer.
mod date;

/// Module with the scanner state machine.
mod states;
pub(crate) use states::{ScanOptions, ScannerState, StateMachine};
