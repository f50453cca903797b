use crate::{errors::Rune, ScanErrorKind};

use super::{
    char_class::{is_date_separator, is_digit},
    Cursor,
};

/// Scans the body of a date and leaves the cursor on the first rune behind it.
///
/// In strict mode the date must have the layout `YYYY s M[M] s D[D]` where the separator `s` is
/// one of `/`, `-` or `.` and is the same for both positions.
/// Otherwise any run of digits and separators that starts with a digit is accepted.
pub(crate) fn scan_date(cursor: &mut Cursor<'_>, strict: bool) -> Result<(), ScanErrorKind> {
    if !strict {
        expect(cursor, is_digit)?;
        cursor.accept_run(|c| is_digit(c) || is_date_separator(c));
        return Ok(());
    }

    for _ in 0..4 {
        expect(cursor, is_digit)?;
    }
    let separator = expect(cursor, is_date_separator)?;
    expect(cursor, is_digit)?;
    cursor.accept(is_digit);
    expect(cursor, |c| c == separator)?;
    expect(cursor, is_digit)?;
    cursor.accept(is_digit);
    Ok(())
}

fn expect(
    cursor: &mut Cursor<'_>,
    pred: impl Fn(Option<char>) -> bool,
) -> Result<Option<char>, ScanErrorKind> {
    let c = cursor.next();
    if pred(c) {
        Ok(c)
    } else {
        Err(ScanErrorKind::DateFormat(Rune(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str, strict: bool) -> (Result<(), ScanErrorKind>, &str) {
        let mut cursor = Cursor::new(input);
        let result = scan_date(&mut cursor, strict);
        (result, cursor.current())
    }

    #[test]
    fn test_layouts() {
        assert_eq!(scan("2016/09/09 x", true), (Ok(()), "2016/09/09"));
        assert_eq!(scan("2016-9-1\n", true), (Ok(()), "2016-9-1"));
        assert_eq!(scan("2016.12.31", true), (Ok(()), "2016.12.31"));
        // The third day digit is left for the boundary check
        assert_eq!(scan("2016/09/091", true), (Ok(()), "2016/09/09"));
    }

    #[test]
    fn test_malformed() {
        let format = |c| Err(ScanErrorKind::DateFormat(Rune(c)));
        assert_eq!(scan("2016/099/08 Payee", true).0, format(Some('9')));
        assert_eq!(scan("2016/09eee\n", true).0, format(Some('e')));
        assert_eq!(scan("2016/09", true).0, format(None));
        assert_eq!(scan("2016/09-09", true).0, format(Some('-')));
        assert_eq!(scan("16/09/09", true).0, format(Some('/')));
    }

    #[test]
    fn test_permissive() {
        assert_eq!(scan("2016/099/08 Payee", false), (Ok(()), "2016/099/08"));
        assert_eq!(scan("09/09x", false), (Ok(()), "09/09"));
        assert_eq!(
            scan("]", false).0,
            Err(ScanErrorKind::DateFormat(Rune(Some(']'))))
        );
        assert_eq!(
            scan("/09", false).0,
            Err(ScanErrorKind::DateFormat(Rune(Some('/'))))
        );
    }
}
