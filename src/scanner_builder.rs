use crate::{internal::ScanOptions, Scanner};

/// A builder for creating scanners.
///
/// A builder can be used for any number of sources, all scanners it builds share its options.
#[derive(Debug, Clone)]
pub struct ScannerBuilder {
    name: String,
    options: ScanOptions,
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerBuilder {
    /// Creates a new scanner builder with default options.
    pub fn new() -> Self {
        Self {
            name: "<input>".to_string(),
            options: ScanOptions::default(),
        }
    }

    /// Sets the name of the source used in diagnostics, usually the file name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Enables or disables comment lines.
    ///
    /// If enabled, a line starting with `;`, `#`, `%`, `|` or `*` is scanned as a note.
    /// By default these characters are an error at the start of a line.
    pub fn comment_lines(mut self, enabled: bool) -> Self {
        self.options.comment_lines = enabled;
        self
    }

    /// Enables or disables strict date checking.
    ///
    /// Strict dates, the default, must have the layout `YYYY/MM/DD` with `/`, `-` or `.` as
    /// separator and one or two digit months and days. Permissive dates are any run of digits
    /// and separators.
    pub fn strict_dates(mut self, enabled: bool) -> Self {
        self.options.strict_dates = enabled;
        self
    }

    /// Builds a scanner for `input`.
    pub fn build<'h>(&self, input: &'h str) -> Scanner<'h> {
        Scanner::with_options(&self.name, input, self.options)
    }
}
