//! Tokenizer options.

/// Options for tokenizing PDF documents.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// How page-level decode failures are handled
    pub error_mode: ErrorMode,
}

impl ParseOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Propagate the first page decode failure instead of skipping.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }
}

/// Error handling mode for page decoding.
///
/// Lenient is the default: a corrupt page is logged and skipped, and the
/// remaining pages of the document are still tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Skip undecodable pages and continue
    #[default]
    Lenient,
    /// Fail the document on the first undecodable page
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
    }

    #[test]
    fn test_strict_builder() {
        let options = ParseOptions::new().strict();
        assert_eq!(options.error_mode, ErrorMode::Strict);
    }
}
