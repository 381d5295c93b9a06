//! Error types for the pdftoc library.

use std::io;
use thiserror::Error;

/// Result type alias for pdftoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction and labeling.
///
/// Page-scoped failures (`Decode`) are recoverable: the remaining pages of
/// the document are still processed. Document-scoped failures (`PdfParse`,
/// `Encrypted`, `UnknownFormat`) skip the document. `RuleConfig` is a
/// startup failure because label rules are static configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing the document-level PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and no usable credentials are available.
    #[error("Document is encrypted")]
    Encrypted,

    /// A single page could not be decoded into text runs.
    #[error("Failed to decode page {page}: {reason}")]
    Decode {
        /// 1-indexed page number
        page: u32,
        /// Underlying reason
        reason: String,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A label rule definition is malformed (bad pattern).
    #[error("Invalid label rule '{name}': {reason}")]
    RuleConfig {
        /// Rule name
        name: String,
        /// Compile failure detail
        reason: String,
    },

    /// Error reading or writing a persisted outline.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a page-scoped decode error.
    pub fn decode(page: u32, reason: impl Into<String>) -> Self {
        Error::Decode {
            page,
            reason: reason.into(),
        }
    }

    /// Whether this error is scoped to a single page and the rest of the
    /// document can still be processed.
    pub fn is_page_scoped(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::PageOutOfRange(_, _))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::decode(3, "bad content stream");
        assert_eq!(
            err.to_string(),
            "Failed to decode page 3: bad content stream"
        );

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_page_scoped() {
        assert!(Error::decode(1, "x").is_page_scoped());
        assert!(Error::PageOutOfRange(2, 1).is_page_scoped());
        assert!(!Error::Encrypted.is_page_scoped());
        assert!(!Error::UnknownFormat.is_page_scoped());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
