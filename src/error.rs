//! Error types for pdfregions library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfregions operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during layout extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON in a layout dump or during serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A rectangle with missing or non-finite coordinates.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The content source failed while answering a query.
    #[error("Content source failure on page {page}: {message}")]
    ContentSource {
        /// Page number (1-indexed)
        page: u32,
        /// Message reported by the source
        message: String,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// An extraction option has an unusable value.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a [`Error::ContentSource`] for the given page.
    pub fn content_source(page: u32, message: impl Into<String>) -> Self {
        Error::ContentSource {
            page,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidGeometry("bbox has 3 values".to_string());
        assert_eq!(err.to_string(), "Invalid geometry: bbox has 3 values");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::content_source(2, "handle closed");
        assert_eq!(
            err.to_string(),
            "Content source failure on page 2: handle closed"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
