//! Error types for document text extraction.
//!
//! These stay internal to the extraction pipeline: the dispatch facade
//! converts every failure into a fixed user-facing string before it can
//! reach a caller.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read from the underlying buffer or stream.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error (for DOCX packages).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error (for the DOCX document part).
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The DOCX package was readable but its structure was not.
    #[error("DOCX parsing error: {0}")]
    DocxParse(String),
}
