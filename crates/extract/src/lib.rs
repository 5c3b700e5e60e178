//! Best-effort plain-text extraction from uploaded documents.
//!
//! Dispatches a raw byte buffer to the strategy for its declared kind.
//! Extraction never fails from the caller's point of view: every path
//! resolves to a readable string, degrading to fixed instructional
//! messages when a format cannot be decoded. Failure reasons go to the
//! log, progress messages to the caller's [`ProgressSink`].

use rsvp_core::{FileKind, ProgressSink, RawDocument};
use rsvp_docx::DocxParser;
use rsvp_pdf::PdfScanner;
use std::io::Cursor;

pub use rsvp_pdf::PDF_PLACEHOLDER;

/// Fixed message substituted when a DOCX package cannot be parsed.
pub const DOCX_FAILURE_MESSAGE: &str = "The Word document could not be processed. \
     Please copy and paste its content manually into the text area.";

/// Fixed message for legacy binary .doc files, which are never parsed.
pub const LEGACY_DOC_MESSAGE: &str = "Legacy .doc files are not supported directly. \
     Please save the document as .docx and try again, or copy and paste the \
     content directly into the text area.";

/// Turn an uploaded document into readable plain text.
///
/// The result may be genuine content, a degraded best-effort
/// reconstruction, or one of the fixed placeholder messages; it is always
/// something the user can read and act on.
pub fn extract(document: &RawDocument, progress: &mut dyn ProgressSink) -> String {
    match document.kind {
        FileKind::Plain | FileKind::Markdown => {
            progress.update("Processing text file...");
            String::from_utf8_lossy(&document.bytes).into_owned()
        }
        FileKind::Docx => {
            progress.update("Processing Word document...");
            match DocxParser::new().parse(Cursor::new(document.bytes.as_slice())) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("DOCX extraction failed: {}", e);
                    DOCX_FAILURE_MESSAGE.to_string()
                }
            }
        }
        FileKind::LegacyDoc => LEGACY_DOC_MESSAGE.to_string(),
        FileKind::Pdf => {
            progress.update("Starting PDF processing...");
            PdfScanner::new().extract(&document.bytes, progress)
        }
    }
}
