//! Heuristic PDF text recovery backend.
//!
//! There is deliberately no PDF parser library here; the scanner walks the
//! raw bytes for content-stream string literals. Best effort only.

pub mod scanner;

pub use scanner::{PdfScanner, DEFAULT_MIN_TEXT_LEN, PDF_PLACEHOLDER};
