//! DOCX (Office Open XML) text extraction backend.
//!
//! Parses .docx files, which are ZIP archives containing XML documents.
//! Only the running text is recovered; structure beyond paragraph breaks
//! is not preserved.

pub mod parser;

pub use parser::DocxParser;
