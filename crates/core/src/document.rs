//! Domain types for uploaded documents.

use serde::{Deserialize, Serialize};

/// An uploaded file: an immutable byte buffer plus its declared kind.
///
/// Produced once per upload and consumed by the extraction facade.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Raw file contents.
    pub bytes: Vec<u8>,

    /// Declared kind, normally derived via [`FileKind::classify`].
    pub kind: FileKind,
}

impl RawDocument {
    /// Create a new raw document from bytes and a declared kind.
    pub fn new(bytes: Vec<u8>, kind: FileKind) -> Self {
        Self { bytes, kind }
    }
}

/// The declared kind of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Plain text, decoded verbatim.
    Plain,
    /// Markdown, treated as plain text.
    Markdown,
    /// PDF, handled by the heuristic byte scanner.
    Pdf,
    /// Modern Word document (Office Open XML).
    Docx,
    /// Legacy binary Word document; never parsed, only reported.
    LegacyDoc,
}

impl FileKind {
    /// Detect kind from a filename extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Some(Self::Plain),
            "md" | "markdown" => Some(Self::Markdown),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::LegacyDoc),
            _ => None,
        }
    }

    /// Detect kind from a declared MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/plain" => Some(Self::Plain),
            "text/markdown" => Some(Self::Markdown),
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "application/msword" => Some(Self::LegacyDoc),
            _ => None,
        }
    }

    /// Detect kind from file magic bytes.
    ///
    /// Useful when the filename is untrustworthy. A ZIP signature is taken
    /// to mean DOCX since that is the only container format handled here.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PDF files start with "%PDF"
        if bytes.starts_with(b"%PDF") {
            return Some(Self::Pdf);
        }

        // DOCX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Docx);
        }

        // Legacy .doc is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::LegacyDoc);
        }

        None
    }

    /// Classify an upload from its filename and optional MIME type.
    ///
    /// Extension wins over MIME; anything unrecognized defaults to plain
    /// text so the upload always decodes to something readable.
    pub fn classify(filename: &str, mime: Option<&str>) -> Self {
        filename
            .rsplit('.')
            .next()
            .filter(|ext| ext.len() < filename.len())
            .and_then(Self::from_extension)
            .or_else(|| mime.and_then(Self::from_mime))
            .unwrap_or(Self::Plain)
    }

    /// Short lowercase label for reports and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Markdown => "markdown",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::LegacyDoc => "doc",
        }
    }
}
