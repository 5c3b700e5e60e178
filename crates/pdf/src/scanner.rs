//! Heuristic text recovery from raw PDF bytes.
//!
//! PDF content streams draw text through show-text operators whose string
//! operands use the `(...)` literal syntax. The scanner collects those
//! literals straight from the byte buffer, keeps the ones that look like
//! prose, and cleans the result up. This is inherently lossy: it cannot
//! tell body text from parenthesised metadata, it drops prose that happens
//! to resemble an operator token, and it sees nothing of encrypted or
//! compressed streams. Accepting that, it never fails: the result is the
//! recovered text, a raw decode of the whole buffer, or a fixed
//! instructional placeholder.

use regex::Regex;
use rsvp_core::ProgressSink;
use std::sync::LazyLock;

/// Minimum cleaned-up length for a result to count as usable text.
pub const DEFAULT_MIN_TEXT_LEN: usize = 100;

/// Fixed message returned when no strategy recovers usable text.
pub const PDF_PLACEHOLDER: &str = "No text could be extracted automatically from this PDF. \
     Please copy and paste the content manually. You can open the PDF in your preferred \
     viewer, select all (Ctrl+A), copy (Ctrl+C) and paste it here (Ctrl+V).";

/// Runs containing at least two consecutive letters look like words.
static LETTER_PAIR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]{2,}").unwrap());

/// Runs that are purely numeric or decimal (coordinates, widths).
static NUMERIC_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d.]+$").unwrap());

/// Known operator and metadata tokens that show up inside literals.
static OPERATOR_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Tj|TJ|Helvetica|Arial|Font|Page|http)").unwrap());

/// Backslash followed by three octal digits encodes a single character.
static OCTAL_ESCAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\([0-7]{3})").unwrap());

/// Anything outside printable ASCII (newlines excepted).
static NON_PRINTABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x20-\x7E\n]").unwrap());

/// Whitespace runs of any kind.
static WHITESPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Heuristic scanner for PDF byte buffers.
#[derive(Debug, Clone)]
pub struct PdfScanner {
    /// Results at or below this length are treated as failed extraction.
    min_text_len: usize,
}

impl Default for PdfScanner {
    fn default() -> Self {
        Self {
            min_text_len: DEFAULT_MIN_TEXT_LEN,
        }
    }
}

impl PdfScanner {
    /// Create a scanner with the default acceptance threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the acceptance threshold.
    ///
    /// The default of 100 characters is inherited from earlier versions of
    /// this heuristic; there is no deeper rationale behind the number.
    pub fn with_min_text_len(mut self, len: usize) -> Self {
        self.min_text_len = len;
        self
    }

    /// Recover text from a PDF buffer.
    ///
    /// Tries the literal-run scan first, then a raw UTF-8 decode of the
    /// whole buffer, and finally resolves to [`PDF_PLACEHOLDER`]. Never
    /// fails.
    pub fn extract(&self, data: &[u8], progress: &mut dyn ProgressSink) -> String {
        progress.update("Analyzing PDF content...");
        let runs = collect_literal_runs(data);
        let kept: Vec<&str> = runs
            .iter()
            .map(String::as_str)
            .filter(|run| is_content_run(run))
            .collect();

        progress.update("Processing extracted text...");
        let assembled = clean_up(&unescape_octal(&kept.join(" ")));
        log::debug!(
            "pdf scan: {} literal runs, {} kept, {} chars assembled",
            runs.len(),
            kept.len(),
            assembled.len()
        );
        if assembled.len() > self.min_text_len {
            progress.update("Text extracted successfully.");
            return assembled;
        }

        // The buffer may simply be text with a misleading kind.
        let raw = clean_up(&String::from_utf8_lossy(data));
        if raw.len() > self.min_text_len {
            progress.update("Text extracted using fallback method.");
            return raw;
        }

        progress.update("Could not extract text automatically.");
        log::warn!(
            "pdf scan recovered no usable text ({} bytes in, {} chars out)",
            data.len(),
            assembled.len().max(raw.len())
        );
        PDF_PLACEHOLDER.to_string()
    }
}

/// Collect the printable content of every `(...)` run longer than one
/// character. An unterminated run swallows the rest of the buffer.
fn collect_literal_runs(data: &[u8]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut i = 0;

    while i < data.len() {
        if data[i] != b'(' {
            i += 1;
            continue;
        }

        let mut run = String::new();
        let mut j = i + 1;
        while j < data.len() && data[j] != b')' {
            if (0x20..=0x7E).contains(&data[j]) {
                run.push(data[j] as char);
            }
            j += 1;
        }

        if run.len() > 1 {
            runs.push(run);
        }
        i = j.saturating_add(1);
    }

    runs
}

/// Whether a literal run looks like prose rather than operators,
/// coordinates, or font metadata.
fn is_content_run(run: &str) -> bool {
    LETTER_PAIR_REGEX.is_match(run)
        && !NUMERIC_RUN_REGEX.is_match(run)
        && !OPERATOR_PREFIX_REGEX.is_match(run)
}

/// Decode `\nnn` octal escapes into their characters.
fn unescape_octal(text: &str) -> String {
    OCTAL_ESCAPE_REGEX
        .replace_all(text, |caps: &regex::Captures<'_>| {
            u32::from_str_radix(&caps[1], 8)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned()
}

/// Replace non-printable characters with spaces, collapse whitespace runs,
/// and trim.
fn clean_up(text: &str) -> String {
    let printable = NON_PRINTABLE_REGEX.replace_all(text, " ");
    WHITESPACE_RUN_REGEX
        .replace_all(&printable, " ")
        .trim()
        .to_string()
}
