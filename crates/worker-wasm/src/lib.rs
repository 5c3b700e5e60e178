//! WASM bindings for text extraction and paced playback.
//!
//! Exposes the extraction pipeline and the pacing scheduler to JavaScript.
//! The host page owns the actual timer: it feeds `performance.now()`
//! timestamps into [`Pacer::poll`] and renders the visible window after
//! each returned event.

use js_sys::Function;
use rsvp_core::{FileKind, PacingScheduler, RawDocument, WordSequence};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of extracting a document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Kind the upload was classified as.
    pub kind: String,
    /// Extracted text (possibly a fixed instructional message).
    pub text: String,
    /// Word count after tokenization.
    pub word_count: usize,
}

/// Extract readable text from an uploaded file.
///
/// # Arguments
/// * `data` - The raw bytes of the uploaded file
/// * `filename` - The original filename (used for kind classification)
/// * `mime` - The declared MIME type, if the browser provided one
/// * `progress` - Optional callback receiving human-readable progress messages
///
/// # Returns
/// A JavaScript object with the extraction result. Extraction itself never
/// fails; only serialization across the boundary can throw.
#[wasm_bindgen]
pub fn extract_document(
    data: &[u8],
    filename: &str,
    mime: Option<String>,
    progress: Option<Function>,
) -> Result<JsValue, JsValue> {
    let result = extract_document_impl(data, filename, mime.as_deref(), |message| {
        if let Some(callback) = &progress {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(message));
        }
    });

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn extract_document_impl(
    data: &[u8],
    filename: &str,
    mime: Option<&str>,
    mut progress: impl FnMut(&str),
) -> ExtractionResult {
    let kind = FileKind::classify(filename, mime);
    let document = RawDocument::new(data.to_vec(), kind);
    let text = rsvp_extract::extract(&document, &mut progress);
    let word_count = rsvp_core::tokenize(&text).len();

    ExtractionResult {
        kind: kind.as_str().to_string(),
        text,
        word_count,
    }
}

/// Tokenize a text into display-ready words.
#[wasm_bindgen]
pub fn tokenize_text(text: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&rsvp_core::tokenize(text))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Paced playback handle for the host page.
///
/// All time parameters are milliseconds as produced by `performance.now()`.
#[wasm_bindgen]
pub struct Pacer {
    inner: PacingScheduler,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Pacer {
    /// Create a pacer with no words loaded.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: PacingScheduler::new(),
        }
    }

    /// Tokenize `text` and load it, resetting position.
    pub fn load_text(&mut self, text: &str) {
        self.inner.load(WordSequence::from_text(text));
    }

    /// Start or resume playback. No-op on an empty sequence.
    pub fn play(&mut self, now_ms: f64) {
        self.inner.play(now_ms as u64);
    }

    /// Pause playback, keeping the current position.
    pub fn pause(&mut self, now_ms: f64) {
        self.inner.pause(now_ms as u64);
    }

    /// Stop playback and return to the first word.
    pub fn reset(&mut self, now_ms: f64) {
        self.inner.reset(now_ms as u64);
    }

    /// Move the cursor by `delta` words, clamped to the sequence bounds.
    pub fn seek(&mut self, delta: i32) {
        self.inner.seek(i64::from(delta));
    }

    /// Change the reading rate (words per minute, clamped to 100..=1000).
    pub fn set_rate(&mut self, rate_per_minute: u32, now_ms: f64) {
        self.inner.set_rate(rate_per_minute, now_ms as u64);
    }

    /// Change how many words each tick displays (minimum 1).
    pub fn set_group_size(&mut self, group_size: usize, now_ms: f64) {
        self.inner.set_group_size(group_size, now_ms as u64);
    }

    /// Fire all due ticks and return the resulting events as an array of
    /// `{ event: "tick", index }` / `{ event: "finished" }` objects.
    pub fn poll(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.poll(now_ms as u64))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Milliseconds until the next pending tick, or `undefined` when no
    /// cadence is armed. Use to size a `setTimeout` before the next poll.
    pub fn next_tick_in_ms(&self, now_ms: f64) -> Option<u32> {
        self.inner
            .next_tick_in_ms(now_ms as u64)
            .map(|ms| ms.min(u64::from(u32::MAX)) as u32)
    }

    /// Current playback phase: "idle", "running", "paused", or "finished".
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.phase().as_str().to_string()
    }

    /// The currently visible words, joined with single spaces.
    #[wasm_bindgen(getter)]
    pub fn visible_words(&self) -> String {
        self.inner.visible_words()
    }

    /// Current cursor position.
    #[wasm_bindgen(getter)]
    pub fn current_index(&self) -> usize {
        self.inner.current_index()
    }

    /// Number of words loaded.
    #[wasm_bindgen(getter)]
    pub fn word_count(&self) -> usize {
        self.inner.len()
    }

    /// Fraction of the sequence read so far, for progress bars.
    #[wasm_bindgen(getter)]
    pub fn progress_fraction(&self) -> f64 {
        self.inner.progress_fraction()
    }
}
