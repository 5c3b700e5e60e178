//! Word tokenization for paced playback.
//!
//! Collapses all line breaks and whitespace runs so that a text of any
//! origin (typed, pasted, or recovered from a binary document) becomes a
//! flat sequence of display-ready words.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to flatten line-break sequences into a single space.
static LINE_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]+").unwrap());

/// Split a text into non-empty words.
///
/// Line-break runs become spaces, whitespace runs become separators, and
/// empty tokens are dropped. Input is NFC-normalized first so combining
/// marks decoded from document bytes render consistently.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text.nfc().collect();
    let flattened = LINE_BREAK_REGEX.replace_all(&normalized, " ");

    flattened
        .split_whitespace()
        .map(|word| word.to_string())
        .collect()
}

/// An ordered, zero-indexed sequence of words for one reading session.
///
/// Invariant: no element is empty or contains internal whitespace. Every
/// constructor enforces this, so a sequence is safe to index and display
/// without re-checking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordSequence {
    words: Vec<String>,
}

impl WordSequence {
    /// Tokenize a text into a word sequence.
    pub fn from_text(text: &str) -> Self {
        Self {
            words: tokenize(text),
        }
    }

    /// Build a sequence from caller-provided tokens.
    ///
    /// Each entry is re-tokenized, so entries containing whitespace split
    /// into several words and empty entries disappear.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .flat_map(|entry| tokenize(entry.as_ref()))
            .collect();
        Self { words }
    }

    /// Number of words in the sequence.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the sequence holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The word at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// All words, in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Up to `count` consecutive words starting at `start`, joined with
    /// single spaces. Clamped at the end of the sequence; out-of-range
    /// starts yield an empty string.
    pub fn window(&self, start: usize, count: usize) -> String {
        let end = start.saturating_add(count).min(self.words.len());
        if start >= end {
            return String::new();
        }
        self.words[start..end].join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t  ").is_empty());
    }

    #[test]
    fn test_tokenize_collapses_breaks_and_runs() {
        assert_eq!(tokenize("a\n\nb   c"), vec!["a", "b", "c"]);
        assert_eq!(tokenize("one\r\ntwo\rthree"), vec!["one", "two", "three"]);
        assert_eq!(tokenize("  leading and trailing  "), vec!["leading", "and", "trailing"]);
    }

    #[test]
    fn test_tokenize_no_empty_or_spaced_tokens() {
        let words = tokenize("mixed\twhitespace \u{a0} everywhere\n");
        assert!(!words.is_empty());
        for word in &words {
            assert!(!word.is_empty());
            assert!(!word.chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn test_tokenize_idempotent_over_rejoin() {
        let text = "The quick\nbrown  fox,\r\njumps!";
        let once = tokenize(text);
        let again = tokenize(&once.join(" "));
        assert_eq!(once, again);
    }

    #[test]
    fn test_tokenize_normalizes_to_nfc() {
        // "e" + combining acute composes to a single scalar
        let words = tokenize("cafe\u{301}");
        assert_eq!(words, vec!["caf\u{e9}"]);
    }

    #[test]
    fn test_from_words_enforces_invariant() {
        let sequence = WordSequence::from_words(["two words", "", "  ", "one"]);
        assert_eq!(sequence.words(), ["two", "words", "one"]);
    }

    #[test]
    fn test_window_clamps() {
        let sequence = WordSequence::from_text("a b c d");
        assert_eq!(sequence.window(0, 2), "a b");
        assert_eq!(sequence.window(2, 10), "c d");
        assert_eq!(sequence.window(3, 1), "d");
        assert_eq!(sequence.window(4, 1), "");
        assert_eq!(sequence.window(0, 0), "");
    }

    #[test]
    fn test_len_and_get() {
        let sequence = WordSequence::from_text("alpha beta");
        assert_eq!(sequence.len(), 2);
        assert!(!sequence.is_empty());
        assert_eq!(sequence.get(1), Some("beta"));
        assert_eq!(sequence.get(2), None);
        assert!(WordSequence::from_text("").is_empty());
    }
}
