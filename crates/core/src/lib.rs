//! Core domain types, word tokenization, and the pacing scheduler
//! for rapid serial presentation of text.

pub mod document;
pub mod error;
pub mod progress;
pub mod scheduler;
pub mod words;

pub use document::{FileKind, RawDocument};
pub use error::{Error, Result};
pub use progress::{NullProgress, ProgressSink};
pub use scheduler::{PacingScheduler, Phase, PlaybackEvent};
pub use words::{tokenize, WordSequence};
