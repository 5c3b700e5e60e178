//! Paced playback over a word sequence.
//!
//! The scheduler advances a cursor through a [`WordSequence`] at a cadence
//! derived from a words-per-minute rate. It is poll-driven: callers supply
//! a monotonic timestamp in milliseconds to every cadence-affecting
//! operation and to [`PacingScheduler::poll`], which fires all ticks that
//! have come due. The pending deadline advances by exactly one interval per
//! fired tick, so late polls catch up without accumulating drift.
//!
//! There is at most one pending deadline per scheduler at any moment: the
//! cadence is a single `Option` field, armed in exactly one place
//! (`reschedule_cadence`) by every transition that changes rate, group
//! size, or running state.

use crate::words::WordSequence;
use serde::Serialize;

/// Default playback rate in words per minute.
pub const DEFAULT_RATE_PER_MINUTE: u32 = 300;

/// Lowest accepted playback rate.
pub const MIN_RATE_PER_MINUTE: u32 = 100;

/// Highest accepted playback rate.
pub const MAX_RATE_PER_MINUTE: u32 = 1000;

/// Playback phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No playback started since the last load or reset.
    Idle,
    /// Ticks are firing.
    Running,
    /// Stopped mid-sequence; position retained.
    Paused,
    /// The cursor reached the last word while running.
    Finished,
}

impl Phase {
    /// Lowercase label for reports and bindings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }
}

/// Notification produced by [`PacingScheduler::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum PlaybackEvent {
    /// The cursor advanced to a new word.
    Tick {
        /// New cursor position.
        index: usize,
    },
    /// Playback reached the last word and the cadence stopped.
    Finished,
}

/// The single pending timer driving ticks.
#[derive(Debug, Clone, Copy)]
struct Cadence {
    next_due_ms: u64,
    interval_ms: u64,
}

/// Drives a cursor through a word sequence at a fixed word rate.
#[derive(Debug, Clone)]
pub struct PacingScheduler {
    words: WordSequence,
    index: usize,
    phase: Phase,
    rate_per_minute: u32,
    group_size: usize,
    cadence: Option<Cadence>,
}

impl Default for PacingScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PacingScheduler {
    /// Create a scheduler with no words loaded.
    pub fn new() -> Self {
        Self {
            words: WordSequence::default(),
            index: 0,
            phase: Phase::Idle,
            rate_per_minute: DEFAULT_RATE_PER_MINUTE,
            group_size: 1,
            cadence: None,
        }
    }

    /// Load a new word sequence, resetting position and stopping playback.
    ///
    /// Rate and group size survive a load; they belong to the reader, not
    /// the text.
    pub fn load(&mut self, words: WordSequence) {
        self.words = words;
        self.index = 0;
        self.phase = Phase::Idle;
        self.cadence = None;
    }

    /// Start or resume playback.
    ///
    /// No-op when already running, finished, or when the sequence is empty.
    pub fn play(&mut self, now_ms: u64) {
        match self.phase {
            Phase::Idle | Phase::Paused if !self.words.is_empty() => {
                self.phase = Phase::Running;
                self.reschedule_cadence(now_ms);
            }
            _ => {}
        }
    }

    /// Pause playback, keeping the current position. No-op unless running.
    pub fn pause(&mut self, now_ms: u64) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            self.reschedule_cadence(now_ms);
        }
    }

    /// Stop playback and move the cursor back to the first word.
    pub fn reset(&mut self, now_ms: u64) {
        self.index = 0;
        self.phase = Phase::Idle;
        self.reschedule_cadence(now_ms);
    }

    /// Move the cursor by `delta` words, clamped to the sequence bounds.
    ///
    /// Running or paused playback stays as it is. Seeking out of a finished
    /// sequence leaves it paused so playback can resume.
    pub fn seek(&mut self, delta: i64) {
        if self.words.is_empty() {
            return;
        }

        let last = (self.words.len() - 1) as i64;
        let target = (self.index as i64).saturating_add(delta).clamp(0, last);
        self.index = target as usize;

        if self.phase == Phase::Finished {
            self.phase = Phase::Paused;
        }
    }

    /// Change the playback rate, clamped to
    /// [`MIN_RATE_PER_MINUTE`]..=[`MAX_RATE_PER_MINUTE`].
    ///
    /// Takes effect on the next tick; the current position is untouched.
    pub fn set_rate(&mut self, rate_per_minute: u32, now_ms: u64) {
        self.rate_per_minute = rate_per_minute.clamp(MIN_RATE_PER_MINUTE, MAX_RATE_PER_MINUTE);
        self.reschedule_cadence(now_ms);
    }

    /// Change how many consecutive words each tick displays (minimum 1).
    pub fn set_group_size(&mut self, group_size: usize, now_ms: u64) {
        self.group_size = group_size.max(1);
        self.reschedule_cadence(now_ms);
    }

    /// Fire every tick due at or before `now_ms` and return the events.
    ///
    /// Returns an empty vector unless the scheduler is running with a
    /// pending deadline.
    pub fn poll(&mut self, now_ms: u64) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();

        loop {
            let cadence = match self.cadence {
                Some(cadence) if self.phase == Phase::Running && cadence.next_due_ms <= now_ms => {
                    cadence
                }
                _ => break,
            };

            if self.index + 1 >= self.words.len() {
                self.phase = Phase::Finished;
                self.cadence = None;
                events.push(PlaybackEvent::Finished);
                log::debug!("playback finished at word {}", self.index);
                break;
            }

            self.index += 1;
            self.cadence = Some(Cadence {
                next_due_ms: cadence.next_due_ms + cadence.interval_ms,
                interval_ms: cadence.interval_ms,
            });
            events.push(PlaybackEvent::Tick { index: self.index });
        }

        events
    }

    /// Milliseconds between ticks at the current rate.
    pub fn tick_interval_ms(&self) -> u64 {
        60_000 / u64::from(self.rate_per_minute)
    }

    /// Milliseconds until the pending deadline, if the cadence is armed.
    ///
    /// Returns `Some(0)` when a tick is overdue. Drivers use this to size
    /// their sleep or timeout before the next [`poll`](Self::poll).
    pub fn next_tick_in_ms(&self, now_ms: u64) -> Option<u64> {
        self.cadence
            .map(|cadence| cadence.next_due_ms.saturating_sub(now_ms))
    }

    /// Current cursor position.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Current playback phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current rate in words per minute.
    pub fn rate_per_minute(&self) -> u32 {
        self.rate_per_minute
    }

    /// Words displayed per tick.
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Number of words loaded.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether no words are loaded.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The loaded word sequence.
    pub fn words(&self) -> &WordSequence {
        &self.words
    }

    /// The currently visible unit: `group_size` words starting at the
    /// cursor, joined with single spaces and clamped to the sequence end.
    pub fn visible_words(&self) -> String {
        self.words.window(self.index, self.group_size)
    }

    /// Fraction of the sequence read so far, in `0.0..1.0`.
    ///
    /// `0.0` for an empty sequence.
    pub fn progress_fraction(&self) -> f64 {
        if self.words.is_empty() {
            0.0
        } else {
            self.index as f64 / self.words.len() as f64
        }
    }

    /// Arm or clear the single pending deadline according to phase.
    ///
    /// Every transition that changes rate, group size, or running state
    /// funnels through here, which is what keeps the one-timer invariant.
    fn reschedule_cadence(&mut self, now_ms: u64) {
        self.cadence = if self.phase == Phase::Running && !self.words.is_empty() {
            let interval_ms = self.tick_interval_ms();
            Some(Cadence {
                next_due_ms: now_ms + interval_ms,
                interval_ms,
            })
        } else {
            None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(text: &str) -> PacingScheduler {
        let mut scheduler = PacingScheduler::new();
        scheduler.load(WordSequence::from_text(text));
        scheduler
    }

    #[test]
    fn test_play_on_empty_sequence_is_noop() {
        let mut scheduler = PacingScheduler::new();
        scheduler.play(0);
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert!(scheduler.poll(10_000).is_empty());
    }

    #[test]
    fn test_ticks_advance_at_interval() {
        let mut scheduler = loaded("a b c d");
        scheduler.play(0);
        // 300 wpm -> 200 ms per tick
        assert!(scheduler.poll(199).is_empty());
        assert_eq!(scheduler.poll(200), vec![PlaybackEvent::Tick { index: 1 }]);
        assert_eq!(scheduler.poll(399), vec![]);
        assert_eq!(scheduler.poll(400), vec![PlaybackEvent::Tick { index: 2 }]);
        assert_eq!(scheduler.phase(), Phase::Running);
    }

    #[test]
    fn test_late_poll_catches_up_without_drift() {
        let mut scheduler = loaded("a b c d e f");
        scheduler.play(0);
        let events = scheduler.poll(610);
        assert_eq!(
            events,
            vec![
                PlaybackEvent::Tick { index: 1 },
                PlaybackEvent::Tick { index: 2 },
                PlaybackEvent::Tick { index: 3 },
            ]
        );
        // Deadlines stay anchored to the original schedule, not the poll time.
        assert_eq!(scheduler.next_tick_in_ms(610), Some(190));
    }

    #[test]
    fn test_completion_stops_at_last_word() {
        let mut scheduler = loaded("a b c");
        scheduler.play(0);
        assert_eq!(scheduler.poll(200), vec![PlaybackEvent::Tick { index: 1 }]);
        assert_eq!(scheduler.poll(400), vec![PlaybackEvent::Tick { index: 2 }]);
        assert_eq!(scheduler.poll(600), vec![PlaybackEvent::Finished]);
        assert_eq!(scheduler.phase(), Phase::Finished);
        assert_eq!(scheduler.current_index(), 2);
        // No cadence remains armed afterwards.
        assert_eq!(scheduler.next_tick_in_ms(600), None);
        assert!(scheduler.poll(100_000).is_empty());
        assert_eq!(scheduler.current_index(), 2);
    }

    #[test]
    fn test_single_word_finishes_on_first_tick() {
        let mut scheduler = loaded("only");
        scheduler.play(0);
        assert_eq!(scheduler.poll(200), vec![PlaybackEvent::Finished]);
        assert_eq!(scheduler.current_index(), 0);
    }

    #[test]
    fn test_pause_keeps_position_and_stops_ticks() {
        let mut scheduler = loaded("a b c d");
        scheduler.play(0);
        scheduler.poll(200);
        scheduler.pause(250);
        assert_eq!(scheduler.phase(), Phase::Paused);
        assert_eq!(scheduler.current_index(), 1);
        assert!(scheduler.poll(10_000).is_empty());

        scheduler.play(1_000);
        assert_eq!(scheduler.phase(), Phase::Running);
        assert_eq!(scheduler.poll(1_200), vec![PlaybackEvent::Tick { index: 2 }]);
    }

    #[test]
    fn test_play_while_running_does_not_rearm_cadence() {
        let mut scheduler = loaded("a b c");
        scheduler.play(0);
        scheduler.play(150);
        // Were the cadence re-armed at 150, the first tick would move to 350.
        assert_eq!(scheduler.poll(200), vec![PlaybackEvent::Tick { index: 1 }]);
    }

    #[test]
    fn test_reset_from_any_phase() {
        let mut scheduler = loaded("a b c");
        scheduler.play(0);
        scheduler.poll(200);
        scheduler.reset(300);
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert_eq!(scheduler.current_index(), 0);
        assert!(scheduler.poll(10_000).is_empty());
    }

    #[test]
    fn test_seek_clamps_to_bounds() {
        let mut scheduler = loaded("a b c d e");
        scheduler.seek(1_000);
        assert_eq!(scheduler.current_index(), 4);
        scheduler.seek(-1_000);
        assert_eq!(scheduler.current_index(), 0);
        scheduler.seek(3);
        assert_eq!(scheduler.current_index(), 3);
        scheduler.seek(-1);
        assert_eq!(scheduler.current_index(), 2);
    }

    #[test]
    fn test_seek_preserves_running_state() {
        let mut scheduler = loaded("a b c d e");
        scheduler.play(0);
        scheduler.seek(2);
        assert_eq!(scheduler.phase(), Phase::Running);
        assert_eq!(scheduler.poll(200), vec![PlaybackEvent::Tick { index: 3 }]);
    }

    #[test]
    fn test_seek_on_empty_is_noop() {
        let mut scheduler = PacingScheduler::new();
        scheduler.seek(5);
        assert_eq!(scheduler.current_index(), 0);
        assert_eq!(scheduler.phase(), Phase::Idle);
    }

    #[test]
    fn test_seek_out_of_finished_allows_resume() {
        let mut scheduler = loaded("a b");
        scheduler.play(0);
        scheduler.poll(200);
        scheduler.poll(400);
        assert_eq!(scheduler.phase(), Phase::Finished);

        // play() straight from Finished stays a no-op
        scheduler.play(500);
        assert_eq!(scheduler.phase(), Phase::Finished);

        scheduler.seek(-1);
        assert_eq!(scheduler.phase(), Phase::Paused);
        scheduler.play(600);
        assert_eq!(scheduler.phase(), Phase::Running);
        assert_eq!(scheduler.poll(800), vec![PlaybackEvent::Tick { index: 1 }]);
        assert_eq!(scheduler.poll(1_000), vec![PlaybackEvent::Finished]);
    }

    #[test]
    fn test_rate_change_mid_run_preserves_position() {
        let mut scheduler = loaded("a b c d e f");
        scheduler.play(0);
        scheduler.poll(200);
        assert_eq!(scheduler.current_index(), 1);

        scheduler.set_rate(600, 250);
        assert_eq!(scheduler.phase(), Phase::Running);
        assert_eq!(scheduler.current_index(), 1);
        // 600 wpm -> 100 ms; next tick due at 350
        assert!(scheduler.poll(349).is_empty());
        assert_eq!(scheduler.poll(350), vec![PlaybackEvent::Tick { index: 2 }]);
    }

    #[test]
    fn test_rate_clamped_to_supported_range() {
        let mut scheduler = loaded("a b");
        scheduler.set_rate(5, 0);
        assert_eq!(scheduler.rate_per_minute(), MIN_RATE_PER_MINUTE);
        scheduler.set_rate(9_999, 0);
        assert_eq!(scheduler.rate_per_minute(), MAX_RATE_PER_MINUTE);
        assert_eq!(scheduler.tick_interval_ms(), 60);
    }

    #[test]
    fn test_group_size_change_keeps_position_and_cadence_interval() {
        let mut scheduler = loaded("a b c d e");
        scheduler.play(0);
        scheduler.poll(200);
        scheduler.set_group_size(3, 250);
        assert_eq!(scheduler.group_size(), 3);
        assert_eq!(scheduler.current_index(), 1);
        assert_eq!(scheduler.visible_words(), "b c d");
        // Cadence re-armed from 250 at the unchanged 200 ms interval.
        assert_eq!(scheduler.poll(450), vec![PlaybackEvent::Tick { index: 2 }]);

        scheduler.set_group_size(0, 500);
        assert_eq!(scheduler.group_size(), 1);
    }

    #[test]
    fn test_visible_words_clamps_at_end() {
        let mut scheduler = loaded("a b c");
        scheduler.set_group_size(2, 0);
        scheduler.seek(1_000);
        assert_eq!(scheduler.visible_words(), "c");
    }

    #[test]
    fn test_progress_fraction() {
        let mut scheduler = loaded("a b c d");
        assert_eq!(scheduler.progress_fraction(), 0.0);
        scheduler.seek(2);
        assert_eq!(scheduler.progress_fraction(), 0.5);

        let empty = PacingScheduler::new();
        assert_eq!(empty.progress_fraction(), 0.0);
    }

    #[test]
    fn test_load_resets_position_but_keeps_settings() {
        let mut scheduler = loaded("a b c d");
        scheduler.set_rate(600, 0);
        scheduler.set_group_size(2, 0);
        scheduler.play(0);
        scheduler.poll(100);

        scheduler.load(WordSequence::from_text("x y"));
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert_eq!(scheduler.current_index(), 0);
        assert_eq!(scheduler.rate_per_minute(), 600);
        assert_eq!(scheduler.group_size(), 2);
        assert!(scheduler.poll(10_000).is_empty());
    }

    #[test]
    fn test_index_stays_in_bounds_under_mixed_operations() {
        let mut scheduler = loaded("a b c d e");
        let len = scheduler.len();
        scheduler.play(0);
        let mut now = 0;
        for step in 0..50 {
            now += 137;
            match step % 5 {
                0 => scheduler.seek(7),
                1 => scheduler.seek(-13),
                2 => scheduler.set_rate(100 + step * 37, now),
                3 => scheduler.pause(now),
                _ => scheduler.play(now),
            }
            scheduler.poll(now);
            assert!(scheduler.current_index() < len);
        }
    }
}
