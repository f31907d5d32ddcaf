use std::time::{Duration, Instant};

use tracing::debug;

use crate::engine::ticker::PollTicker;

pub const WPM_REFRESH: Duration = Duration::from_millis(800);
/// Standard convention: five characters make a word.
pub const WORD_LENGTH: f64 = 5.0;
const SECONDS_IN_MINUTE: f64 = 60.0;

/// Externally owned typing state, read on every observation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypingSnapshot {
    pub typed_len: usize,
    pub target_len: usize,
    pub correct_count: usize,
}

impl TypingSnapshot {
    pub fn is_finished(&self) -> bool {
        self.typed_len >= self.target_len
    }
}

/// Live words-per-minute reading for one typing session.
///
/// The session opens on the first non-empty observation and is never
/// restarted by later keystrokes until [`reset`](WpmEstimator::reset). The
/// estimator knows nothing about which exercise is active; the owner must
/// reset it whenever the exercise changes.
#[derive(Clone, Debug)]
pub struct WpmEstimator {
    started_at: Option<Instant>,
    elapsed_secs: f64,
    wpm: u32,
    closed: bool,
    ticker: PollTicker,
}

impl WpmEstimator {
    pub fn new(refresh: Duration) -> Self {
        Self {
            started_at: None,
            elapsed_secs: 0.0,
            wpm: 0,
            closed: false,
            ticker: PollTicker::new(refresh),
        }
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn has_session(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_polling(&self) -> bool {
        self.ticker.is_armed()
    }

    pub fn is_finished(&self, snapshot: &TypingSnapshot) -> bool {
        snapshot.is_finished()
    }

    /// Feed a change of the typed text. Opens the session on the first
    /// keystroke without computing anything on that same observation, and
    /// takes the closing reading once the typed length reaches the target.
    /// Dropping back below the target resumes polling on the same clock.
    pub fn observe(&mut self, snapshot: &TypingSnapshot, now: Instant) {
        if self.started_at.is_none() {
            if snapshot.typed_len > 0 {
                self.open(now);
            }
            return;
        }
        if snapshot.is_finished() {
            if !self.closed {
                self.close(snapshot, now);
            }
        } else if self.closed {
            self.resume(now);
        }
    }

    /// Scheduler entry point, called on every event-loop tick. Returns true
    /// when a new reading was taken.
    pub fn poll(&mut self, snapshot: &TypingSnapshot, now: Instant) -> bool {
        if snapshot.is_finished() {
            if self.started_at.is_some() && !self.closed {
                self.close(snapshot, now);
            }
            self.ticker.due(now, false);
            return false;
        }
        if self.started_at.is_none() {
            if snapshot.typed_len > 0 {
                self.open(now);
            }
            return false;
        }
        if self.closed {
            self.resume(now);
        }
        if !self.ticker.due(now, true) {
            return false;
        }
        self.compute(snapshot, now)
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.elapsed_secs = 0.0;
        self.wpm = 0;
        self.closed = false;
        self.ticker.disarm();
    }

    fn open(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.closed = false;
        self.ticker.arm(now);
        debug!("typing session opened");
    }

    fn resume(&mut self, now: Instant) {
        self.closed = false;
        self.ticker.arm(now);
        debug!("typing session resumed");
    }

    fn close(&mut self, snapshot: &TypingSnapshot, now: Instant) {
        self.compute(snapshot, now);
        self.closed = true;
        self.ticker.disarm();
        debug!(wpm = self.wpm, elapsed_secs = self.elapsed_secs, "typing session finished");
    }

    fn compute(&mut self, snapshot: &TypingSnapshot, now: Instant) -> bool {
        let Some(start) = self.started_at else {
            return false;
        };
        // A clock that went backwards yields None; skip the reading.
        let Some(elapsed) = now.checked_duration_since(start) else {
            return false;
        };
        let elapsed = elapsed.as_secs_f64();
        if elapsed <= 0.0 {
            return false;
        }
        let words = snapshot.correct_count as f64 / WORD_LENGTH;
        let minutes = elapsed / SECONDS_IN_MINUTE;
        self.elapsed_secs = elapsed;
        self.wpm = (words / minutes).round() as u32;
        true
    }
}

impl Default for WpmEstimator {
    fn default() -> Self {
        Self::new(WPM_REFRESH)
    }
}
