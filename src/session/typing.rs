use std::collections::HashSet;

use crate::engine::letters;
use crate::engine::wpm::TypingSnapshot;
use crate::session::input::CharStatus;

/// Character-match state for one pass over an exercise's text.
pub struct TypingState {
    pub target: Vec<char>,
    pub input: Vec<CharStatus>,
    pub cursor: usize,
    pub typo_flags: HashSet<usize>,
}

impl TypingState {
    /// The target is compared without vowel points and with the Windows
    /// geresh, the same way typed characters are normalized.
    pub fn new(text: &str) -> Self {
        Self {
            target: letters::normalize_text(text).chars().collect(),
            input: Vec::new(),
            cursor: 0,
            typo_flags: HashSet::new(),
        }
    }

    pub fn from_lines(lines: &[String]) -> Self {
        Self::new(&lines.join("\n"))
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.target.len()
    }

    pub fn correct_count(&self) -> usize {
        self.input
            .iter()
            .filter(|s| matches!(s, CharStatus::Correct))
            .count()
    }

    pub fn typo_count(&self) -> usize {
        self.typo_flags.len()
    }

    /// Share of positions typed right the first time. A typo stays counted
    /// after it is corrected.
    pub fn accuracy(&self) -> f64 {
        if self.cursor == 0 {
            return 100.0;
        }
        let typos_before_cursor = self
            .typo_flags
            .iter()
            .filter(|&&pos| pos < self.cursor)
            .count();
        ((self.cursor - typos_before_cursor) as f64 / self.cursor as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn progress(&self) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        self.cursor as f64 / self.target.len() as f64
    }

    /// The next expected character, if any.
    pub fn expected(&self) -> Option<char> {
        self.target.get(self.cursor).copied()
    }

    /// The target line the cursor is on, for reading aloud.
    pub fn current_line(&self) -> String {
        let cursor = self.cursor.min(self.target.len());
        let start = self.target[..cursor]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |p| p + 1);
        let end = self.target[cursor..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.target.len(), |p| cursor + p);
        self.target[start..end].iter().collect()
    }

    pub fn snapshot(&self) -> TypingSnapshot {
        TypingSnapshot {
            typed_len: self.cursor,
            target_len: self.target.len(),
            correct_count: self.correct_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::input;

    #[test]
    fn new_state() {
        let state = TypingState::new("שלום");
        assert_eq!(state.target.len(), 4);
        assert_eq!(state.cursor, 0);
        assert!(!state.is_complete());
        assert_eq!(state.progress(), 0.0);
        assert_eq!(state.accuracy(), 100.0);
    }

    #[test]
    fn empty_target_is_complete() {
        let state = TypingState::new("");
        assert!(state.is_complete());
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn target_is_normalized() {
        let state = TypingState::new("שָׁלוֹם ג׳");
        assert_eq!(state.target.iter().collect::<String>(), "שלום ג'");
    }

    #[test]
    fn corrected_typo_still_counts() {
        let mut state = TypingState::new("כח");
        input::process_char(&mut state, 'ל');
        input::process_backspace(&mut state);
        input::process_char(&mut state, 'כ');
        assert_eq!(state.typo_count(), 1);
        assert_eq!(state.correct_count(), 1);
        assert!(state.accuracy() < 100.0);
    }

    #[test]
    fn snapshot_tracks_cursor_and_correct() {
        let mut state = TypingState::new("כחכ");
        input::process_char(&mut state, 'כ');
        input::process_char(&mut state, 'ל');
        let snap = state.snapshot();
        assert_eq!(snap.typed_len, 2);
        assert_eq!(snap.target_len, 3);
        assert_eq!(snap.correct_count, 1);
        assert!(!snap.is_finished());
    }

    #[test]
    fn current_line_follows_cursor() {
        let mut state = TypingState::from_lines(&["כח".to_string(), "עי".to_string()]);
        assert_eq!(state.current_line(), "כח");
        for ch in "כח\n".chars() {
            input::process_char(&mut state, ch);
        }
        assert_eq!(state.current_line(), "עי");
    }
}
