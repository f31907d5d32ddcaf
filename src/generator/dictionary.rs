use tracing::warn;

use crate::data;
use crate::engine::filter::LetterFilter;
use crate::engine::letters;

const MIN_WORD_LEN: usize = 2;

pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    pub fn load() -> Self {
        let words = data::drill_words().unwrap_or_else(|err| {
            warn!(error = %err, "drill word list unavailable, real-word drills disabled");
            Vec::new()
        });
        Self::from_words(words)
    }

    /// Keeps words of at least two letters made only of Hebrew letters.
    pub fn from_words(words: Vec<String>) -> Self {
        let words = words
            .into_iter()
            .filter(|w| {
                w.chars().count() >= MIN_WORD_LEN && w.chars().all(letters::is_hebrew_letter)
            })
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words spelled entirely with allowed letters. Words containing any of
    /// the focus letters sort first; membership does not depend on `focus`.
    pub fn find_matching(&self, filter: &LetterFilter, focus: &[char]) -> Vec<&str> {
        let mut matching: Vec<&str> = self
            .words
            .iter()
            .filter(|w| filter.allows_word(w))
            .map(|s| s.as_str())
            .collect();

        if !focus.is_empty() {
            matching.sort_by_key(|w| if w.chars().any(|c| focus.contains(&c)) { 0 } else { 1 });
        }

        matching
    }
}
