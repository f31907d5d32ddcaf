use crate::engine::curriculum::Curriculum;

/// Characters a drill line may contain: the learner's known letters plus
/// whitespace and punctuation.
pub struct LetterFilter {
    pub allowed: Vec<char>,
}

impl LetterFilter {
    pub fn new(allowed: Vec<char>) -> Self {
        Self { allowed }
    }

    pub fn known_at(curriculum: &Curriculum, index: usize) -> Self {
        Self::new(curriculum.distinct_letters_up_to(index))
    }

    pub fn is_allowed(&self, ch: char) -> bool {
        self.allowed.contains(&ch) || ch.is_whitespace() || is_punctuation(ch)
    }

    pub fn allows_word(&self, word: &str) -> bool {
        !word.is_empty() && word.chars().all(|ch| self.allowed.contains(&ch))
    }

    pub fn allows_line(&self, line: &str) -> bool {
        line.chars().all(|ch| self.is_allowed(ch))
    }
}

/// ASCII punctuation, Hebrew maqaf/geresh/gershayim.
pub fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation()
        || matches!(ch, '\u{05BE}' | '\u{05F3}' | '\u{05F4}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_known_letters_and_separators() {
        let filter = LetterFilter::new(vec!['כ', 'ח']);
        assert!(filter.allows_line("כח חכ, ככח."));
        assert!(!filter.allows_line("כח ע"));
        assert!(filter.is_allowed(' '));
        assert!(filter.is_allowed('\u{05BE}'));
    }

    #[test]
    fn words_must_be_letters_only() {
        let filter = LetterFilter::new(vec!['כ', 'ל', 'ב']);
        assert!(filter.allows_word("כלב"));
        assert!(!filter.allows_word("כלב."));
        assert!(!filter.allows_word(""));
        assert!(!filter.allows_word("כלבה"));
    }
}
