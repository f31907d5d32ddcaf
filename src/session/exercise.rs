use serde::{Deserialize, Serialize};

use crate::engine::curriculum::{LetterPair, StepKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Practice,
    Review,
    Text,
}

impl ExerciseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::Practice => "practice",
            ExerciseKind::Review => "review",
            ExerciseKind::Text => "text",
        }
    }

    pub fn is_letter(self) -> bool {
        !matches!(self, ExerciseKind::Text)
    }
}

impl From<StepKind> for ExerciseKind {
    fn from(kind: StepKind) -> Self {
        match kind {
            StepKind::Practice => ExerciseKind::Practice,
            StepKind::Review => ExerciseKind::Review,
        }
    }
}

/// Stable across runs, so stored references such as "resume exercise X"
/// stay valid between sessions.
pub fn exercise_id(index: usize, kind: ExerciseKind) -> String {
    format!("{}-{index}", kind.as_str())
}

/// Catalog metadata without the exercise text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub index: usize,
    pub kind: ExerciseKind,
    pub label: String,
    pub new_letters: Option<LetterPair>,
}

/// A selectable exercise. Letter exercises (`Practice`/`Review`) carry the
/// pair they introduce and generated text; text exercises carry fixed lines
/// and no letters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exercise {
    pub id: String,
    pub index: usize,
    pub kind: ExerciseKind,
    pub text: Vec<String>,
    pub label: String,
    pub new_letters: Option<LetterPair>,
}

impl Exercise {
    pub fn from_entry(entry: CatalogEntry, text: Vec<String>) -> Self {
        Self {
            id: entry.id,
            index: entry.index,
            kind: entry.kind,
            text,
            label: entry.label,
            new_letters: entry.new_letters,
        }
    }

    pub fn is_letter_exercise(&self) -> bool {
        self.kind.is_letter()
    }

    /// Lines joined the way they are typed: one newline between lines.
    pub fn typing_target(&self) -> String {
        self.text.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_combine_kind_and_index() {
        assert_eq!(exercise_id(3, ExerciseKind::Practice), "practice-3");
        assert_eq!(exercise_id(3, ExerciseKind::Review), "review-3");
        assert_eq!(exercise_id(25, ExerciseKind::Text), "text-25");
    }

    #[test]
    fn step_kind_converts() {
        assert_eq!(ExerciseKind::from(StepKind::Review), ExerciseKind::Review);
        assert!(ExerciseKind::Practice.is_letter());
        assert!(!ExerciseKind::Text.is_letter());
    }

    #[test]
    fn typing_target_joins_lines() {
        let exercise = Exercise {
            id: "text-0".to_string(),
            index: 0,
            kind: ExerciseKind::Text,
            text: vec!["שלום".to_string(), "עולם".to_string()],
            label: "x".to_string(),
            new_letters: None,
        };
        assert_eq!(exercise.typing_target(), "שלום\nעולם");
    }
}
