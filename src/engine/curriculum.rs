use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{self, DataError};
use crate::engine::letters;

/// Two letters introduced together in one step.
pub type LetterPair = [char; 2];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Practice,
    Review,
}

impl StepKind {
    pub fn label(self) -> &'static str {
        match self {
            StepKind::Practice => "Practice",
            StepKind::Review => "Review",
        }
    }
}

/// Curriculum row as stored in the bundled dataset.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterExerciseDescriptor {
    pub new_letters: LetterPair,
    #[serde(rename = "type")]
    pub kind: StepKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurriculumStep {
    pub index: usize,
    pub new_letters: LetterPair,
    pub kind: StepKind,
}

impl CurriculumStep {
    pub fn label(&self) -> String {
        let [first, second] = self.new_letters;
        format!("{first} {second} ({})", self.kind.label())
    }

    pub fn contains(&self, ch: char) -> bool {
        self.new_letters.contains(&ch)
    }
}

#[derive(Debug, Error)]
pub enum CurriculumError {
    #[error("curriculum has no steps")]
    Empty,
    #[error("step {index}: {letter:?} is not a Hebrew letter")]
    NotHebrew { index: usize, letter: char },
    #[error("review step {index} names {letter:?}, which no earlier practice step introduced")]
    ReviewOfUnknownLetter { index: usize, letter: char },
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Ordered, fixed list of letter-introduction steps.
#[derive(Clone, Debug)]
pub struct Curriculum {
    steps: Vec<CurriculumStep>,
}

impl Curriculum {
    pub fn from_descriptors(
        descriptors: Vec<LetterExerciseDescriptor>,
    ) -> Result<Self, CurriculumError> {
        if descriptors.is_empty() {
            return Err(CurriculumError::Empty);
        }

        let mut introduced: Vec<char> = Vec::new();
        let mut steps = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.into_iter().enumerate() {
            for &letter in &descriptor.new_letters {
                if !letters::is_hebrew_letter(letter) {
                    return Err(CurriculumError::NotHebrew { index, letter });
                }
                if descriptor.kind == StepKind::Review && !introduced.contains(&letter) {
                    return Err(CurriculumError::ReviewOfUnknownLetter { index, letter });
                }
            }
            if descriptor.kind == StepKind::Practice {
                introduced.extend(descriptor.new_letters);
            }
            steps.push(CurriculumStep {
                index,
                new_letters: descriptor.new_letters,
                kind: descriptor.kind,
            });
        }

        Ok(Self { steps })
    }

    pub fn load() -> Result<Self, CurriculumError> {
        Self::from_descriptors(data::letter_exercises()?)
    }

    pub fn steps(&self) -> &[CurriculumStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CurriculumStep> {
        self.steps.get(index)
    }

    /// Indices past the end clamp to the last step, so the result is the
    /// whole curriculum's letters rather than an error.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.steps.len().saturating_sub(1))
    }

    /// Order-preserving concatenation of `new_letters` for steps `0..=index`.
    /// Review steps repeat letters already present; duplicates are kept.
    pub fn known_letters_up_to(&self, index: usize) -> Vec<char> {
        if self.steps.is_empty() {
            return Vec::new();
        }
        let end = self.clamp_index(index);
        self.steps[..=end]
            .iter()
            .flat_map(|step| step.new_letters)
            .collect()
    }

    /// Same letters as [`known_letters_up_to`](Self::known_letters_up_to),
    /// first occurrence only.
    pub fn distinct_letters_up_to(&self, index: usize) -> Vec<char> {
        let mut distinct = Vec::new();
        for ch in self.known_letters_up_to(index) {
            if !distinct.contains(&ch) {
                distinct.push(ch);
            }
        }
        distinct
    }

    /// Share of the alphabet (base letters plus finals) known at `index`.
    pub fn progress(&self, index: usize) -> f64 {
        self.distinct_letters_up_to(index).len() as f64 / letters::alphabet_size() as f64
    }
}
