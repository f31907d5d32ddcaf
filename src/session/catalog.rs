use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::data::{self, TextExerciseData};
use crate::engine::curriculum::{Curriculum, CurriculumError};
use crate::generator::dictionary::Dictionary;
use crate::generator::generate_exercise_text;
use crate::session::exercise::{CatalogEntry, Exercise, ExerciseKind, exercise_id};

/// All selectable exercises: generated letter exercises at `0..N` followed
/// by the fixed free-text exercises at `N..N+M`, in declared order.
///
/// The catalog is the single owner of the active exercise. Every change to
/// it goes through `select_*`, `regenerate` or `clear`.
pub struct ExerciseCatalog {
    curriculum: Curriculum,
    texts: Vec<TextExerciseData>,
    dictionary: Dictionary,
    current: Option<Exercise>,
    rng: SmallRng,
}

impl ExerciseCatalog {
    pub fn new(
        curriculum: Curriculum,
        texts: Vec<TextExerciseData>,
        dictionary: Dictionary,
        rng: SmallRng,
    ) -> Self {
        Self {
            curriculum,
            texts,
            dictionary,
            current: None,
            rng,
        }
    }

    /// Bundled datasets with an entropy-seeded generator.
    pub fn load() -> Result<Self, CurriculumError> {
        Self::load_with_rng(SmallRng::from_entropy())
    }

    /// Bundled datasets with a fixed seed, for reproducible output.
    pub fn with_seed(seed: u64) -> Result<Self, CurriculumError> {
        Self::load_with_rng(SmallRng::seed_from_u64(seed))
    }

    fn load_with_rng(rng: SmallRng) -> Result<Self, CurriculumError> {
        let curriculum = Curriculum::load()?;
        let texts = data::text_exercises()?;
        Ok(Self::new(curriculum, texts, Dictionary::load(), rng))
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    /// Number of letter exercises; free-text exercises start at this index.
    pub fn letter_count(&self) -> usize {
        self.curriculum.len()
    }

    pub fn len(&self) -> usize {
        self.curriculum.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entry_at(&self, index: usize) -> Option<CatalogEntry> {
        if let Some(step) = self.curriculum.get(index) {
            let kind = ExerciseKind::from(step.kind);
            return Some(CatalogEntry {
                id: exercise_id(index, kind),
                index,
                kind,
                label: step.label(),
                new_letters: Some(step.new_letters),
            });
        }
        let text = self.texts.get(index - self.curriculum.len())?;
        Some(CatalogEntry {
            id: exercise_id(index, ExerciseKind::Text),
            index,
            kind: ExerciseKind::Text,
            label: text.label.clone(),
            new_letters: None,
        })
    }

    pub fn entries(&self) -> Vec<CatalogEntry> {
        (0..self.len()).filter_map(|i| self.entry_at(i)).collect()
    }

    pub fn find_id(&self, id: &str) -> Option<usize> {
        (0..self.len()).find(|&i| self.entry_at(i).is_some_and(|e| e.id == id))
    }

    /// Builds the exercise at `index` with fresh text, without selecting it.
    pub fn exercise_at(&mut self, index: usize) -> Option<Exercise> {
        let entry = self.entry_at(index)?;
        let text = if entry.kind.is_letter() {
            let seed = self.rng.r#gen::<u64>();
            generate_exercise_text(&self.curriculum, &self.dictionary, index, seed)
        } else {
            self.texts[index - self.curriculum.len()].text.clone()
        };
        Some(Exercise::from_entry(entry, text))
    }

    /// Activates the exercise with this ID. An unknown ID leaves the
    /// current exercise untouched and returns false.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        match self.find_id(id) {
            Some(index) => self.select_by_index(index),
            None => {
                debug!(id, "no exercise with this id");
                false
            }
        }
    }

    /// Activates the exercise at a global index. Out-of-range indices leave
    /// the current exercise untouched and return false.
    pub fn select_by_index(&mut self, index: usize) -> bool {
        match self.exercise_at(index) {
            Some(exercise) => {
                debug!(index, id = %exercise.id, "exercise selected");
                self.current = Some(exercise);
                true
            }
            None => {
                debug!(index, "no exercise at this index");
                false
            }
        }
    }

    /// Replaces the text of the active letter exercise. Does nothing when no
    /// exercise is active or the active one is a free-text exercise.
    pub fn regenerate(&mut self) -> bool {
        let Some(exercise) = self.current.as_ref() else {
            return false;
        };
        if !exercise.is_letter_exercise() {
            return false;
        }
        let index = exercise.index;
        let seed = self.rng.r#gen::<u64>();
        let text = generate_exercise_text(&self.curriculum, &self.dictionary, index, seed);
        if let Some(exercise) = self.current.as_mut() {
            exercise.text = text;
        }
        true
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Exercise> {
        self.current.as_ref()
    }

    /// First letter introduced by the active letter exercise.
    pub fn current_letter(&self) -> Option<char> {
        self.current
            .as_ref()
            .and_then(|e| e.new_letters)
            .map(|pair| pair[0])
    }

    /// Moves to the following exercise, or the first one when none is
    /// active. Stays put at the end of the catalog.
    pub fn select_next(&mut self) -> bool {
        let next = self.current.as_ref().map_or(0, |e| e.index + 1);
        self.select_by_index(next)
    }

    pub fn select_previous(&mut self) -> bool {
        match self.current.as_ref().map(|e| e.index) {
            Some(index) if index > 0 => self.select_by_index(index - 1),
            _ => false,
        }
    }
}
