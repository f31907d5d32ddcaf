use serde::{Deserialize, Serialize};

use crate::session::result::ExerciseResult;

const SCHEMA_VERSION: u32 = 1;
pub const HISTORY_LIMIT: usize = 500;

/// Flat toggle record rewritten on every change. Missing keys take their
/// defaults so older files keep loading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub show_keyboard: bool,
    pub practice_mode: bool,
    pub last_exercise_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_keyboard: true,
            practice_mode: true,
            last_exercise_id: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub results: Vec<ExerciseResult>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

impl HistoryData {
    /// Appends a result, dropping the oldest entries past the limit.
    pub fn push(&mut self, result: ExerciseResult) {
        self.results.push(result);
        if self.results.len() > HISTORY_LIMIT {
            let excess = self.results.len() - HISTORY_LIMIT;
            self.results.drain(..excess);
        }
    }

    pub fn best_wpm(&self, exercise_id: &str) -> Option<u32> {
        self.results
            .iter()
            .filter(|r| r.exercise_id == exercise_id)
            .map(|r| r.wpm)
            .max()
    }
}
