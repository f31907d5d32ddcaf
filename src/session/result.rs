use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::wpm::WpmEstimator;
use crate::session::exercise::Exercise;
use crate::session::typing::TypingState;

/// Summary of one finished exercise, kept in the history file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseResult {
    pub exercise_id: String,
    pub label: String,
    pub wpm: u32,
    pub accuracy: f64,
    pub correct: usize,
    pub total_chars: usize,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
}

impl ExerciseResult {
    /// Speed and duration come from the estimator's final reading so the
    /// result matches what the typing screen showed.
    pub fn from_session(exercise: &Exercise, typing: &TypingState, wpm: &WpmEstimator) -> Self {
        let total_chars = typing.target.len();
        let correct = total_chars.saturating_sub(typing.typo_count());
        let accuracy = if total_chars > 0 {
            (correct as f64 / total_chars as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        };

        Self {
            exercise_id: exercise.id.clone(),
            label: exercise.label.clone(),
            wpm: wpm.wpm(),
            accuracy,
            correct,
            total_chars,
            elapsed_secs: wpm.elapsed_secs(),
            timestamp: Utc::now(),
        }
    }
}
