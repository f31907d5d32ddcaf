//! Practice text for a curriculum step.
//!
//! Generation is a pure function of the step index and a caller-supplied
//! seed; the catalog draws a fresh seed for every regeneration.

pub mod dictionary;
pub mod drills;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::engine::curriculum::{Curriculum, StepKind};
use crate::engine::filter::LetterFilter;
use crate::generator::dictionary::Dictionary;
use crate::generator::drills::LetterWeights;

pub const LINES_PER_EXERCISE: usize = 6;
pub const GROUPS_PER_LINE: usize = 8;
const MIN_REAL_WORDS: usize = 4;

const PRACTICE_FOCUS_WEIGHT: f64 = 3.0;
const REVIEW_FOCUS_WEIGHT: f64 = 4.0;
const MIXED_FOCUS_WEIGHT: f64 = 2.0;

/// Builds the drill lines for step `index` (clamped to the last step).
///
/// Every character of every line is either a space or a letter known at that
/// step. Lines lean on the step's two letters; review steps lean harder.
pub fn generate_exercise_text(
    curriculum: &Curriculum,
    dictionary: &Dictionary,
    index: usize,
    seed: u64,
) -> Vec<String> {
    let index = curriculum.clamp_index(index);
    let Some(step) = curriculum.get(index) else {
        return Vec::new();
    };
    let mut rng = SmallRng::seed_from_u64(seed);

    let focus: Vec<char> = step.new_letters.to_vec();
    let known = curriculum.distinct_letters_up_to(index);
    let others: Vec<char> = known
        .iter()
        .copied()
        .filter(|ch| !focus.contains(ch))
        .collect();
    let focus_weight = match step.kind {
        StepKind::Practice => PRACTICE_FOCUS_WEIGHT,
        StepKind::Review => REVIEW_FOCUS_WEIGHT,
    };
    let weighted = LetterWeights::new(&known, &focus, focus_weight);
    let mixed = LetterWeights::new(&known, &focus, MIXED_FOCUS_WEIGHT);

    let mut lines = Vec::with_capacity(LINES_PER_EXERCISE);
    lines.push(drills::pair_drill(step.new_letters, GROUPS_PER_LINE, &mut rng));
    lines.push(drills::alternation_drill(
        &focus,
        &others,
        GROUPS_PER_LINE,
        &mut rng,
    ));
    lines.push(drills::pseudo_words(&weighted, GROUPS_PER_LINE, &mut rng));
    lines.push(drills::pseudo_words(&weighted, GROUPS_PER_LINE, &mut rng));

    let filter = LetterFilter::new(known.clone());
    let matching = dictionary.find_matching(&filter, &focus);
    if matching.len() >= MIN_REAL_WORDS {
        let preferred: Vec<&str> = matching
            .iter()
            .copied()
            .filter(|w| w.chars().any(|c| focus.contains(&c)))
            .collect();
        lines.push(drills::word_line(
            &preferred,
            &matching,
            GROUPS_PER_LINE,
            &mut rng,
        ));
    } else {
        lines.push(drills::pseudo_words(&weighted, GROUPS_PER_LINE, &mut rng));
    }

    lines.push(drills::pseudo_words(&mixed, GROUPS_PER_LINE, &mut rng));
    lines
}
