use rand::Rng;
use rand::rngs::SmallRng;

use crate::engine::curriculum::LetterPair;
use crate::engine::letters;

const MIN_GROUP_LEN: usize = 2;
const MAX_GROUP_LEN: usize = 4;
const MIN_PSEUDO_WORD_LEN: usize = 2;
const MAX_PSEUDO_WORD_LEN: usize = 5;

/// Letters with relative draw weights.
#[derive(Clone, Debug)]
pub struct LetterWeights {
    entries: Vec<(char, f64)>,
}

impl LetterWeights {
    /// Every letter in `known` gets weight 1, letters in `focus` get
    /// `focus_weight`. Duplicates in `known` are collapsed.
    pub fn new(known: &[char], focus: &[char], focus_weight: f64) -> Self {
        let mut entries: Vec<(char, f64)> = Vec::new();
        for &ch in known {
            if entries.iter().any(|(c, _)| *c == ch) {
                continue;
            }
            let w = if focus.contains(&ch) { focus_weight } else { 1.0 };
            entries.push((ch, w));
        }
        Self { entries }
    }

    pub fn letters(&self) -> Vec<char> {
        self.entries.iter().map(|(c, _)| *c).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn pick_weighted(rng: &mut SmallRng, options: &[(char, f64)]) -> Option<char> {
    let total: f64 = options.iter().map(|(_, w)| w).sum();
    if options.is_empty() || total <= 0.0 {
        return None;
    }

    let mut roll = rng.gen_range(0.0..total);
    for (ch, weight) in options {
        roll -= weight;
        if roll <= 0.0 {
            return Some(*ch);
        }
    }

    options.last().map(|(ch, _)| *ch)
}

fn pick(rng: &mut SmallRng, options: &[char]) -> char {
    options[rng.gen_range(0..options.len())]
}

/// Groups built only from the two letters of the step, e.g. `כח חכ ככח`.
pub fn pair_drill(pair: LetterPair, groups: usize, rng: &mut SmallRng) -> String {
    (0..groups)
        .map(|i| {
            let len = rng.gen_range(MIN_GROUP_LEN..=MAX_GROUP_LEN);
            // Open on alternating letters so both lead groups equally often.
            let lead = pair[i % 2];
            std::iter::once(lead)
                .chain((1..len).map(|_| pick(rng, &pair)))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Groups alternating a focus letter with another known letter.
pub fn alternation_drill(
    focus: &[char],
    others: &[char],
    groups: usize,
    rng: &mut SmallRng,
) -> String {
    let others = if others.is_empty() { focus } else { others };
    (0..groups)
        .map(|_| {
            let len = rng.gen_range(3..=MAX_GROUP_LEN);
            (0..len)
                .map(|pos| {
                    if pos % 2 == 0 {
                        pick(rng, focus)
                    } else {
                        pick(rng, others)
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One pseudo-word. Final forms only close a word, and a base letter whose
/// final form is known never does.
pub fn pseudo_word(weights: &LetterWeights, rng: &mut SmallRng) -> String {
    let known = weights.letters();
    let inner: Vec<(char, f64)> = weights
        .entries
        .iter()
        .copied()
        .filter(|(ch, _)| !letters::is_final_form(*ch))
        .collect();
    let closing: Vec<(char, f64)> = weights
        .entries
        .iter()
        .copied()
        .filter(|(ch, _)| !letters::final_form_of(*ch).is_some_and(|f| known.contains(&f)))
        .collect();

    let len = rng.gen_range(MIN_PSEUDO_WORD_LEN..=MAX_PSEUDO_WORD_LEN);
    let mut word = String::new();
    for pos in 0..len {
        let pool = if pos + 1 == len { &closing } else { &inner };
        let pool = if pool.is_empty() { &weights.entries } else { pool };
        if let Some(ch) = pick_weighted(rng, pool) {
            word.push(ch);
        }
    }
    word
}

pub fn pseudo_words(weights: &LetterWeights, count: usize, rng: &mut SmallRng) -> String {
    (0..count)
        .map(|_| pseudo_word(weights, rng))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Picks `count` words, favouring `preferred` when it is non-empty.
pub fn word_line(
    preferred: &[&str],
    all: &[&str],
    count: usize,
    rng: &mut SmallRng,
) -> String {
    (0..count)
        .filter_map(|_| {
            let pool = if !preferred.is_empty() && rng.gen_bool(0.75) {
                preferred
            } else {
                all
            };
            if pool.is_empty() {
                None
            } else {
                Some(pool[rng.gen_range(0..pool.len())])
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
