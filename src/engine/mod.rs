pub mod curriculum;
pub mod filter;
pub mod letters;
pub mod ticker;
pub mod wpm;

pub use curriculum::{Curriculum, CurriculumStep, LetterPair, StepKind};
pub use wpm::{TypingSnapshot, WpmEstimator};
