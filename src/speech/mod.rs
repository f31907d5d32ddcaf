//! Spoken playback of vocabulary and phrases.
//!
//! A request first looks for a pre-rendered clip and plays it; when the clip
//! is missing or cannot be checked, the text is synthesized on the device
//! instead. At most one playback is active at any time.

pub mod backend;
pub mod error;
pub mod orchestrator;
pub mod process;
pub mod store;

use serde::{Deserialize, Serialize};

pub use backend::{AudioBackend, ClipStore, PlaybackEvent, PlaybackHandle, Utterance};
pub use error::SpeechError;
pub use orchestrator::{PlaybackOutcome, SpeechCompletion, SpeechOrchestrator, SpeechSource};

/// Language tag handed to the synthesizer.
pub const HEBREW_LANG: &str = "he-IL";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechSpeed {
    Slow,
    #[default]
    Normal,
}

impl SpeechSpeed {
    /// Playback-rate multiplier, shared by clip playback and synthesis.
    pub fn rate(self) -> f32 {
        match self {
            SpeechSpeed::Slow => 0.6,
            SpeechSpeed::Normal => 1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SpeechSpeed::Slow => SpeechSpeed::Normal,
            SpeechSpeed::Normal => SpeechSpeed::Slow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeechSpeed::Slow => "slow",
            SpeechSpeed::Normal => "normal",
        }
    }
}

/// Canonical clip location for an item: IDs starting with `phrase` are
/// phrase clips, everything else is vocabulary.
pub fn clip_path(item_id: &str) -> String {
    let category = if item_id.starts_with("phrase") {
        "phrase"
    } else {
        "vocab"
    };
    format!("/audio/{category}-{item_id}.mp3")
}
