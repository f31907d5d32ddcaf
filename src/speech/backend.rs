use std::sync::mpsc::Sender;

use crate::speech::error::SpeechError;
use crate::speech::{HEBREW_LANG, SpeechSpeed};

/// Terminal event of one playback. Each handle reports exactly one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    Ended,
    /// Stopped through its handle.
    Interrupted,
    Failed(String),
}

/// Control over one running clip or utterance.
pub trait PlaybackHandle: Send {
    /// Cancels playback. The backend reports `Interrupted` unless the
    /// playback had already finished. Safe to call more than once.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub volume: f32,
}

impl Utterance {
    /// Hebrew at full volume with the rate of `speed`.
    pub fn hebrew(text: &str, speed: SpeechSpeed) -> Self {
        Self {
            text: text.to_string(),
            lang: HEBREW_LANG.to_string(),
            rate: speed.rate(),
            volume: 1.0,
        }
    }
}

/// Audio output. Both operations return once playback has started; the
/// outcome arrives later on `events`. An `Err` means playback never
/// started and no event will be sent.
pub trait AudioBackend: Send {
    fn play_clip(
        &mut self,
        location: &str,
        rate: f32,
        events: Sender<PlaybackEvent>,
    ) -> Result<Box<dyn PlaybackHandle>, SpeechError>;

    fn speak(
        &mut self,
        utterance: &Utterance,
        events: Sender<PlaybackEvent>,
    ) -> Result<Box<dyn PlaybackHandle>, SpeechError>;
}

/// Where pre-rendered clips live.
pub trait ClipStore: Send {
    /// Resolves a canonical clip path to something the backend can play.
    fn locate(&self, clip_path: &str) -> String;

    /// Checks that a clip exists without reading its body.
    fn probe(&self, clip_path: &str) -> Result<bool, SpeechError>;
}
