use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Failed to play audio: {path} ({reason})")]
    Playback { path: String, reason: String },
    #[error("Speech error: {0}")]
    Synthesis(String),
    #[error("Speech synthesis not supported: {0}")]
    Unsupported(String),
    /// Existence check failed. Only logged; the request falls back to
    /// synthesis.
    #[error("could not check {path}: {reason}")]
    Probe { path: String, reason: String },
}
