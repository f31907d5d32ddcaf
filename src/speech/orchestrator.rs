use std::sync::mpsc::{self, Receiver, TryRecvError};

use tracing::{debug, warn};

use crate::speech::backend::{AudioBackend, ClipStore, PlaybackEvent, PlaybackHandle, Utterance};
use crate::speech::error::SpeechError;
use crate::speech::{SpeechSpeed, clip_path};

/// How a request ended up being voiced. Decided per request, never cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechSource {
    Prerendered,
    Synthesized,
}

/// Successful end of a playback. Being stopped is not a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Completed,
    Interrupted,
}

enum CompletionState {
    Pending(Receiver<PlaybackEvent>),
    Settled(Result<PlaybackOutcome, SpeechError>),
}

/// The single terminal outcome of one speak request.
///
/// Every completion settles: if the backend goes away without reporting,
/// the request counts as interrupted.
pub struct SpeechCompletion {
    source: SpeechSource,
    path: String,
    state: CompletionState,
}

impl SpeechCompletion {
    fn pending(source: SpeechSource, path: String, events: Receiver<PlaybackEvent>) -> Self {
        Self {
            source,
            path,
            state: CompletionState::Pending(events),
        }
    }

    fn failed(source: SpeechSource, path: String, err: SpeechError) -> Self {
        Self {
            source,
            path,
            state: CompletionState::Settled(Err(err)),
        }
    }

    pub fn source(&self) -> SpeechSource {
        self.source
    }

    /// Location that was played, or the text's clip path for synthesis.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.state, CompletionState::Settled(_))
    }

    /// Non-blocking check. Returns the outcome once settled, and keeps
    /// returning it on later calls.
    pub fn poll(&mut self) -> Option<Result<PlaybackOutcome, SpeechError>> {
        if let CompletionState::Pending(events) = &self.state {
            let result = match events.try_recv() {
                Ok(event) => self.interpret(event),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => Ok(PlaybackOutcome::Interrupted),
            };
            self.state = CompletionState::Settled(result);
        }
        match &self.state {
            CompletionState::Settled(result) => Some(result.clone()),
            CompletionState::Pending(_) => None,
        }
    }

    /// Blocks until the playback settles.
    pub fn wait(self) -> Result<PlaybackOutcome, SpeechError> {
        let received = match &self.state {
            CompletionState::Settled(result) => return result.clone(),
            CompletionState::Pending(events) => events.recv(),
        };
        match received {
            Ok(event) => self.interpret(event),
            Err(_) => Ok(PlaybackOutcome::Interrupted),
        }
    }

    fn interpret(&self, event: PlaybackEvent) -> Result<PlaybackOutcome, SpeechError> {
        match event {
            PlaybackEvent::Ended => Ok(PlaybackOutcome::Completed),
            PlaybackEvent::Interrupted => Ok(PlaybackOutcome::Interrupted),
            PlaybackEvent::Failed(reason) => Err(match self.source {
                SpeechSource::Prerendered => SpeechError::Playback {
                    path: self.path.clone(),
                    reason,
                },
                SpeechSource::Synthesized => SpeechError::Synthesis(reason),
            }),
        }
    }
}

/// Plays pre-rendered clips with a synthesis fallback, keeping at most one
/// playback alive.
pub struct SpeechOrchestrator {
    backend: Box<dyn AudioBackend>,
    clips: Box<dyn ClipStore>,
    default_speed: SpeechSpeed,
    current: Option<Box<dyn PlaybackHandle>>,
}

impl SpeechOrchestrator {
    pub fn new(backend: Box<dyn AudioBackend>, clips: Box<dyn ClipStore>) -> Self {
        Self {
            backend,
            clips,
            default_speed: SpeechSpeed::default(),
            current: None,
        }
    }

    pub fn default_speed(&self) -> SpeechSpeed {
        self.default_speed
    }

    /// Used by later requests that pass no speed. Playback already running
    /// keeps its rate.
    pub fn set_default_speed(&mut self, speed: SpeechSpeed) {
        self.default_speed = speed;
    }

    pub fn is_speaking(&self) -> bool {
        self.current.as_ref().is_some_and(|h| h.is_active())
    }

    /// Cancels whatever is playing. A no-op when idle.
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.current.take() {
            if handle.is_active() {
                debug!("stopping playback");
            }
            handle.stop();
        }
    }

    /// Voices one vocabulary or phrase item.
    ///
    /// Prior playback is stopped before anything else happens. The item's
    /// clip is played when present; when it is absent, or its existence
    /// cannot be checked, `hebrew_text` is synthesized instead at the same
    /// rate.
    pub fn speak_item(
        &mut self,
        item_id: &str,
        hebrew_text: &str,
        speed: Option<SpeechSpeed>,
    ) -> SpeechCompletion {
        self.stop();
        let speed = speed.unwrap_or(self.default_speed);
        let path = clip_path(item_id);

        match self.clips.probe(&path) {
            Ok(true) => return self.play_clip(&path, speed),
            Ok(false) => {
                warn!(item_id, path = %path, "audio clip not found, falling back to synthesis");
            }
            Err(err) => {
                warn!(item_id, path = %path, error = %err, "audio clip check failed, falling back to synthesis");
            }
        }
        self.synthesize(hebrew_text, speed, path)
    }

    /// Synthesizes free text directly, with no clip lookup.
    pub fn speak_text(&mut self, text: &str, speed: Option<SpeechSpeed>) -> SpeechCompletion {
        self.stop();
        let speed = speed.unwrap_or(self.default_speed);
        self.synthesize(text, speed, String::new())
    }

    fn play_clip(&mut self, path: &str, speed: SpeechSpeed) -> SpeechCompletion {
        let location = self.clips.locate(path);
        let (tx, rx) = mpsc::channel();
        match self.backend.play_clip(&location, speed.rate(), tx) {
            Ok(handle) => {
                debug!(location = %location, rate = speed.rate(), "playing clip");
                self.current = Some(handle);
                SpeechCompletion::pending(SpeechSource::Prerendered, location, rx)
            }
            Err(err) => SpeechCompletion::failed(SpeechSource::Prerendered, location, err),
        }
    }

    fn synthesize(&mut self, text: &str, speed: SpeechSpeed, path: String) -> SpeechCompletion {
        let utterance = Utterance::hebrew(text, speed);
        let (tx, rx) = mpsc::channel();
        match self.backend.speak(&utterance, tx) {
            Ok(handle) => {
                debug!(rate = utterance.rate, "synthesizing");
                self.current = Some(handle);
                SpeechCompletion::pending(SpeechSource::Synthesized, path, rx)
            }
            Err(err) => SpeechCompletion::failed(SpeechSource::Synthesized, path, err),
        }
    }
}

impl Drop for SpeechOrchestrator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Sender;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct Slot {
        events: Option<Sender<PlaybackEvent>>,
    }

    struct FakeHandle(Arc<Mutex<Slot>>);

    impl PlaybackHandle for FakeHandle {
        fn stop(&mut self) {
            if let Some(tx) = self.0.lock().unwrap().events.take() {
                let _ = tx.send(PlaybackEvent::Interrupted);
            }
        }

        fn is_active(&self) -> bool {
            self.0.lock().unwrap().events.is_some()
        }
    }

    #[derive(Default)]
    struct Log {
        clips: Vec<(String, f32)>,
        utterances: Vec<Utterance>,
        slots: Vec<Arc<Mutex<Slot>>>,
    }

    #[derive(Clone, Default)]
    struct FakeBackend {
        log: Arc<Mutex<Log>>,
        refuse_synthesis: bool,
    }

    impl FakeBackend {
        fn start(&self, events: Sender<PlaybackEvent>) -> Box<dyn PlaybackHandle> {
            let slot = Arc::new(Mutex::new(Slot {
                events: Some(events),
            }));
            self.log.lock().unwrap().slots.push(slot.clone());
            Box::new(FakeHandle(slot))
        }

        fn finish_last(&self, event: PlaybackEvent) {
            let log = self.log.lock().unwrap();
            let slot = log.slots.last().unwrap();
            if let Some(tx) = slot.lock().unwrap().events.take() {
                tx.send(event).unwrap();
            }
        }
    }

    impl AudioBackend for FakeBackend {
        fn play_clip(
            &mut self,
            location: &str,
            rate: f32,
            events: Sender<PlaybackEvent>,
        ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
            self.log.lock().unwrap().clips.push((location.to_string(), rate));
            Ok(self.start(events))
        }

        fn speak(
            &mut self,
            utterance: &Utterance,
            events: Sender<PlaybackEvent>,
        ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
            if self.refuse_synthesis {
                return Err(SpeechError::Unsupported("no engine".to_string()));
            }
            self.log.lock().unwrap().utterances.push(utterance.clone());
            Ok(self.start(events))
        }
    }

    struct FakeClips(Result<bool, SpeechError>);

    impl ClipStore for FakeClips {
        fn locate(&self, clip_path: &str) -> String {
            format!("/srv{clip_path}")
        }

        fn probe(&self, _clip_path: &str) -> Result<bool, SpeechError> {
            self.0.clone()
        }
    }

    fn orchestrator(backend: &FakeBackend, probe: Result<bool, SpeechError>) -> SpeechOrchestrator {
        SpeechOrchestrator::new(Box::new(backend.clone()), Box::new(FakeClips(probe)))
    }

    #[test]
    fn present_clip_is_played_at_speed() {
        let backend = FakeBackend::default();
        let mut speech = orchestrator(&backend, Ok(true));
        let mut done = speech.speak_item("v001", "שלום", Some(SpeechSpeed::Slow));
        assert_eq!(done.source(), SpeechSource::Prerendered);
        assert!(speech.is_speaking());
        assert!(done.poll().is_none());

        backend.finish_last(PlaybackEvent::Ended);
        assert_eq!(done.poll(), Some(Ok(PlaybackOutcome::Completed)));
        assert!(!speech.is_speaking());

        let log = backend.log.lock().unwrap();
        assert_eq!(log.clips, vec![("/srv/audio/vocab-v001.mp3".to_string(), 0.6)]);
        assert!(log.utterances.is_empty());
    }

    #[test]
    fn missing_clip_falls_back_to_synthesis() {
        let backend = FakeBackend::default();
        let mut speech = orchestrator(&backend, Ok(false));
        let done = speech.speak_item("phrase-2", "מה שלומך", None);
        assert_eq!(done.source(), SpeechSource::Synthesized);
        backend.finish_last(PlaybackEvent::Ended);
        assert_eq!(done.wait(), Ok(PlaybackOutcome::Completed));

        let log = backend.log.lock().unwrap();
        assert!(log.clips.is_empty());
        assert_eq!(log.utterances, vec![Utterance::hebrew("מה שלומך", SpeechSpeed::Normal)]);
        assert_eq!(log.utterances[0].lang, "he-IL");
        assert_eq!(log.utterances[0].volume, 1.0);
    }

    #[test]
    fn probe_failure_also_falls_back() {
        let backend = FakeBackend::default();
        let probe = Err(SpeechError::Probe {
            path: "/audio/vocab-v002.mp3".to_string(),
            reason: "connection refused".to_string(),
        });
        let mut speech = orchestrator(&backend, probe);
        let done = speech.speak_item("v002", "תודה", None);
        assert_eq!(done.source(), SpeechSource::Synthesized);
    }

    #[test]
    fn playback_failure_rejects_with_path() {
        let backend = FakeBackend::default();
        let mut speech = orchestrator(&backend, Ok(true));
        let done = speech.speak_item("v003", "כן", None);
        backend.finish_last(PlaybackEvent::Failed("decoder error".to_string()));
        let err = done.wait().unwrap_err();
        assert!(err.to_string().starts_with("Failed to play audio: /srv/audio/vocab-v003.mp3"));
    }

    #[test]
    fn synthesis_error_rejects() {
        let backend = FakeBackend::default();
        let mut speech = orchestrator(&backend, Ok(false));
        let done = speech.speak_item("v003", "כן", None);
        backend.finish_last(PlaybackEvent::Failed("synthesis-failed".to_string()));
        assert_eq!(
            done.wait(),
            Err(SpeechError::Synthesis("synthesis-failed".to_string()))
        );
    }

    #[test]
    fn synthesis_that_cannot_start_rejects_immediately() {
        let backend = FakeBackend {
            refuse_synthesis: true,
            ..FakeBackend::default()
        };
        let mut speech = orchestrator(&backend, Ok(false));
        let mut done = speech.speak_item("v004", "לא", None);
        assert!(done.is_settled());
        assert!(matches!(done.poll(), Some(Err(SpeechError::Unsupported(_)))));
        assert!(!speech.is_speaking());
    }

    #[test]
    fn stop_settles_synthesis_as_interrupted() {
        let backend = FakeBackend::default();
        let mut speech = orchestrator(&backend, Ok(false));
        let mut done = speech.speak_text("אחת שתיים", None);
        speech.stop();
        assert!(!speech.is_speaking());
        assert_eq!(done.poll(), Some(Ok(PlaybackOutcome::Interrupted)));
        // Stopping again is harmless.
        speech.stop();
    }

    #[test]
    fn default_speed_applies_to_later_calls() {
        let backend = FakeBackend::default();
        let mut speech = orchestrator(&backend, Ok(true));
        speech.speak_item("v001", "שלום", None);
        speech.set_default_speed(SpeechSpeed::Slow);
        speech.speak_item("v001", "שלום", None);
        speech.speak_item("v001", "שלום", Some(SpeechSpeed::Normal));

        let rates: Vec<f32> = backend.log.lock().unwrap().clips.iter().map(|c| c.1).collect();
        assert_eq!(rates, vec![1.0, 0.6, 1.0]);
    }

    #[test]
    fn dropped_backend_channel_settles() {
        let backend = FakeBackend::default();
        let mut speech = orchestrator(&backend, Ok(true));
        let done = speech.speak_item("v001", "שלום", None);
        let sender = backend.log.lock().unwrap().slots[0].lock().unwrap().events.take();
        drop(sender);
        assert_eq!(done.wait(), Ok(PlaybackOutcome::Interrupted));
    }
}
