//! Playback through external programs such as `mpv` and `espeak-ng`.

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::speech::backend::{AudioBackend, PlaybackEvent, PlaybackHandle, Utterance};
use crate::speech::error::SpeechError;

const WATCH_INTERVAL: Duration = Duration::from_millis(20);
/// Synthesizer words per minute at rate 1.0.
const BASE_SYNTH_WPM: f32 = 175.0;

/// Fills `{path}`, `{rate}`, `{text}`, `{wpm}`, `{volume}` and `{lang}` in each
/// argument. Unknown placeholders are left as they are.
pub fn expand_template(template: &[String], vars: &[(&str, String)]) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            vars.iter().fold(arg.clone(), |acc, (name, value)| {
                acc.replace(&format!("{{{name}}}"), value)
            })
        })
        .collect()
}

fn clip_vars(location: &str, rate: f32) -> Vec<(&'static str, String)> {
    vec![("path", location.to_string()), ("rate", format!("{rate:.2}"))]
}

fn utterance_vars(utterance: &Utterance) -> Vec<(&'static str, String)> {
    vec![
        ("text", utterance.text.clone()),
        ("rate", format!("{:.2}", utterance.rate)),
        ("wpm", ((BASE_SYNTH_WPM * utterance.rate).round() as u32).to_string()),
        ("volume", ((utterance.volume * 100.0).round() as u32).to_string()),
        ("lang", utterance.lang.clone()),
    ]
}

/// Runs configured command templates as child processes.
pub struct ProcessBackend {
    clip_player: Vec<String>,
    synth_command: Vec<String>,
}

impl ProcessBackend {
    pub fn new(clip_player: Vec<String>, synth_command: Vec<String>) -> Self {
        Self {
            clip_player,
            synth_command,
        }
    }

    fn spawn(
        args: Vec<String>,
        events: Sender<PlaybackEvent>,
    ) -> Result<ProcessHandle, std::io::Error> {
        let Some((program, rest)) = args.split_first() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty command",
            ));
        };
        let child = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!(program = %program, pid = child.id(), "spawned playback process");

        let child = Arc::new(Mutex::new(child));
        let stopped = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        watch(child.clone(), stopped.clone(), finished.clone(), events);
        Ok(ProcessHandle {
            child,
            stopped,
            finished,
        })
    }
}

/// Polls the child until it exits and reports the one terminal event.
fn watch(
    child: Arc<Mutex<Child>>,
    stopped: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    events: Sender<PlaybackEvent>,
) {
    thread::spawn(move || {
        let event = loop {
            // The stop flag is read under the same lock as the exit status.
            let (status, was_stopped) = match child.lock() {
                Ok(mut child) => (child.try_wait(), stopped.load(Ordering::SeqCst)),
                Err(_) => break PlaybackEvent::Failed("playback process lost".to_string()),
            };
            match status {
                Ok(Some(_)) if was_stopped => break PlaybackEvent::Interrupted,
                Ok(Some(status)) if status.success() => break PlaybackEvent::Ended,
                Ok(Some(status)) => break PlaybackEvent::Failed(format!("exited with {status}")),
                Ok(None) => thread::sleep(WATCH_INTERVAL),
                Err(err) => break PlaybackEvent::Failed(err.to_string()),
            }
        };
        finished.store(true, Ordering::SeqCst);
        let _ = events.send(event);
    });
}

impl AudioBackend for ProcessBackend {
    fn play_clip(
        &mut self,
        location: &str,
        rate: f32,
        events: Sender<PlaybackEvent>,
    ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
        let args = expand_template(&self.clip_player, &clip_vars(location, rate));
        let handle = Self::spawn(args, events).map_err(|err| SpeechError::Playback {
            path: location.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Box::new(handle))
    }

    fn speak(
        &mut self,
        utterance: &Utterance,
        events: Sender<PlaybackEvent>,
    ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
        let args = expand_template(&self.synth_command, &utterance_vars(utterance));
        let handle = Self::spawn(args, events).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => SpeechError::Unsupported(format!(
                "{} is not installed",
                self.synth_command.first().map_or("synthesizer", String::as_str)
            )),
            _ => SpeechError::Synthesis(err.to_string()),
        })?;
        Ok(Box::new(handle))
    }
}

pub struct ProcessHandle {
    child: Arc<Mutex<Child>>,
    stopped: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl PlaybackHandle for ProcessHandle {
    /// A process that already exited on its own keeps its natural outcome.
    fn stop(&mut self) {
        if self.finished.load(Ordering::SeqCst) {
            return;
        }
        let Ok(mut child) = self.child.lock() else {
            return;
        };
        if matches!(child.try_wait(), Ok(Some(_))) {
            return;
        }
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = child.kill();
        let _ = child.wait();
    }

    fn is_active(&self) -> bool {
        !self.finished.load(Ordering::SeqCst) && !self.stopped.load(Ordering::SeqCst)
    }
}
