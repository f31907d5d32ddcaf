use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::config::{Config, KeyboardInput};
use crate::engine::wpm::WpmEstimator;
use crate::keyboard::layout::HebrewLayout;
use crate::session::catalog::ExerciseCatalog;
use crate::session::exercise::Exercise;
use crate::session::input;
use crate::session::result::ExerciseResult;
use crate::session::typing::TypingState;
use crate::speech::{SpeechCompletion, SpeechOrchestrator, SpeechSpeed};
use crate::store::json_store::JsonStore;
use crate::store::schema::{HistoryData, Settings};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    ExerciseList,
    Typing,
    Result,
}

pub struct App {
    pub screen: AppScreen,
    pub catalog: ExerciseCatalog,
    pub typing: Option<TypingState>,
    pub wpm: WpmEstimator,
    pub speech: SpeechOrchestrator,
    pending_speech: Option<SpeechCompletion>,
    pub status: Option<String>,
    pub last_result: Option<ExerciseResult>,
    pub history: HistoryData,
    pub settings: Settings,
    pub list_selected: usize,
    pub layout: HebrewLayout,
    pub theme: &'static Theme,
    pub config: Config,
    /// Where toggled preferences are written back. `None` keeps them in memory.
    config_path: Option<PathBuf>,
    pub store: Option<JsonStore>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        catalog: ExerciseCatalog,
        mut speech: SpeechOrchestrator,
        store: Option<JsonStore>,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_else(|| {
            warn!(theme = %config.theme, "unknown theme, using default");
            Theme::default()
        });
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let (settings, history) = match store.as_ref() {
            Some(s) => (s.load_settings(), s.load_history()),
            None => (Settings::default(), HistoryData::default()),
        };
        speech.set_default_speed(config.speech_speed);

        let list_selected = settings
            .last_exercise_id
            .as_deref()
            .and_then(|id| catalog.find_id(id))
            .unwrap_or(0);

        Self {
            screen: AppScreen::ExerciseList,
            catalog,
            typing: None,
            wpm: WpmEstimator::new(Duration::from_millis(config.wpm_refresh_ms)),
            speech,
            pending_speech: None,
            status: None,
            last_result: None,
            history,
            settings,
            list_selected,
            layout: HebrewLayout::new(),
            theme,
            config,
            config_path: None,
            store,
            should_quit: false,
        }
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.catalog.current()
    }

    pub fn list_next(&mut self) {
        if self.list_selected + 1 < self.catalog.len() {
            self.list_selected += 1;
        }
    }

    pub fn list_prev(&mut self) {
        self.list_selected = self.list_selected.saturating_sub(1);
    }

    pub fn open_selected(&mut self) {
        self.open_exercise(self.list_selected);
    }

    pub fn open_exercise(&mut self, index: usize) {
        if self.catalog.select_by_index(index) {
            self.start_typing();
        }
    }

    /// Resumes the exercise stored in settings. A stale ID leaves the list
    /// as it was.
    pub fn continue_last(&mut self) {
        let Some(id) = self.settings.last_exercise_id.clone() else {
            self.status = Some("No exercise to continue".to_string());
            return;
        };
        if self.catalog.select_by_id(&id) {
            self.start_typing();
        } else {
            self.status = Some(format!("Exercise {id} is no longer available"));
        }
    }

    pub fn next_exercise(&mut self) {
        if self.catalog.select_next() {
            self.start_typing();
        } else {
            self.go_to_list();
        }
    }

    /// New text for the active letter exercise. Free-text exercises keep
    /// their text and the current attempt.
    pub fn regenerate(&mut self) {
        if self.catalog.regenerate() {
            self.start_typing();
        }
    }

    pub fn retry(&mut self) {
        if self.catalog.current().is_some() {
            self.start_typing();
        }
    }

    /// Every change of exercise or text starts a fresh typing session.
    fn start_typing(&mut self) {
        let Some(exercise) = self.catalog.current() else {
            return;
        };
        self.speech.stop();
        self.pending_speech = None;
        self.typing = Some(TypingState::from_lines(&exercise.text));
        self.wpm.reset();
        self.list_selected = exercise.index;
        self.settings.last_exercise_id = Some(exercise.id.clone());
        self.status = None;
        self.screen = AppScreen::Typing;
        info!(id = %exercise.id, "exercise started");
        self.save_settings();
    }

    pub fn go_to_list(&mut self) {
        self.speech.stop();
        self.typing = None;
        self.wpm.reset();
        self.screen = AppScreen::ExerciseList;
    }

    pub fn type_char(&mut self, ch: char, now: Instant) {
        let ch = match self.config.keyboard_input {
            KeyboardInput::Qwerty => self.layout.to_hebrew(ch),
            KeyboardInput::Hebrew => ch,
        };
        let Some(typing) = self.typing.as_mut() else {
            return;
        };
        input::process_char(typing, ch);
        self.wpm.observe(&typing.snapshot(), now);
        if typing.is_complete() {
            self.finish();
        }
    }

    pub fn backspace(&mut self, now: Instant) {
        if let Some(typing) = self.typing.as_mut() {
            input::process_backspace(typing);
            self.wpm.observe(&typing.snapshot(), now);
        }
    }

    /// Drives the estimator's polling and collects finished speech.
    pub fn tick(&mut self, now: Instant) {
        if self.screen == AppScreen::Typing
            && let Some(typing) = self.typing.as_ref()
        {
            self.wpm.poll(&typing.snapshot(), now);
        }

        if let Some(done) = self.pending_speech.as_mut()
            && let Some(outcome) = done.poll()
        {
            if let Err(err) = outcome {
                self.status = Some(err.to_string());
            }
            self.pending_speech = None;
        }
    }

    fn finish(&mut self) {
        let (Some(exercise), Some(typing)) = (self.catalog.current(), self.typing.as_ref()) else {
            return;
        };
        let result = ExerciseResult::from_session(exercise, typing, &self.wpm);
        info!(id = %result.exercise_id, wpm = result.wpm, accuracy = result.accuracy, "exercise finished");
        self.history.push(result.clone());
        if let Some(store) = self.store.as_ref()
            && let Err(err) = store.save_history(&self.history)
        {
            error!(error = %err, "failed to save history");
        }
        self.last_result = Some(result);
        self.screen = AppScreen::Result;
    }

    /// Reads the line under the cursor aloud.
    pub fn speak_current_line(&mut self) {
        let Some(line) = self.typing.as_ref().map(|t| t.current_line()) else {
            return;
        };
        if line.trim().is_empty() {
            return;
        }
        self.pending_speech = Some(self.speech.speak_text(&line, None));
    }

    pub fn toggle_speed(&mut self) {
        let speed = self.speech.default_speed().toggled();
        self.speech.set_default_speed(speed);
        self.config.speech_speed = speed;
        self.status = Some(format!("Speech speed: {}", speed.label()));
        if let Some(path) = self.config_path.as_deref()
            && let Err(err) = save_speed(path, speed)
        {
            error!(error = %err, path = %path.display(), "failed to save config");
        }
    }

    pub fn toggle_keyboard(&mut self) {
        self.settings.show_keyboard = !self.settings.show_keyboard;
        self.save_settings();
    }

    /// Test mode hides the keyboard hints for the next key.
    pub fn toggle_practice_mode(&mut self) {
        self.settings.practice_mode = !self.settings.practice_mode;
        self.status = Some(if self.settings.practice_mode {
            "Practice mode".to_string()
        } else {
            "Test mode: key hints hidden".to_string()
        });
        self.save_settings();
    }

    fn save_settings(&self) {
        if let Some(store) = self.store.as_ref()
            && let Err(err) = store.save_settings(&self.settings)
        {
            error!(error = %err, "failed to save settings");
        }
    }

    /// Share of the curriculum's letters known at the active exercise.
    pub fn letter_progress(&self) -> Option<f64> {
        let exercise = self.catalog.current()?;
        exercise
            .is_letter_exercise()
            .then(|| self.catalog.curriculum().progress(exercise.index))
    }

    pub fn quit(&mut self) {
        self.speech.stop();
        self.should_quit = true;
    }
}

/// Writes only the speed into the file so command-line overrides held in
/// the live config stay out of it.
fn save_speed(path: &Path, speed: SpeechSpeed) -> anyhow::Result<()> {
    let mut on_disk = Config::load_from(path)?;
    on_disk.speech_speed = speed;
    on_disk.save_to(path)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::Sender;

    use tempfile::TempDir;

    use super::*;
    use crate::speech::{AudioBackend, ClipStore, PlaybackEvent, PlaybackHandle, SpeechError, Utterance};

    /// Playback ends at once; stop requests are counted.
    #[derive(Clone, Default)]
    struct Silent {
        stops: Arc<AtomicUsize>,
    }

    struct SilentHandle(Arc<AtomicUsize>);

    impl PlaybackHandle for SilentHandle {
        fn stop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn is_active(&self) -> bool {
            false
        }
    }

    impl AudioBackend for Silent {
        fn play_clip(
            &mut self,
            _location: &str,
            _rate: f32,
            events: Sender<PlaybackEvent>,
        ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
            let _ = events.send(PlaybackEvent::Ended);
            Ok(Box::new(SilentHandle(Arc::clone(&self.stops))))
        }

        fn speak(
            &mut self,
            _utterance: &Utterance,
            events: Sender<PlaybackEvent>,
        ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
            let _ = events.send(PlaybackEvent::Ended);
            Ok(Box::new(SilentHandle(Arc::clone(&self.stops))))
        }
    }

    impl ClipStore for Silent {
        fn locate(&self, clip_path: &str) -> String {
            clip_path.to_string()
        }
        fn probe(&self, _clip_path: &str) -> Result<bool, SpeechError> {
            Ok(false)
        }
    }

    fn app(dir: &TempDir) -> App {
        app_with(dir, Silent::default())
    }

    fn app_with(dir: &TempDir, silent: Silent) -> App {
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let speech = SpeechOrchestrator::new(Box::new(silent.clone()), Box::new(silent));
        App::new(
            Config::default(),
            ExerciseCatalog::with_seed(5).unwrap(),
            speech,
            Some(store),
        )
    }

    fn type_all(app: &mut App, t0: Instant) {
        let target: Vec<char> = app.typing.as_ref().unwrap().target.clone();
        for (i, ch) in target.into_iter().enumerate() {
            app.type_char(ch, t0 + Duration::from_millis(200 * i as u64));
        }
    }

    #[test]
    fn opening_exercise_resets_estimator_and_remembers_it() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let t0 = Instant::now();
        app.open_exercise(0);
        app.type_char('כ', t0);
        assert!(app.wpm.has_session());

        app.open_exercise(1);
        assert_eq!(app.screen, AppScreen::Typing);
        assert!(!app.wpm.has_session());
        assert_eq!(app.settings.last_exercise_id.as_deref(), Some("practice-1"));

        let reloaded = JsonStore::with_base_dir(dir.path().to_path_buf())
            .unwrap()
            .load_settings();
        assert_eq!(reloaded.last_exercise_id.as_deref(), Some("practice-1"));
    }

    #[test]
    fn finishing_records_result() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let text_index = app.catalog.letter_count();
        app.open_exercise(text_index);
        type_all(&mut app, Instant::now());
        assert_eq!(app.screen, AppScreen::Result);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.exercise_id, format!("text-{text_index}"));
        assert!((result.accuracy - 100.0).abs() < 1e-9);
        assert!(result.wpm > 0);
        assert_eq!(app.history.results.len(), 1);
    }

    #[test]
    fn qwerty_input_is_translated() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.config.keyboard_input = KeyboardInput::Qwerty;
        app.open_exercise(0);
        let expected = app.typing.as_ref().unwrap().expected().unwrap();
        let latin = app.layout.latin_for(expected).unwrap();
        app.type_char(latin, Instant::now());
        assert_eq!(app.typing.as_ref().unwrap().correct_count(), 1);
    }

    #[test]
    fn continue_with_stale_id_stays_on_list() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.settings.last_exercise_id = Some("practice-999".to_string());
        app.continue_last();
        assert_eq!(app.screen, AppScreen::ExerciseList);
        assert!(app.catalog.current().is_none());
        assert!(app.status.is_some());
    }

    #[test]
    fn regenerate_keeps_free_text_attempt() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.open_exercise(app.catalog.letter_count());
        let t0 = Instant::now();
        let first = app.typing.as_ref().unwrap().expected().unwrap();
        app.type_char(first, t0);
        app.regenerate();
        assert_eq!(app.typing.as_ref().unwrap().cursor, 1);
        assert!(app.wpm.has_session());
    }

    #[test]
    fn speaking_settles_on_tick() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.open_exercise(0);
        app.speak_current_line();
        app.tick(Instant::now());
        assert!(app.pending_speech.is_none());
        assert!(app.status.is_none());
    }

    #[test]
    fn switching_exercise_silences_speech() {
        let dir = TempDir::new().unwrap();
        let silent = Silent::default();
        let mut app = app_with(&dir, silent.clone());
        app.open_exercise(0);
        app.speak_current_line();
        assert!(app.pending_speech.is_some());
        assert_eq!(silent.stops.load(Ordering::SeqCst), 0);

        app.open_exercise(1);
        assert_eq!(silent.stops.load(Ordering::SeqCst), 1);
        assert!(app.pending_speech.is_none());
    }

    #[test]
    fn toggled_speed_is_written_to_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        Config {
            theme: "light".to_string(),
            ..Config::default()
        }
        .save_to(&path)
        .unwrap();

        let mut app = app(&dir).with_config_path(path.clone());
        app.config.keyboard_input = KeyboardInput::Qwerty;
        app.toggle_speed();
        assert_eq!(app.config.speech_speed, SpeechSpeed::Slow);

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.speech_speed, SpeechSpeed::Slow);
        assert_eq!(saved.theme, "light");
        assert_eq!(saved.keyboard_input, KeyboardInput::Hebrew);

        app.toggle_speed();
        assert_eq!(Config::load_from(&path).unwrap().speech_speed, SpeechSpeed::Normal);
    }
}
