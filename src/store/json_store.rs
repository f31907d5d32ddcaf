use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, warn};

use crate::store::schema::{HistoryData, Settings};

const SETTINGS_FILE: &str = "settings.json";
const HISTORY_FILE: &str = "history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("otiyot");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Writes to a sibling temp file and renames it into place, so a crash
    /// mid-write never leaves a truncated file behind.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    /// Missing file gives defaults; an unreadable or malformed one is logged
    /// and also gives defaults.
    pub fn load_settings(&self) -> Settings {
        let path = self.file_path(SETTINGS_FILE);
        if !path.exists() {
            return Settings::default();
        }
        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));
        match parsed {
            Ok(settings) => settings,
            Err(err) => {
                error!(path = %path.display(), error = %err, "settings unreadable, using defaults");
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save(SETTINGS_FILE, settings)
    }

    pub fn load_history(&self) -> HistoryData {
        let path = self.file_path(HISTORY_FILE);
        if !path.exists() {
            return HistoryData::default();
        }
        match fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
        {
            Some(history) => history,
            None => {
                warn!(path = %path.display(), "history unreadable, starting fresh");
                HistoryData::default()
            }
        }
    }

    pub fn save_history(&self, history: &HistoryData) -> Result<()> {
        self.save(HISTORY_FILE, history)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::session::result::ExerciseResult;
    use crate::store::schema::HISTORY_LIMIT;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn result(id: &str, wpm: u32) -> ExerciseResult {
        ExerciseResult {
            exercise_id: id.to_string(),
            label: id.to_string(),
            wpm,
            accuracy: 100.0,
            correct: 10,
            total_chars: 10,
            elapsed_secs: 5.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn missing_settings_use_defaults() {
        let (_dir, store) = make_test_store();
        let settings = store.load_settings();
        assert!(settings.show_keyboard);
        assert!(settings.practice_mode);
        assert!(settings.last_exercise_id.is_none());
    }

    #[test]
    fn settings_persist_with_camel_case_keys() {
        let (_dir, store) = make_test_store();
        let settings = Settings {
            show_keyboard: false,
            practice_mode: true,
            last_exercise_id: Some("review-3".to_string()),
        };
        store.save_settings(&settings).unwrap();

        let raw = fs::read_to_string(store.file_path(SETTINGS_FILE)).unwrap();
        assert!(raw.contains("\"showKeyboard\": false"));
        assert!(raw.contains("\"lastExerciseId\": \"review-3\""));
        assert_eq!(store.load_settings(), settings);
    }

    #[test]
    fn malformed_settings_fall_back_to_defaults() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(SETTINGS_FILE), "{ not json").unwrap();
        assert_eq!(store.load_settings(), Settings::default());
    }

    #[test]
    fn partial_settings_fill_missing_keys() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(SETTINGS_FILE), r#"{"practiceMode": false}"#).unwrap();
        let settings = store.load_settings();
        assert!(!settings.practice_mode);
        assert!(settings.show_keyboard);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let (dir, store) = make_test_store();
        store.save_settings(&Settings::default()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn history_round_trips_and_caps() {
        let (_dir, store) = make_test_store();
        let mut history = store.load_history();
        for i in 0..HISTORY_LIMIT + 5 {
            history.push(result(&format!("practice-{}", i % 3), i as u32));
        }
        assert_eq!(history.results.len(), HISTORY_LIMIT);
        assert_eq!(history.results[0].wpm, 5);
        store.save_history(&history).unwrap();

        let loaded = store.load_history();
        assert_eq!(loaded.results.len(), HISTORY_LIMIT);
        assert_eq!(loaded.best_wpm("practice-1"), Some(502));
        assert_eq!(loaded.best_wpm("text-30"), None);
    }

    #[test]
    fn malformed_history_starts_fresh() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(HISTORY_FILE), "[1, 2").unwrap();
        assert!(store.load_history().results.is_empty());
    }
}
