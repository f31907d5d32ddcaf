use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::speech::SpeechSpeed;

const MIN_INTERVAL_MS: u64 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardInput {
    /// The OS layout already produces Hebrew letters.
    #[default]
    Hebrew,
    /// Latin keys are translated through the Hebrew layout.
    Qwerty,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub speech_speed: SpeechSpeed,
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,
    #[serde(default)]
    pub audio_base_url: Option<String>,
    #[serde(default = "default_clip_player")]
    pub clip_player: Vec<String>,
    #[serde(default = "default_synth_command")]
    pub synth_command: Vec<String>,
    #[serde(default = "default_wpm_refresh_ms")]
    pub wpm_refresh_ms: u64,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default)]
    pub keyboard_input: KeyboardInput,
}

fn default_theme() -> String {
    "default".to_string()
}
fn default_audio_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("otiyot")
        .to_string_lossy()
        .to_string()
}
fn default_clip_player() -> Vec<String> {
    ["mpv", "--no-video", "--really-quiet", "--speed={rate}", "{path}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_synth_command() -> Vec<String> {
    ["espeak-ng", "-v", "he", "-s", "{wpm}", "-a", "{volume}", "{text}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_wpm_refresh_ms() -> u64 {
    800
}
fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            speech_speed: SpeechSpeed::default(),
            audio_dir: default_audio_dir(),
            audio_base_url: None,
            clip_player: default_clip_player(),
            synth_command: default_synth_command(),
            wpm_refresh_ms: default_wpm_refresh_ms(),
            tick_rate_ms: default_tick_rate_ms(),
            keyboard_input: KeyboardInput::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("otiyot")
    }

    /// Clamps timing fields and restores empty command templates. Call after
    /// deserialization so hand-edited files cannot stall the event loop.
    pub fn normalize(&mut self) {
        self.wpm_refresh_ms = self.wpm_refresh_ms.max(MIN_INTERVAL_MS);
        self.tick_rate_ms = self.tick_rate_ms.max(MIN_INTERVAL_MS);
        if self.clip_player.is_empty() {
            self.clip_player = default_clip_player();
        }
        if self.synth_command.is_empty() {
            self.synth_command = default_synth_command();
        }
        if self
            .audio_base_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.audio_base_url = None;
        }
    }
}
