use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "OTIYOT_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

pub enum LogTarget {
    /// The terminal UI owns the screen, so logs go to a file.
    File(PathBuf),
    Stderr,
}

pub fn default_log_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("otiyot")
        .join("otiyot.log")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn open_log(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Installs the global subscriber. A second call keeps the first one and
/// leaves a debug line through it.
pub fn init(target: LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(false);
    let installed = match target {
        LogTarget::File(path) => {
            let file = open_log(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
    };
    if let Err(err) = installed {
        debug!(error = %err, "log subscriber already installed");
    }
    Ok(())
}
