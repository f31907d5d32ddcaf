use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::speech::backend::ClipStore;
use crate::speech::error::SpeechError;

/// Clips under a local directory; `/audio/x.mp3` resolves to
/// `<root>/audio/x.mp3`.
pub struct DirClipStore {
    root: PathBuf,
}

impl DirClipStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, clip_path: &str) -> PathBuf {
        self.root.join(clip_path.trim_start_matches('/'))
    }
}

impl ClipStore for DirClipStore {
    fn locate(&self, clip_path: &str) -> String {
        self.resolve(clip_path).to_string_lossy().into_owned()
    }

    fn probe(&self, clip_path: &str) -> Result<bool, SpeechError> {
        match fs::metadata(self.resolve(clip_path)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(SpeechError::Probe {
                path: clip_path.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}

/// Clips served over HTTP, checked with a HEAD request.
#[cfg(feature = "network")]
pub struct HttpClipStore {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "network")]
impl HttpClipStore {
    pub fn new(base_url: &str) -> Result<Self, SpeechError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|err| SpeechError::Probe {
                path: base_url.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[cfg(feature = "network")]
impl ClipStore for HttpClipStore {
    fn locate(&self, clip_path: &str) -> String {
        format!("{}{clip_path}", self.base_url)
    }

    /// Any non-success status counts as absent; only transport errors are
    /// probe failures.
    fn probe(&self, clip_path: &str) -> Result<bool, SpeechError> {
        let url = self.locate(clip_path);
        let response = self.client.head(&url).send().map_err(|err| SpeechError::Probe {
            path: url.clone(),
            reason: err.to_string(),
        })?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn directory_probe_checks_existence() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("audio")).unwrap();
        fs::write(dir.path().join("audio/vocab-v001.mp3"), b"ID3").unwrap();

        let store = DirClipStore::new(dir.path());
        assert_eq!(store.probe("/audio/vocab-v001.mp3"), Ok(true));
        assert_eq!(store.probe("/audio/vocab-v002.mp3"), Ok(false));
        assert!(store.locate("/audio/vocab-v001.mp3").ends_with("audio/vocab-v001.mp3"));
    }

    #[test]
    fn directory_is_not_a_clip() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("audio/phrase-phrase-1.mp3")).unwrap();
        let store = DirClipStore::new(dir.path());
        assert_eq!(store.probe("/audio/phrase-phrase-1.mp3"), Ok(false));
    }

    #[cfg(feature = "network")]
    #[test]
    fn http_locate_joins_base_url() {
        let store = HttpClipStore::new("https://example.org/static/").unwrap();
        assert_eq!(
            store.locate("/audio/vocab-v001.mp3"),
            "https://example.org/static/audio/vocab-v001.mp3"
        );
    }
}
