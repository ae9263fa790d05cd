//! Per-episode log directories and the plain-text transcript.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const TRANSCRIPT_FILE: &str = "interaction.log";

#[derive(Debug, Error)]
#[error("Could not write episode log {path}: {source}")]
pub struct TranscriptError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// `<root>/<unix-millis>/` holding one episode's logs.
#[derive(Debug, Clone)]
pub struct EpisodeLogDir {
    path: PathBuf,
}

impl EpisodeLogDir {
    /// Create a fresh directory named after the current time in milliseconds.
    ///
    /// A numeric suffix is appended if two episodes start in the same
    /// millisecond.
    pub fn create(root: impl AsRef<Path>) -> Result<Self, TranscriptError> {
        let root = root.as_ref();
        let stamp = chrono::Utc::now().timestamp_millis();
        let mut path = root.join(stamp.to_string());
        let mut suffix = 1;
        while path.exists() {
            path = root.join(format!("{}-{}", stamp, suffix));
            suffix += 1;
        }
        fs::create_dir_all(&path).map_err(|source| TranscriptError {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn transcript_path(&self) -> PathBuf {
        self.path.join(TRANSCRIPT_FILE)
    }

    /// Write the rendered episode log to `interaction.log`.
    pub fn write_transcript(&self, rendered: &str) -> Result<PathBuf, TranscriptError> {
        let path = self.transcript_path();
        fs::write(&path, rendered).map_err(|source| TranscriptError {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Episode transcript written");
        Ok(path)
    }
}
