//! Output locations (`[logging]` and `[catalog]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Root directory for per-episode log folders
    pub dir: PathBuf,
    /// Write `interaction.log` after each episode
    pub transcript: bool,
    /// Write `conversation.jsonl` while the episode runs
    pub conversation_log: bool,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            transcript: true,
            conversation_log: true,
        }
    }
}

/// Technique catalog source. The embedded taxonomy is used when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    pub path: Option<PathBuf>,
}
