//! JSONL file writer for episode events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying its `type`, a
//! `timestamp` and a per-file `seq` number next to the payload fields.

use arena_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// File name used inside an episode log directory
pub const CONVERSATION_LOG_FILE: &str = "conversation.jsonl";

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and
/// on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<(BufWriter<File>, u64)>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create a logger writing to `path`, creating parent directories.
    ///
    /// Returns `None` (after a warning) if the file cannot be created; an
    /// episode runs the same without a conversation log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                dir = %parent.display(),
                error = %e,
                "Could not create conversation log directory"
            );
            return None;
        }

        match File::create(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new((BufWriter::new(file), 0)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not create conversation log file"
                );
                None
            }
        }
    }

    /// Create `conversation.jsonl` inside an episode log directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Option<Self> {
        Self::new(dir.as_ref().join(CONVERSATION_LOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: ConversationEvent, seq: u64) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let mut map = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::from(event.event_type));
        map.insert("timestamp".to_string(), Value::from(timestamp));
        map.insert("seq".to_string(), Value::from(seq));
        Value::Object(map)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut guard) = self.writer.lock() else {
            return;
        };
        let (writer, seq) = &mut *guard;
        let Ok(line) = serde_json::to_string(&Self::record(event, *seq)) else {
            return;
        };
        *seq += 1;
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.writer.lock() {
            let _ = guard.0.flush();
        }
    }
}
