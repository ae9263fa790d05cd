//! Episode log writers.
//!
//! [`JsonlConversationLogger`] implements the
//! [`ConversationLogger`](arena_application::ConversationLogger) port;
//! [`EpisodeLogDir`] owns the per-episode folder and writes the plain-text
//! transcript.

mod jsonl_logger;
mod transcript;

pub use jsonl_logger::{CONVERSATION_LOG_FILE, JsonlConversationLogger};
pub use transcript::{EpisodeLogDir, TRANSCRIPT_FILE, TranscriptError};
