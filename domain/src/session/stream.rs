//! Streaming events for model responses.
//!
//! [`StreamEvent`] represents individual events in a streaming response,
//! bridging provider-level chunks (SSE deltas, Bedrock content block deltas)
//! to the application layer.

/// An event in a streaming model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming (signals stream end).
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta or Completed event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Completed(s) => Some(s),
            StreamEvent::Error(_) => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_) | StreamEvent::Error(_))
    }

    /// Apply a text transformation to the payload of Delta and Completed events.
    pub fn map_text(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            StreamEvent::Delta(s) => StreamEvent::Delta(f(&s)),
            StreamEvent::Completed(s) => StreamEvent::Completed(f(&s)),
            other => other,
        }
    }
}
