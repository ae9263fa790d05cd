//! LLM Gateway port
//!
//! Defines the interface for communicating with language-model backends, and
//! the two shapes a reply can take: a materialized string or a stream of
//! fragments.

use arena_domain::{Message, StreamEvent};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Human-operated participant {0} has no model backend")]
    HumanInputRequired(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Whether the error was raised before any request was sent
    pub fn is_configuration(&self) -> bool {
        matches!(self, GatewayError::ModelNotAvailable(_))
    }
}

/// Gateway for LLM communication
///
/// One gateway serves one participant: it is bound to a single model and its
/// generation parameters when constructed. Implementations (adapters) live in
/// the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Label used in logs, e.g. `openai:gpt-4o-mini`
    fn name(&self) -> &str;

    /// Send the full transcript and wait for the complete reply
    async fn chat(&self, messages: &[Message]) -> Result<String, GatewayError>;

    /// Send the full transcript and receive the reply incrementally.
    ///
    /// Default implementation calls `chat()` and wraps the result in a single
    /// `Completed` event.
    async fn chat_stream(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        let text = self.chat(messages).await?;
        Ok(StreamHandle::from_text(text))
    }
}

/// Handle for receiving streaming events from a backend.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. The stream is finite and cannot be
/// restarted. Dropping the handle closes the channel, which stops the
/// producing task at its next send.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
    deadline: Option<Deadline>,
}

/// Point in time by which the whole stream must have ended
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    limit: Duration,
}

async fn next_event(
    rx: &mut mpsc::Receiver<StreamEvent>,
    deadline: Option<Deadline>,
) -> Result<Option<StreamEvent>, GatewayError> {
    match deadline {
        Some(d) => tokio::time::timeout_at(d.at, rx.recv())
            .await
            .map_err(|_| GatewayError::Timeout(d.limit.as_secs())),
        None => Ok(rx.recv().await),
    }
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self {
            receiver,
            deadline: None,
        }
    }

    /// A one-element stream holding `text`
    pub fn from_text(text: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // Capacity 1 and a fresh channel: this cannot fail
        let _ = tx.try_send(StreamEvent::Completed(text.into()));
        Self::new(rx)
    }

    /// Fail with [`GatewayError::Timeout`] if the stream has not ended by
    /// `started + limit`.
    pub fn with_deadline(mut self, started: Instant, limit: Duration) -> Self {
        self.deadline = Some(Deadline {
            at: started + limit,
            limit,
        });
        self
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = next_event(&mut self.receiver, self.deadline).await? {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::Stream(e));
                }
            }
        }
        // Channel closed without Completed: return what we have
        Ok(full_text)
    }

    /// Yield text fragments as they arrive.
    ///
    /// A `Completed` event contributes its text only when no deltas preceded
    /// it. The stream ends after the first terminal event or an expired
    /// deadline.
    pub fn into_fragments(self) -> BoxStream<'static, Result<String, GatewayError>> {
        stream::unfold(
            (self.receiver, self.deadline, false, false),
            |(mut rx, deadline, seen_delta, done)| async move {
                if done {
                    return None;
                }
                let event = match next_event(&mut rx, deadline).await {
                    Ok(event) => event?,
                    Err(e) => return Some((Err(e), (rx, deadline, seen_delta, true))),
                };
                match event {
                    StreamEvent::Delta(chunk) => Some((Ok(chunk), (rx, deadline, true, false))),
                    StreamEvent::Completed(text) => {
                        if seen_delta || text.is_empty() {
                            None
                        } else {
                            Some((Ok(text), (rx, deadline, true, true)))
                        }
                    }
                    StreamEvent::Error(e) => Some((
                        Err(GatewayError::Stream(e)),
                        (rx, deadline, seen_delta, true),
                    )),
                }
            },
        )
        .boxed()
    }

    /// Transform the text of every event on a forwarding task.
    ///
    /// The forwarder stops as soon as the returned handle is dropped, which in
    /// turn drops the source receiver. Any deadline carries over.
    pub fn map_text<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(32);
        let mut source = self.receiver;
        tokio::spawn(async move {
            while let Some(event) = source.recv().await {
                let terminal = event.is_terminal();
                if tx.send(event.map_text(&f)).await.is_err() || terminal {
                    break;
                }
            }
        });
        Self {
            receiver: rx,
            deadline: self.deadline,
        }
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// A participant's reply, either materialized or streamed.
#[derive(Debug)]
pub enum ChatResponse {
    Text(String),
    Stream(StreamHandle),
}

impl ChatResponse {
    pub fn is_stream(&self) -> bool {
        matches!(self, ChatResponse::Stream(_))
    }

    /// Materialize the full reply text
    pub async fn into_text(self) -> Result<String, GatewayError> {
        match self {
            ChatResponse::Text(text) => Ok(text),
            ChatResponse::Stream(handle) => handle.collect_text().await,
        }
    }

    /// Iterate the reply as fragments; a text reply is a single fragment
    pub fn into_fragments(self) -> BoxStream<'static, Result<String, GatewayError>> {
        match self {
            ChatResponse::Text(text) => stream::once(async move { Ok(text) }).boxed(),
            ChatResponse::Stream(handle) => handle.into_fragments(),
        }
    }
}

impl From<String> for ChatResponse {
    fn from(text: String) -> Self {
        ChatResponse::Text(text)
    }
}
