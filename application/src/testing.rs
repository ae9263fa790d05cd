//! Scripted test doubles shared by the crate's unit tests.

use crate::ports::human_input::{HumanInputError, HumanInputPort};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, StreamHandle};
use arena_domain::{Message, StreamEvent};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Gateway that replies from a queue and records every request
pub(crate) struct ScriptedGateway {
    replies: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    failure: Option<String>,
    chunk_size: Option<usize>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedGateway {
    pub(crate) fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: None,
            failure: None,
            chunk_size: None,
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `reply`
    pub(crate) fn repeating(reply: &str) -> Self {
        let mut gateway = Self::new(Vec::<String>::new());
        gateway.fallback = Some(reply.to_string());
        gateway
    }

    pub(crate) fn failing(message: &str) -> Self {
        let mut gateway = Self::new(Vec::<String>::new());
        gateway.failure = Some(message.to_string());
        gateway
    }

    /// Stream replies as deltas of `size` characters
    pub(crate) fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size.max(1));
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Transcripts received, one per call
    pub(crate) fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(failure) = &self.failure {
            return Err(GatewayError::RequestFailed(failure.clone()));
        }
        let next = self.replies.lock().unwrap().pop_front();
        Ok(next
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| "(no more responses)".to_string()))
    }

    async fn chat_stream(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        let text = self.chat(messages).await?;
        let Some(size) = self.chunk_size else {
            return Ok(StreamHandle::from_text(text));
        };
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            let chars: Vec<char> = text.chars().collect();
            for chunk in chars.chunks(size) {
                let delta: String = chunk.iter().collect();
                if tx.send(StreamEvent::Delta(delta)).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(StreamEvent::Completed(text)).await;
        });
        Ok(StreamHandle::new(rx))
    }
}

/// Human input source that replays fixed answers
pub(crate) struct ScriptedHumanInput {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedHumanInput {
    pub(crate) fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// `(participant, previous_message)` pairs received
    pub(crate) fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl HumanInputPort for ScriptedHumanInput {
    async fn request_input(
        &self,
        participant: &str,
        previous_message: &str,
    ) -> Result<String, HumanInputError> {
        self.prompts
            .lock()
            .unwrap()
            .push((participant.to_string(), previous_message.to_string()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(HumanInputError::Cancelled)
    }
}
