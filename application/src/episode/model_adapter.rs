//! Uniform wrapper around a participant's gateway.
//!
//! Every reply leaves the adapter escaped (`$` and `*` prefixed with a
//! backslash), whether it is materialized or streamed. Display code reverses
//! this with [`arena_domain::unescape`]. The timeout covers the whole call,
//! including the last fragment of a streamed reply.

use crate::ports::llm_gateway::{ChatResponse, GatewayError, LlmGateway};
use arena_domain::{GenerationParams, Message, escape};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Clone)]
pub struct ModelAdapter {
    gateway: Arc<dyn LlmGateway>,
    stream: bool,
    timeout: Option<Duration>,
}

impl ModelAdapter {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: &GenerationParams) -> Self {
        Self {
            gateway,
            stream: params.stream,
            timeout: params.timeout_seconds.map(Duration::from_secs),
        }
    }

    pub fn name(&self) -> &str {
        self.gateway.name()
    }

    pub fn is_streaming(&self) -> bool {
        self.stream
    }

    /// Send the transcript; the reply shape follows the stream flag.
    pub async fn chat(&self, messages: &[Message]) -> Result<ChatResponse, GatewayError> {
        debug!(
            gateway = self.gateway.name(),
            messages = messages.len(),
            stream = self.stream,
            "Calling model"
        );
        if self.stream {
            let started = Instant::now();
            let mut handle = self
                .with_timeout(self.gateway.chat_stream(messages))
                .await?
                .map_text(escape);
            if let Some(limit) = self.timeout {
                handle = handle.with_deadline(started, limit);
            }
            Ok(ChatResponse::Stream(handle))
        } else {
            let text = self.with_timeout(self.gateway.chat(messages)).await?;
            Ok(ChatResponse::Text(escape(&text)))
        }
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| GatewayError::Timeout(limit.as_secs()))?,
            None => fut.await,
        }
    }
}

impl std::fmt::Debug for ModelAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelAdapter")
            .field("gateway", &self.gateway.name())
            .field("stream", &self.stream)
            .field("timeout", &self.timeout)
            .finish()
    }
}
