//! OpenAI chat-completions gateway

use arena_application::ports::llm_gateway::{GatewayError, LlmGateway, StreamHandle};
use arena_domain::{GenerationParams, Message, Role, StreamEvent};
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

/// Capacity of the fragment channel
const STREAM_BUFFER: usize = 32;

/// One participant's connection to the chat-completions API.
pub struct OpenAiGateway {
    client: Client<OpenAIConfig>,
    model_id: String,
    label: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGateway {
    pub fn new(
        client: Client<OpenAIConfig>,
        model_id: impl Into<String>,
        params: &GenerationParams,
    ) -> Self {
        let model_id = model_id.into();
        Self {
            client,
            label: format!("openai:{}", model_id),
            model_id,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn build_request(
        &self,
        messages: &[Message],
    ) -> Result<CreateChatCompletionRequest, GatewayError> {
        let messages = messages
            .iter()
            .map(convert_message)
            .collect::<Result<Vec<_>, _>>()
            .map_err(convert_error)?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_id)
            .messages(messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(convert_error)
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn name(&self) -> &str {
        &self.label
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, GatewayError> {
        let request = self.build_request(messages)?;
        debug!(model = %self.model_id, messages = messages.len(), "OpenAI chat request");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(convert_error)?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        Ok(text)
    }

    async fn chat_stream(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        let request = self.build_request(messages)?;
        debug!(model = %self.model_id, messages = messages.len(), "OpenAI stream request");

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(convert_error)?;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(async move {
            let mut full_text = String::new();
            while let Some(item) = stream.next().await {
                let chunk = match item {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };
                for choice in chunk.choices {
                    if let Some(text) = choice.delta.content
                        && !text.is_empty()
                    {
                        full_text.push_str(&text);
                        if tx.send(StreamEvent::Delta(text)).await.is_err() {
                            // Receiver dropped
                            return;
                        }
                    }
                    if choice.finish_reason.is_some() {
                        let _ = tx.send(StreamEvent::Completed(full_text)).await;
                        return;
                    }
                }
            }
            // [DONE] without a finish reason
            let _ = tx.send(StreamEvent::Completed(full_text)).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

fn convert_message(message: &Message) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = message.content.as_str();
    Ok(match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    })
}

fn convert_error(err: OpenAIError) -> GatewayError {
    match err {
        OpenAIError::Reqwest(e) => GatewayError::ConnectionError(e.to_string()),
        OpenAIError::ApiError(e) => {
            GatewayError::RequestFailed(format!("OpenAI API error: {}", e.message))
        }
        OpenAIError::StreamError(e) => GatewayError::Stream(e),
        OpenAIError::InvalidArgument(e) => GatewayError::RequestFailed(e),
        other => GatewayError::Other(other.to_string()),
    }
}
