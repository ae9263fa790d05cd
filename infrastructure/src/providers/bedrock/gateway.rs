//! Bedrock Converse gateway
//!
//! One capability serves every Bedrock family (Claude, Cohere, Llama,
//! Mistral); the Converse API normalizes their request formats.

use super::model_map;
use super::types;
use arena_application::ports::llm_gateway::{GatewayError, LlmGateway, StreamHandle};
use arena_domain::{GenerationParams, Message, StreamEvent};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types as bedrock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

const STREAM_BUFFER: usize = 32;

pub struct BedrockGateway {
    client: Arc<BedrockClient>,
    model_id: String,
    label: String,
    temperature: f32,
    max_tokens: i32,
    system_supported: bool,
}

impl BedrockGateway {
    pub fn new(
        client: Arc<BedrockClient>,
        model_id: impl Into<String>,
        params: &GenerationParams,
    ) -> Self {
        let model_id = model_id.into();
        Self {
            client,
            label: format!("bedrock:{}", model_id),
            system_supported: model_map::supports_system_prompt(&model_id),
            model_id,
            temperature: params.temperature,
            max_tokens: i32::try_from(params.max_tokens).unwrap_or(i32::MAX),
        }
    }

    fn inference_config(&self) -> bedrock::InferenceConfiguration {
        bedrock::InferenceConfiguration::builder()
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
    }
}

#[async_trait]
impl LlmGateway for BedrockGateway {
    fn name(&self) -> &str {
        &self.label
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, GatewayError> {
        let input = types::to_converse_input(messages, self.system_supported)?;
        debug!(
            model = %self.model_id,
            messages = input.messages.len(),
            "Bedrock converse request"
        );

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .set_system((!input.system.is_empty()).then_some(input.system))
            .set_messages(Some(input.messages))
            .inference_config(self.inference_config())
            .send()
            .await
            .map_err(|e| types::convert_converse_error(&e))?;

        Ok(types::output_text(response.output()))
    }

    async fn chat_stream(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        let input = types::to_converse_input(messages, self.system_supported)?;
        debug!(
            model = %self.model_id,
            messages = input.messages.len(),
            "Bedrock converse stream request"
        );

        let mut output = self
            .client
            .converse_stream()
            .model_id(&self.model_id)
            .set_system((!input.system.is_empty()).then_some(input.system))
            .set_messages(Some(input.messages))
            .inference_config(self.inference_config())
            .send()
            .await
            .map_err(|e| types::convert_converse_stream_error(&e))?;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(async move {
            let mut full_text = String::new();
            loop {
                match output.stream.recv().await {
                    Ok(Some(bedrock::ConverseStreamOutput::ContentBlockDelta(event))) => {
                        if let Some(bedrock::ContentBlockDelta::Text(text)) = event.delta() {
                            full_text.push_str(text);
                            if tx.send(StreamEvent::Delta(text.clone())).await.is_err() {
                                return;
                            }
                        }
                    }
                    Ok(Some(bedrock::ConverseStreamOutput::MessageStop(_))) | Ok(None) => {
                        let _ = tx.send(StreamEvent::Completed(full_text)).await;
                        return;
                    }
                    Ok(Some(_)) => {}
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                }
            }
        });

        Ok(StreamHandle::new(rx))
    }
}
