//! Human passthrough backend
//!
//! Human turns are answered through the `HumanInputPort`, never through a
//! gateway. This stub exists so every participant owns an adapter; reaching
//! it is a wiring error.

use arena_application::ports::llm_gateway::{GatewayError, LlmGateway, StreamHandle};
use arena_domain::Message;
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct HumanGateway;

#[async_trait]
impl LlmGateway for HumanGateway {
    fn name(&self) -> &str {
        "human"
    }

    async fn chat(&self, _messages: &[Message]) -> Result<String, GatewayError> {
        Err(GatewayError::HumanInputRequired(self.name().to_string()))
    }

    async fn chat_stream(&self, _messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        Err(GatewayError::HumanInputRequired(self.name().to_string()))
    }
}
