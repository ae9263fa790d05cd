//! Model provider port
//!
//! Resolves a participant's [`BackendSpec`] into a ready gateway. Resolution
//! happens once, while the episode is being assembled.

use super::llm_gateway::{GatewayError, LlmGateway};
use arena_domain::{BackendSpec, GenerationParams};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Build a gateway for `backend`.
    ///
    /// Unknown model identifiers fail with [`GatewayError::ModelNotAvailable`].
    async fn connect(
        &self,
        backend: &BackendSpec,
        params: &GenerationParams,
    ) -> Result<Arc<dyn LlmGateway>, GatewayError>;
}
