//! OpenAI chat-completions provider
//!
//! The model table is always available so configs can be validated without
//! the `openai` feature; the network gateway is feature-gated.

pub mod model_map;

#[cfg(feature = "openai")]
mod gateway;

#[cfg(feature = "openai")]
pub use gateway::OpenAiGateway;
