//! AWS Bedrock Converse API provider
//!
//! Provides access to Claude, Cohere, Llama and Mistral models via AWS IAM
//! authentication. The model table is always compiled; the SDK-backed
//! gateway requires the `bedrock` feature.

pub mod model_map;

#[cfg(feature = "bedrock")]
mod gateway;
#[cfg(feature = "bedrock")]
mod types;

#[cfg(feature = "bedrock")]
pub use gateway::BedrockGateway;
