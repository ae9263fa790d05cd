//! Human input port.
//!
//! The episode engine never waits for a person. When a human-operated
//! participant is due, it returns `AwaitingInput` and the caller fetches the
//! text through this port before stepping again.
//!
//! - **Port**: [`HumanInputPort`] - defined here in application layer
//! - **Adapter**: `StdinHumanInput` - implemented in presentation layer

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HumanInputError {
    /// The operator ended input (e.g. EOF or Ctrl+C)
    #[error("Input cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    IoError(String),
}

/// Port for collecting a human participant's reply.
#[async_trait]
pub trait HumanInputPort: Send + Sync {
    /// Ask `participant` to answer `previous_message` ("" on the first turn).
    async fn request_input(
        &self,
        participant: &str,
        previous_message: &str,
    ) -> Result<String, HumanInputError>;
}
