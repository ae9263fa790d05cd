//! Application layer for dialogue-arena
//!
//! This crate contains the episode engine, use cases, and port definitions.
//! It depends only on the domain layer.

pub mod episode;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use episode::{
    Episode, EpisodeError, EpisodeOptions, ModelAdapter, Participant, ResponseOutcome, StepInfo,
    StepOutcome, StepResult,
};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    human_input::{HumanInputError, HumanInputPort},
    llm_gateway::{ChatResponse, GatewayError, LlmGateway, StreamHandle},
    model_provider::ModelProvider,
    progress::{EpisodeProgress, NoProgress},
};
pub use use_cases::run_episode::{
    RunEpisodeError, RunEpisodeInput, RunEpisodeOutput, RunEpisodeUseCase,
};
