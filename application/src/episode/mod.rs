//! Episode runtime: participants, their model adapters, and the turn engine.

pub mod engine;
pub mod model_adapter;
pub mod participant;

pub use engine::{
    Episode, EpisodeError, EpisodeOptions, ResponseOutcome, StepInfo, StepOutcome, StepResult,
};
pub use model_adapter::ModelAdapter;
pub use participant::Participant;
