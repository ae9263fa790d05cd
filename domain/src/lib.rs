//! Domain layer for dialogue-arena
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Episode
//!
//! An episode is one scripted dialogue between participants. The
//! [`TransitScript`] fixes the turn order and bounds its length; every turn
//! appends a [`TurnRecord`] to the [`History`], whose first entry is a
//! settings snapshot.
//!
//! ## Strategies and techniques
//!
//! Each participant owns an [`ActionStrategy`]. Catalog-driven strategies
//! render directive prompts and may offer techniques from the
//! [`TechniqueCatalog`]; the human strategy yields [`Action::HumanInput`].
//!
//! ## Termination
//!
//! A [`TerminationDetector`] inspects the history after each turn and decides
//! whether the scenario's objective has been reached.

pub mod action;
pub mod catalog;
pub mod core;
pub mod episode;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use action::{
    Action, ActionContext, ActionStrategy, StrategySpec, TaggedResponse, extract_tagged_response,
};
pub use catalog::{Technique, TechniqueCatalog, TechniqueSelector};
pub use core::{
    error::DomainError,
    escape::{escape, unescape},
    string::preview,
};
pub use episode::{
    EpisodeSpec,
    history::{History, HistoryEntry, PlayerSettings, SettingsSnapshot, TurnRecord},
    participant::{BackendSpec, GenerationParams, ParticipantRole, ParticipantSpec},
    render::render_transcript,
    termination::{DonationDetector, ScenarioKind, Termination, TerminationDetector},
    transit::TransitScript,
};
pub use prompt::PromptTemplate;
pub use session::{
    entities::{Message, Role, Transcript},
    stream::StreamEvent,
};
