//! Episode domain: who takes part, in what order, and what happened.
//!
//! - [`participant`] - participant configuration (role, backend, strategy, persona)
//! - [`transit`] - fixed turn order bounding the episode
//! - [`history`] - settings snapshot followed by append-only turn records
//! - [`termination`] - scenario end conditions and rewards
//! - [`render`] - plain-text transcript export

pub mod history;
pub mod participant;
pub mod render;
pub mod termination;
pub mod transit;

use crate::core::error::DomainError;
use participant::ParticipantSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use termination::ScenarioKind;
use transit::TransitScript;

fn default_word_limit() -> usize {
    100
}

/// Complete description of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSpec {
    pub participants: Vec<ParticipantSpec>,
    pub transit: TransitScript,
    /// Literal text spoken in slot 0 without a backend call
    #[serde(default)]
    pub init_message: Option<String>,
    /// Offer persuasion techniques and parse tagged replies
    #[serde(default)]
    pub persuasion: bool,
    #[serde(default = "default_word_limit")]
    pub word_limit: usize,
    #[serde(default)]
    pub scenario: ScenarioKind,
}

impl EpisodeSpec {
    pub fn new(participants: Vec<ParticipantSpec>, transit: TransitScript) -> Self {
        Self {
            participants,
            transit,
            init_message: None,
            persuasion: false,
            word_limit: default_word_limit(),
            scenario: ScenarioKind::default(),
        }
    }

    pub fn with_init_message(mut self, message: impl Into<String>) -> Self {
        self.init_message = Some(message.into());
        self
    }

    pub fn with_persuasion(mut self, enabled: bool) -> Self {
        self.persuasion = enabled;
        self
    }

    pub fn with_word_limit(mut self, limit: usize) -> Self {
        self.word_limit = limit;
        self
    }

    /// Check names and the transit script.
    ///
    /// Technique selectors are checked later, against the loaded catalog.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut declared = HashSet::new();
        for p in &self.participants {
            if !declared.insert(p.name.as_str()) {
                return Err(DomainError::DuplicateParticipant(p.name.clone()));
            }
        }
        self.transit.ensure_declared(&declared)
    }
}
