//! Participant configuration value objects

use crate::action::StrategySpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Conversational role of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// The offering side (therapist, solicitor)
    #[default]
    Assistant,
    /// The recipient side (patient, donor)
    User,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Assistant => "assistant",
            ParticipantRole::User => "user",
        }
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which backend answers for a participant.
///
/// ```toml
/// backend = { provider = "openai", model = "GPT-4o-mini" }
/// backend = { provider = "bedrock", model = "Claude 3 Haiku" }
/// backend = { provider = "human" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum BackendSpec {
    Openai { model: String },
    Bedrock { model: String },
    Human,
}

impl BackendSpec {
    pub fn openai(model: impl Into<String>) -> Self {
        BackendSpec::Openai {
            model: model.into(),
        }
    }

    pub fn bedrock(model: impl Into<String>) -> Self {
        BackendSpec::Bedrock {
            model: model.into(),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            BackendSpec::Openai { .. } => "openai",
            BackendSpec::Bedrock { .. } => "bedrock",
            BackendSpec::Human => "human",
        }
    }

    /// Model label as recorded in the settings snapshot
    pub fn model_label(&self) -> &str {
        match self {
            BackendSpec::Openai { model } | BackendSpec::Bedrock { model } => model,
            BackendSpec::Human => "human",
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, BackendSpec::Human)
    }
}

impl fmt::Display for BackendSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendSpec::Human => write!(f, "human"),
            other => write!(f, "{}:{}", other.provider_name(), other.model_label()),
        }
    }
}

/// Sampling parameters passed to a model backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Return responses as a fragment stream instead of one string
    pub stream: bool,
    /// Per-call timeout; no limit when unset
    pub timeout_seconds: Option<u64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 400,
            stream: false,
            timeout_seconds: None,
        }
    }
}

/// Everything needed to construct one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub name: String,
    #[serde(default)]
    pub role: ParticipantRole,
    pub backend: BackendSpec,
    /// System preamble; empty means none
    #[serde(default)]
    pub system: String,
    pub strategy: StrategySpec,
    #[serde(default)]
    pub persona: BTreeMap<String, String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub generation: GenerationParams,
}

impl ParticipantSpec {
    pub fn new(
        name: impl Into<String>,
        role: ParticipantRole,
        backend: BackendSpec,
        strategy: StrategySpec,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            backend,
            system: String::new(),
            strategy,
            persona: BTreeMap::new(),
            external_id: None,
            generation: GenerationParams::default(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    pub fn with_persona(mut self, persona: BTreeMap<String, String>) -> Self {
        self.persona = persona;
        self
    }

    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }
}
