//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod episode;
mod logging;
mod providers;

pub use episode::FileEpisodeConfig;
pub use logging::{FileCatalogConfig, FileLoggingConfig};
pub use providers::{FileBedrockConfig, FileOpenAiConfig, FileProvidersConfig};

use arena_domain::{DomainError, EpisodeSpec, ParticipantSpec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("no participants configured (add [[participants]] entries)")]
    NoParticipants,

    #[error("episode needs either `episode.transit` or `episode.rounds` with two participants")]
    MissingTransit,

    #[error("episode.word_limit cannot be 0")]
    InvalidWordLimit,

    #[error("participant {0}: timeout_seconds cannot be 0")]
    InvalidTimeout(String),

    #[error("participant {0}: model name cannot be empty")]
    EmptyModelName(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Turn order and prompt settings
    pub episode: FileEpisodeConfig,
    /// `[[participants]]` tables, in declaration order
    pub participants: Vec<ParticipantSpec>,
    /// Provider credentials and endpoints
    pub providers: FileProvidersConfig,
    /// Log output locations
    pub logging: FileLoggingConfig,
    /// Technique catalog source
    pub catalog: FileCatalogConfig,
}

impl FileConfig {
    /// Check the settings that can be checked without a catalog or network.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.participants.is_empty() {
            return Err(ConfigValidationError::NoParticipants);
        }
        if self.episode.word_limit == 0 {
            return Err(ConfigValidationError::InvalidWordLimit);
        }
        for participant in &self.participants {
            if participant.generation.timeout_seconds == Some(0) {
                return Err(ConfigValidationError::InvalidTimeout(
                    participant.name.clone(),
                ));
            }
            if !participant.backend.is_human()
                && participant.backend.model_label().trim().is_empty()
            {
                return Err(ConfigValidationError::EmptyModelName(
                    participant.name.clone(),
                ));
            }
        }
        Ok(())
    }

    /// Assemble the episode description.
    pub fn to_episode_spec(&self) -> Result<EpisodeSpec, ConfigValidationError> {
        self.validate()?;
        let transit = self
            .episode
            .transit_script(&self.participants)
            .ok_or(ConfigValidationError::MissingTransit)??;

        let mut spec = EpisodeSpec::new(self.participants.clone(), transit)
            .with_persuasion(self.episode.persuasion)
            .with_word_limit(self.episode.word_limit);
        spec.scenario = self.episode.scenario;
        if let Some(message) = self.episode.init_message() {
            spec = spec.with_init_message(message);
        }
        spec.validate()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_domain::{BackendSpec, ScenarioKind, TechniqueSelector};

    const FULL_CONFIG: &str = r#"
[episode]
rounds = 3
init_message = "Hello, how are you?"
persuasion = true
word_limit = 80
scenario = "donation"

[[participants]]
name = "therapist"
role = "assistant"
system = "You are a friendly persuader."
backend = { provider = "openai", model = "GPT-4o-mini" }
strategy = { name = "therapy", technique = "random" }
generation = { temperature = 0.9, stream = true }

[[participants]]
name = "donor"
role = "user"
backend = { provider = "human" }
strategy = { name = "human" }
external_id = "P-017"
persona = { age = "34", occupation = "teacher" }

[providers.bedrock]
region = "us-west-2"

[logging]
dir = "runs"
"#;

    #[test]
    fn test_deserialize_full_config() {
        let config: FileConfig = toml::from_str(FULL_CONFIG).unwrap();
        assert_eq!(config.participants.len(), 2);
        let therapist = &config.participants[0];
        assert_eq!(therapist.backend, BackendSpec::openai("GPT-4o-mini"));
        assert_eq!(therapist.strategy.technique, TechniqueSelector::Random);
        assert!(therapist.generation.stream);
        assert_eq!(therapist.generation.max_tokens, 400);
        let donor = &config.participants[1];
        assert!(donor.backend.is_human());
        assert_eq!(donor.external_id.as_deref(), Some("P-017"));
        assert_eq!(donor.persona.get("occupation").map(String::as_str), Some("teacher"));
        assert_eq!(config.providers.bedrock.region, "us-west-2");
        assert_eq!(config.logging.dir, std::path::PathBuf::from("runs"));
        assert!(config.logging.transcript);
    }

    #[test]
    fn test_to_episode_spec() {
        let config: FileConfig = toml::from_str(FULL_CONFIG).unwrap();
        let spec = config.to_episode_spec().unwrap();
        assert_eq!(spec.init_message.as_deref(), Some("Hello, how are you?"));
        assert!(spec.persuasion);
        assert_eq!(spec.word_limit, 80);
        assert_eq!(spec.scenario, ScenarioKind::Donation);
        let slots: Vec<&str> = spec.transit.iter().collect();
        assert_eq!(slots, vec!["donor", "therapist", "donor", "therapist", "donor"]);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.participants.is_empty());
        assert_eq!(config.episode.word_limit, 100);
        assert!(config.catalog.path.is_none());
        assert_eq!(config.validate(), Err(ConfigValidationError::NoParticipants));
    }

    #[test]
    fn test_missing_transit() {
        let mut config: FileConfig = toml::from_str(FULL_CONFIG).unwrap();
        config.episode.rounds = None;
        assert_eq!(
            config.to_episode_spec().unwrap_err(),
            ConfigValidationError::MissingTransit
        );
    }

    #[test]
    fn test_transit_names_must_be_declared() {
        let mut config: FileConfig = toml::from_str(FULL_CONFIG).unwrap();
        config.episode.transit = vec!["therapist".to_string(), "stranger".to_string()];
        assert_eq!(
            config.to_episode_spec().unwrap_err(),
            ConfigValidationError::Domain(DomainError::UnknownParticipant(
                "stranger".to_string()
            ))
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config: FileConfig = toml::from_str(FULL_CONFIG).unwrap();
        config.participants[0].generation.timeout_seconds = Some(0);
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout("therapist".to_string()))
        );
    }

    #[test]
    fn test_empty_model_name_is_rejected() {
        let mut config: FileConfig = toml::from_str(FULL_CONFIG).unwrap();
        config.participants[0].backend = BackendSpec::bedrock(" ");
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelName(_))
        ));
    }
}
