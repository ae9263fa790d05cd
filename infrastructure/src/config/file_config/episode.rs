//! Episode configuration from TOML (`[episode]` section)

use arena_domain::{DomainError, ParticipantSpec, ScenarioKind, TransitScript};
use serde::{Deserialize, Serialize};

/// Raw episode settings.
///
/// Either `transit` lists the turn order explicitly, or `rounds` builds an
/// alternating script for exactly two participants (the first one declared
/// opens).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEpisodeConfig {
    pub transit: Vec<String>,
    pub rounds: Option<usize>,
    pub init_message: Option<String>,
    pub persuasion: bool,
    pub word_limit: usize,
    pub scenario: ScenarioKind,
}

impl Default for FileEpisodeConfig {
    fn default() -> Self {
        Self {
            transit: Vec::new(),
            rounds: None,
            init_message: None,
            persuasion: false,
            word_limit: 100,
            scenario: ScenarioKind::default(),
        }
    }
}

impl FileEpisodeConfig {
    /// Initial message, with blank strings treated as unset
    pub fn init_message(&self) -> Option<&str> {
        self.init_message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }

    /// Build the transit script, or `None` when neither form applies.
    pub fn transit_script(
        &self,
        participants: &[ParticipantSpec],
    ) -> Option<Result<TransitScript, DomainError>> {
        if !self.transit.is_empty() {
            return Some(TransitScript::new(self.transit.clone()));
        }
        match (self.rounds, participants) {
            (Some(rounds), [opener, responder]) => Some(TransitScript::alternating(
                &opener.name,
                &responder.name,
                rounds,
                self.init_message().is_some(),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_domain::{BackendSpec, ParticipantRole, StrategySpec};

    fn pair() -> Vec<ParticipantSpec> {
        vec![
            ParticipantSpec::new(
                "therapist",
                ParticipantRole::Assistant,
                BackendSpec::openai("GPT-4o-mini"),
                StrategySpec::therapy(Default::default()),
            ),
            ParticipantSpec::new(
                "donor",
                ParticipantRole::User,
                BackendSpec::Human,
                StrategySpec::human(),
            ),
        ]
    }

    #[test]
    fn test_explicit_transit_wins() {
        let config = FileEpisodeConfig {
            transit: vec!["donor".to_string()],
            rounds: Some(3),
            ..FileEpisodeConfig::default()
        };
        let transit = config.transit_script(&pair()).unwrap().unwrap();
        assert_eq!(transit.len(), 1);
    }

    #[test]
    fn test_rounds_build_alternating_script() {
        let config = FileEpisodeConfig {
            rounds: Some(2),
            init_message: Some("Hello, how are you?".to_string()),
            ..FileEpisodeConfig::default()
        };
        let transit = config.transit_script(&pair()).unwrap().unwrap();
        let slots: Vec<&str> = transit.iter().collect();
        assert_eq!(slots, vec!["donor", "therapist", "donor"]);
    }

    #[test]
    fn test_rounds_need_two_participants() {
        let config = FileEpisodeConfig {
            rounds: Some(2),
            ..FileEpisodeConfig::default()
        };
        assert!(config.transit_script(&pair()[..1]).is_none());
        assert!(FileEpisodeConfig::default().transit_script(&pair()).is_none());
    }

    #[test]
    fn test_blank_init_message_is_unset() {
        let config = FileEpisodeConfig {
            init_message: Some("  ".to_string()),
            ..FileEpisodeConfig::default()
        };
        assert!(config.init_message().is_none());
    }
}
