//! Append-only turn history

use super::participant::ParticipantRole;
use super::termination::{Termination, TerminationDetector};
use serde::{Deserialize, Serialize};

/// Per-participant configuration recorded before the first turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub players: Vec<PlayerSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub player: String,
    pub model: String,
    pub action: String,
    pub external_id: Option<String>,
}

/// One completed turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub iteration: usize,
    pub speaker: String,
    pub speaker_role: ParticipantRole,
    pub response: String,
    pub reward: Option<u64>,
    pub terminated: bool,
    pub truncated: bool,
    /// Strategy descriptor of the speaker
    pub action: String,
    pub technique: Option<String>,
}

impl TurnRecord {
    pub fn is_terminal(&self) -> bool {
        self.terminated || self.truncated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    Settings(SettingsSnapshot),
    Turn(TurnRecord),
}

impl HistoryEntry {
    pub fn as_turn(&self) -> Option<&TurnRecord> {
        match self {
            HistoryEntry::Turn(t) => Some(t),
            HistoryEntry::Settings(_) => None,
        }
    }
}

/// Settings snapshot at index 0, then one record per turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new(settings: SettingsSnapshot) -> Self {
        Self {
            entries: vec![HistoryEntry::Settings(settings)],
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of entries, including the settings snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn settings(&self) -> Option<&SettingsSnapshot> {
        match self.entries.first() {
            Some(HistoryEntry::Settings(s)) => Some(s),
            _ => None,
        }
    }

    pub fn turns(&self) -> impl Iterator<Item = &TurnRecord> {
        self.entries.iter().filter_map(HistoryEntry::as_turn)
    }

    pub fn last_turn(&self) -> Option<&TurnRecord> {
        self.entries.last().and_then(HistoryEntry::as_turn)
    }

    /// Response of the most recent turn, or "" before the first turn
    pub fn previous_response(&self) -> &str {
        self.last_turn().map(|t| t.response.as_str()).unwrap_or("")
    }

    /// Settle a turn's outcome flags, then append it.
    ///
    /// The detector sees the history as it stood before this turn. The reward
    /// is kept only when the detector reports termination.
    pub fn record_turn(
        &mut self,
        mut record: TurnRecord,
        detector: &dyn TerminationDetector,
        truncated: bool,
    ) -> TurnRecord {
        let Termination { terminated, reward } = detector.evaluate(self);
        record.terminated = terminated;
        record.truncated = truncated;
        record.reward = if terminated { reward } else { None };

        self.entries.push(HistoryEntry::Turn(record.clone()));
        record
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn turn(iteration: usize, speaker: &str, role: ParticipantRole, text: &str) -> TurnRecord {
        TurnRecord {
            iteration,
            speaker: speaker.to_string(),
            speaker_role: role,
            response: text.to_string(),
            reward: None,
            terminated: false,
            truncated: false,
            action: "None".to_string(),
            technique: None,
        }
    }

    struct FiresOnThird;

    impl TerminationDetector for FiresOnThird {
        fn evaluate(&self, history: &History) -> Termination {
            if history.len() >= 3 {
                Termination::reached(7)
            } else {
                Termination::ongoing()
            }
        }

        fn after_end_state(&self, reward: u64) -> String {
            format!("reward {}", reward)
        }
    }

    #[test]
    fn test_settings_occupy_index_zero() {
        let history = History::new(SettingsSnapshot::default());
        assert_eq!(history.len(), 1);
        assert!(history.settings().is_some());
        assert_eq!(history.previous_response(), "");
        assert!(history.last_turn().is_none());
    }

    #[test]
    fn test_record_turn_settles_flags() {
        let mut history = History::new(SettingsSnapshot::default());
        let first = history.record_turn(
            turn(0, "a", ParticipantRole::Assistant, "hi"),
            &FiresOnThird,
            false,
        );
        assert!(!first.is_terminal());
        assert_eq!(history.previous_response(), "hi");

        history.record_turn(turn(1, "b", ParticipantRole::User, "hey"), &FiresOnThird, false);
        let third = history.record_turn(
            turn(2, "a", ParticipantRole::Assistant, "bye"),
            &FiresOnThird,
            true,
        );
        assert!(third.terminated);
        assert!(third.truncated);
        assert_eq!(third.reward, Some(7));
        assert_eq!(history.turns().count(), 3);
    }

    #[test]
    fn test_detector_runs_before_the_new_turn_is_appended() {
        struct ExpectsLength(usize);

        impl TerminationDetector for ExpectsLength {
            fn evaluate(&self, history: &History) -> Termination {
                assert_eq!(history.len(), self.0);
                Termination::ongoing()
            }

            fn after_end_state(&self, _reward: u64) -> String {
                String::new()
            }
        }

        let mut history = History::new(SettingsSnapshot::default());
        history.record_turn(turn(0, "a", ParticipantRole::Assistant, "hi"), &ExpectsLength(1), false);
        history.record_turn(turn(1, "b", ParticipantRole::User, "hey"), &ExpectsLength(2), false);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_history_serializes_with_kind_tags() {
        let mut history = History::new(SettingsSnapshot::default());
        history.record_turn(turn(0, "a", ParticipantRole::Assistant, "hi"), &FiresOnThird, false);
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["entries"][0]["kind"], "settings");
        assert_eq!(json["entries"][1]["kind"], "turn");
        assert_eq!(json["entries"][1]["speaker_role"], "assistant");
    }
}
