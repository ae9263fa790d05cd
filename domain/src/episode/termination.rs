//! Termination detection.
//!
//! A [`TerminationDetector`] decides from the turn history whether the
//! episode's objective has been reached and what reward it earned. Scenarios
//! are selected by [`ScenarioKind`].

use super::history::History;
use super::participant::ParticipantRole;
use crate::core::error::DomainError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Outcome of evaluating a history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Termination {
    pub terminated: bool,
    pub reward: Option<u64>,
}

impl Termination {
    pub fn ongoing() -> Self {
        Self {
            terminated: false,
            reward: None,
        }
    }

    pub fn reached(reward: u64) -> Self {
        Self {
            terminated: true,
            reward: Some(reward),
        }
    }
}

/// Scenario-specific end condition
pub trait TerminationDetector: Send + Sync {
    /// Must not fail; degenerate histories are simply not terminal.
    fn evaluate(&self, history: &History) -> Termination;

    /// Human-readable summary once the episode has terminated
    fn after_end_state(&self, reward: u64) -> String;
}

// Adapters escape `$`, so the escaped form is accepted too.
static DONATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"donate \\?\$(\d+)").unwrap());

/// Ends the episode when the recipient commits to `donate $<amount>`.
///
/// Only the second-to-last entry is inspected, and only when the recipient
/// spoke it. The first match wins; multiple amounts in one message are not
/// disambiguated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DonationDetector;

impl DonationDetector {
    /// Amount pledged in `text`, if any. Amounts past `u64::MAX` saturate.
    pub fn pledged_amount(text: &str) -> Option<u64> {
        DONATION
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
    }
}

impl TerminationDetector for DonationDetector {
    fn evaluate(&self, history: &History) -> Termination {
        let entries = history.entries();
        if entries.len() < 3 {
            return Termination::ongoing();
        }
        let Some(candidate) = entries[entries.len() - 2].as_turn() else {
            return Termination::ongoing();
        };
        if candidate.speaker_role == ParticipantRole::Assistant {
            return Termination::ongoing();
        }
        match Self::pledged_amount(&candidate.response) {
            Some(amount) => Termination::reached(amount),
            None => Termination::ongoing(),
        }
    }

    fn after_end_state(&self, reward: u64) -> String {
        format!(
            "The user is willing to donate ${}! Thank you for your donation!",
            reward
        )
    }
}

/// Which termination scenario an episode runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    #[default]
    #[serde(alias = "therapy")]
    Donation,
}

impl ScenarioKind {
    pub fn detector(&self) -> Box<dyn TerminationDetector> {
        match self {
            ScenarioKind::Donation => Box::new(DonationDetector),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Donation => "donation",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "donation" | "therapy" => Ok(ScenarioKind::Donation),
            other => Err(DomainError::UnknownScenario(other.to_string())),
        }
    }
}
