//! Transit script: the fixed turn order of an episode

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered participant names; the length bounds the episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TransitScript {
    slots: Vec<String>,
}

impl TransitScript {
    pub fn new(slots: Vec<String>) -> Result<Self, DomainError> {
        if slots.is_empty() {
            return Err(DomainError::EmptyTransit);
        }
        Ok(Self { slots })
    }

    /// `[opener, responder] * rounds`.
    ///
    /// When the episode starts from a literal initial message the responder's
    /// opening line is that message, so the script becomes
    /// `[responder] + [opener, responder] * (rounds - 1)`.
    pub fn alternating(
        opener: &str,
        responder: &str,
        rounds: usize,
        starts_with_initial_message: bool,
    ) -> Result<Self, DomainError> {
        let mut slots = Vec::with_capacity(rounds * 2);
        if starts_with_initial_message {
            if rounds > 0 {
                slots.push(responder.to_string());
            }
            for _ in 1..rounds {
                slots.push(opener.to_string());
                slots.push(responder.to_string());
            }
        } else {
            for _ in 0..rounds {
                slots.push(opener.to_string());
                slots.push(responder.to_string());
            }
        }
        Self::new(slots)
    }

    /// Fail if any slot names a participant not in `declared`.
    pub fn ensure_declared(&self, declared: &HashSet<&str>) -> Result<(), DomainError> {
        match self.slots.iter().find(|s| !declared.contains(s.as_str())) {
            Some(unknown) => Err(DomainError::UnknownParticipant(unknown.clone())),
            None => Ok(()),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str)
    }

    /// True when `index` is the final slot
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.slots.len()
    }
}

impl TryFrom<Vec<String>> for TransitScript {
    type Error = DomainError;

    fn try_from(slots: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(slots)
    }
}

impl From<TransitScript> for Vec<String> {
    fn from(script: TransitScript) -> Self {
        script.slots
    }
}
