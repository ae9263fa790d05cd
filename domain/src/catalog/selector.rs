//! Technique selector value object

use super::TechniqueCatalog;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a catalog-driven strategy picks its technique.
///
/// Configured as an integer index, `-1`, or one of the strings `"random"` /
/// `"none"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSelector", into = "RawSelector")]
pub enum TechniqueSelector {
    /// Always use the technique at this index
    Index(usize),
    /// Draw a fresh uniform index on every action
    #[default]
    Random,
    /// Technique use disabled
    Disabled,
}

impl TechniqueSelector {
    /// Interpret a signed index, where `-1` disables technique use.
    pub fn from_index(index: i64) -> Result<Self, DomainError> {
        match index {
            -1 => Ok(TechniqueSelector::Disabled),
            i if i >= 0 => Ok(TechniqueSelector::Index(i as usize)),
            other => Err(DomainError::InvalidTechnique(other.to_string())),
        }
    }

    /// Check the selector against a loaded catalog.
    pub fn validate(&self, catalog: &TechniqueCatalog) -> Result<(), DomainError> {
        match self {
            TechniqueSelector::Index(i) if *i >= catalog.len() => {
                Err(DomainError::TechniqueOutOfRange {
                    index: *i as i64,
                    len: catalog.len(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for TechniqueSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TechniqueSelector::Index(i) => write!(f, "{}", i),
            TechniqueSelector::Random => write!(f, "random"),
            TechniqueSelector::Disabled => write!(f, "none"),
        }
    }
}

impl FromStr for TechniqueSelector {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "random" => Ok(TechniqueSelector::Random),
            "none" => Ok(TechniqueSelector::Disabled),
            _ => trimmed
                .parse::<i64>()
                .map_err(|_| DomainError::InvalidTechnique(trimmed.to_string()))
                .and_then(Self::from_index),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawSelector {
    Index(i64),
    Name(String),
}

impl TryFrom<RawSelector> for TechniqueSelector {
    type Error = DomainError;

    fn try_from(raw: RawSelector) -> Result<Self, Self::Error> {
        match raw {
            RawSelector::Index(i) => Self::from_index(i),
            RawSelector::Name(s) => s.parse(),
        }
    }
}

impl From<TechniqueSelector> for RawSelector {
    fn from(selector: TechniqueSelector) -> Self {
        match selector {
            TechniqueSelector::Index(i) => RawSelector::Index(i as i64),
            TechniqueSelector::Random => RawSelector::Name("random".to_string()),
            TechniqueSelector::Disabled => RawSelector::Index(-1),
        }
    }
}
