//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Every variant describes a configuration mistake that is detected while an
/// episode is being assembled. None of them are raised once the turn loop runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Transit script must contain at least one participant")]
    EmptyTransit,

    #[error("Transit references undeclared participant: {0}")]
    UnknownParticipant(String),

    #[error("Participant declared more than once: {0}")]
    DuplicateParticipant(String),

    #[error("Technique index {index} out of range (catalog has {len} entries)")]
    TechniqueOutOfRange { index: i64, len: usize },

    #[error("Invalid technique selector: {0}")]
    InvalidTechnique(String),

    #[error("Unknown action strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Technique catalog line {line}: {message}")]
    CatalogParse { line: usize, message: String },

    #[error("Technique catalog is empty")]
    EmptyCatalog,
}

impl DomainError {
    /// Check if this error was raised while reading the technique catalog
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            DomainError::CatalogParse { .. } | DomainError::EmptyCatalog
        )
    }
}
