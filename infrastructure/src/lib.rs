//! Infrastructure layer for dialogue-arena
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: model backends, configuration file loading, the
//! technique catalog loader and episode log writers.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use catalog::{CatalogLoadError, CatalogLoader};
pub use config::{
    ConfigLoader, ConfigValidationError, FileBedrockConfig, FileCatalogConfig, FileConfig,
    FileEpisodeConfig, FileLoggingConfig, FileOpenAiConfig, FileProvidersConfig,
};
pub use logging::{EpisodeLogDir, JsonlConversationLogger, TranscriptError};
pub use providers::{ProviderKind, ProviderRegistry, human::HumanGateway};
