//! Configuration file loading for dialogue-arena
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `ARENA_*` (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./arena.toml` or `./.arena.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/dialogue-arena/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBedrockConfig, FileCatalogConfig, FileConfig, FileEpisodeConfig,
    FileLoggingConfig, FileOpenAiConfig, FileProvidersConfig,
};
pub use loader::ConfigLoader;
