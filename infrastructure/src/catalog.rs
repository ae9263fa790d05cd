//! Technique catalog loading
//!
//! The published persuasion taxonomy ships inside the binary; a JSONL file
//! configured under `[catalog]` replaces it.

use arena_domain::{DomainError, TechniqueCatalog};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info};

const BUILTIN_TAXONOMY: &str = include_str!("../resources/persuasion_taxonomy.jsonl");

static BUILTIN: OnceLock<Result<Arc<TechniqueCatalog>, DomainError>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Could not read technique catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid technique catalog {path}: {source}")]
    Parse { path: PathBuf, source: DomainError },
}

pub struct CatalogLoader;

impl CatalogLoader {
    /// The embedded taxonomy, parsed once per process.
    pub fn builtin() -> Result<Arc<TechniqueCatalog>, CatalogLoadError> {
        BUILTIN
            .get_or_init(|| TechniqueCatalog::from_jsonl(BUILTIN_TAXONOMY).map(Arc::new))
            .clone()
            .map_err(|source| CatalogLoadError::Parse {
                path: PathBuf::from("<builtin>"),
                source,
            })
    }

    pub fn from_path(path: &Path) -> Result<Arc<TechniqueCatalog>, CatalogLoadError> {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog =
            TechniqueCatalog::from_jsonl(&source).map_err(|source| CatalogLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), techniques = catalog.len(), "Loaded technique catalog");
        Ok(Arc::new(catalog))
    }

    /// Load from `path` when given, otherwise the embedded taxonomy.
    pub fn load(path: Option<&Path>) -> Result<Arc<TechniqueCatalog>, CatalogLoadError> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                debug!("Using built-in persuasion taxonomy");
                Self::builtin()
            }
        }
    }
}
