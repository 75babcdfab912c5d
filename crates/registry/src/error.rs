//! Registry error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur operating on the application registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to read the registry document
    #[error("failed to load registry '{path}': {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Registry document is not valid JSON
    #[error("failed to parse registry '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to persist the registry document
    #[error("failed to save registry '{path}': {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Registry document failed to encode
    #[error("failed to encode registry: {0}")]
    Encode(#[source] serde_json::Error),

    /// An application whose name hashes to an existing id already exists
    #[error("application '{name}' already exists (id {id})")]
    Conflict { name: String, id: String },

    /// No application with the given id
    #[error("application '{0}' not found")]
    NotFound(String),
}
