//! Store error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur reading or writing the event store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create a day directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write an event file
    #[error("failed to write event to '{path}': {source}")]
    WriteEvent {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to enumerate a day directory
    #[error("failed to read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A day directory holds more entries than a single scan may visit;
    /// the caller should narrow its time range
    #[error("directory '{path}' has {count} entries, narrow the time range")]
    OverRange { path: PathBuf, count: usize },

    /// Event failed to encode as JSON
    #[error("failed to encode event '{event_id}': {source}")]
    Encode {
        event_id: String,
        #[source]
        source: serde_json::Error,
    },
}
