//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed event record.
    #[error("invalid event at line {line}: {source}")]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Missing or malformed configuration entry.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] decaytrack_core::Error),

    /// Action configuration error.
    #[error("action error: {0}")]
    ActionError(#[from] decaytrack_actions::Error),
}
