//! Action configuration error types.

use thiserror::Error;

/// Result type for action configuration and chain building.
pub type Result<T> = std::result::Result<T, Error>;

/// Action error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed configuration block.
    #[error("invalid configuration for [{action}]: {source}")]
    InvalidBlock {
        /// Block name.
        action: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration document is not a map of action blocks.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// No factory registered under this name.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] decaytrack_core::Error),
}
