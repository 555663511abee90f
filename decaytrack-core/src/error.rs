//! Error types for decaytrack-core.

use thiserror::Error;

/// Result type alias for decaytrack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for decaytrack operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No beam-like cluster in an event that needs one.
    #[error("no beam-like cluster in event")]
    NoBeamLike,

    /// Cluster without voxels where points are required.
    #[error("cluster {0} has no voxels")]
    EmptyCluster(i32),

    /// No decay candidate within the transverse distance threshold.
    #[error("no decay found within Lxy <= {max_lxy}; was the event filtered?")]
    NoDecayFound { max_lxy: f64 },

    /// Invalid histogram binning.
    #[error("invalid binning: {bins} bins over [{min}, {max})")]
    InvalidBinning { bins: usize, min: f64, max: f64 },
}
