//! Error types for profile loading, settings and the flight sequencer

use std::path::PathBuf;

/// Errors surfaced while configuring a run.
///
/// Ticks never fail: everything here is reported before the first tick or
/// by the collaborators that load profiles and settings.
#[derive(Debug, thiserror::Error)]
pub enum LanderError {
    /// Profile data is unusable (missing `full` trigger, too few phases,
    /// non-finite numbers, malformed JSON).
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// Run options are unusable (non-finite starting altitude or velocity).
    #[error("invalid flight options: {0}")]
    InvalidOptions(String),

    /// Phase index escaped the sequence bounds. Unreachable while phases
    /// only ever advance one at a time.
    #[error("phase index {index} out of range for a sequence of {len} phases")]
    PhaseIndexOutOfRange { index: usize, len: usize },

    /// No profile with this id in the catalog.
    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    /// Failed to read or write a file.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be encoded or decoded.
    #[error("failed to process settings: {0}")]
    Settings(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LanderError>;

impl LanderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LanderError::Io {
            path: path.into(),
            source,
        }
    }
}
