//! Error types for gitbot-shepherd

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while looking up a shepherd.
///
/// A missing manifest is not an error; see [`crate::select_shepherd`].
#[derive(Error, Debug)]
pub enum ShepherdError {
    /// The checkout path was empty and the current directory is unavailable
    #[error("failed to determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// The manifest exists but could not be inspected
    #[error("failed to stat manifest {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest exists but could not be read
    #[error("error reading manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid YAML of the expected shape
    #[error("invalid manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result type for shepherd lookups.
pub type Result<T> = std::result::Result<T, ShepherdError>;
