//! Error handling for the slauncher binary.

use std::{io, path::PathBuf, result};

use thiserror::Error;
use tokio::task::JoinError;

/// Convenient result type for slauncher commands.
pub type Result<T> = result::Result<T, Error>;

/// Errors that end the process with a non-zero status.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The configuration file could not be loaded.
    #[error("Configuration error in {}: {source}", path.display())]
    ConfigFile {
        /// File that was being loaded.
        path: PathBuf,
        /// Underlying engine error.
        #[source]
        source: launch_engine::Error,
    },
    /// The effective configuration failed validation.
    #[error("Configuration error: {0}")]
    Config(#[source] launch_engine::Error),
    /// Engine errors surfaced outside of a launch (e.g. listing displays).
    #[error(transparent)]
    Engine(#[from] launch_engine::Error),
    /// JSON rendering failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The launch task panicked or was aborted.
    #[error("launch task failed: {0}")]
    Task(#[from] JoinError),
}
