//! Errors raised by OS operations.

use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Errors that can occur during display, process and window operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The executable path does not exist.
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),

    /// The path exists but cannot be executed (directory, missing exec bit).
    #[error("path is not executable: {0}")]
    NotExecutable(PathBuf),

    /// The OS refused to create the process (permissions, corrupt binary).
    #[error("process creation failed for {path}: {source}")]
    Spawn {
        /// Executable that could not be started.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The window handle became invalid (window closed) before the operation.
    #[error("window handle invalid (window gone)")]
    WindowGone,

    /// A native OS call failed.
    #[error("{op} failed: {message}")]
    Os {
        /// Name of the failing OS call.
        op: &'static str,
        /// OS-provided error text.
        message: String,
    },

    /// The operation is not available on this platform.
    #[error("unsupported on this platform: {0}")]
    Unsupported(&'static str),

    /// I/O failure outside of process creation.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build an [`Error::Os`] from a call name and anything printable.
    pub fn os(op: &'static str, message: impl ToString) -> Self {
        Self::Os {
            op,
            message: message.to_string(),
        }
    }
}

/// Convenient result type for window operations.
pub type Result<T> = StdResult<T, Error>;
