use std::{io, path::PathBuf, result::Result as StdResult, time::Duration};

use launch_winops::DisplayId;
use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Failures a launch request can run into.
///
/// Only `Config` and `Io` ever reach a caller as hard errors; everything else
/// is recorded as the reason a request fell back to a plain open.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested display is not in the current display snapshot.
    #[error("display {0} not found")]
    DisplayNotFound(DisplayId),

    /// Display enumeration itself failed.
    #[error("display query failed: {0}")]
    DisplayQuery(#[source] launch_winops::Error),

    /// The executable could not be started.
    #[error("spawn failed for {}: {source}", path.display())]
    Spawn {
        /// Executable that failed to start.
        path: PathBuf,
        /// Underlying OS failure.
        #[source]
        source: launch_winops::Error,
    },

    /// No matching main window appeared within the polling bound.
    #[error("no window found after {attempts} attempts ({elapsed:?})")]
    DiscoveryTimeout {
        /// Attempts made before giving up.
        attempts: u32,
        /// Wall-clock time spent polling.
        elapsed: Duration,
    },

    /// A window manipulation call was rejected.
    #[error("placement step {step} failed: {source}")]
    Placement {
        /// Which step failed ("move", "activate", "reapply").
        step: &'static str,
        /// Underlying OS failure.
        #[source]
        source: launch_winops::Error,
    },

    /// Configuration values are out of range.
    #[error("invalid config: {0}")]
    Config(String),

    /// Configuration text could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// I/O failure reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
