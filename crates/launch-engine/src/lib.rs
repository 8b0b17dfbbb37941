//! Targeted launch engine for slauncher.
//!
//! Starts an executable, finds the top-level window it ends up showing, and
//! moves that window onto a chosen display. Whatever goes wrong, the user
//! still gets a running application: every failure before placement falls
//! back to opening the file through the OS default handler.
//!
//! - [`DisplayDirectory`]: live display snapshots.
//! - [`ProcessSpawner`]: detached process start.
//! - [`WindowPoller`]: bounded, cancellable window discovery.
//! - [`PlacementExecutor`]: move / activate / delay / move.
//! - [`Launcher`]: the per-request state machine tying them together.

pub mod config;
pub mod discovery;
pub mod display;
mod error;
pub mod launcher;
pub mod placement;
pub mod spawner;

pub use config::LaunchConfig;
pub use discovery::{
    Discovery, NamedProcessWindow, ResolvedWindow, SpawnedProcessWindow, WindowPoller,
    WindowStrategy,
};
pub use display::{DisplayDirectory, LabeledDisplay};
pub use error::{Error, Result};
pub use launcher::{LaunchOutcome, LaunchReport, LaunchRequest, LaunchState, Launcher};
pub use placement::{MAX_MOVES, PlacementExecutor, PlacementResult};
pub use spawner::ProcessSpawner;
