//! Display, process and window operations used by slauncher's targeted launch
//! path.
//!
//! The [`WinOps`] trait is the seam between the launch engine and the OS:
//! - [`RealWinOps`] talks to Win32 on Windows and degrades to "nothing found"
//!   elsewhere, so callers fall back to a plain default-open.
//! - `MockWinOps` (feature `test-utils`) scripts displays, spawns and window
//!   appearance for tests.

pub mod error;
pub mod geom;
pub mod ops;
pub mod open;
pub mod process;
mod window;

#[cfg(windows)]
mod win32;
#[cfg(windows)]
use win32 as sys;

#[cfg(not(windows))]
mod unsupported;
#[cfg(not(windows))]
use unsupported as sys;

pub use error::{Error, Result};
pub use geom::{Point, Rect};
#[cfg(any(test, feature = "test-utils"))]
pub use ops::MockWinOps;
pub use ops::{RealWinOps, WinOps};
pub use process::SpawnedProcess;
pub use window::{Display, DisplayId, WindowHandle, WindowInfo};
