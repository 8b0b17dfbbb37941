//! Placeholder backend for platforms without window placement support.
//!
//! Discovery finds nothing and placement calls fail, so callers degrade to a
//! plain default-open.

use crate::{
    Display, WindowHandle, WindowInfo,
    error::{Error, Result},
    geom::Point,
};

pub fn displays() -> Result<Vec<Display>> {
    Err(Error::Unsupported("display enumeration"))
}

pub fn main_window_for_pid(_pid: u32) -> Option<WindowInfo> {
    None
}

pub fn main_windows_named(_name: &str) -> Vec<WindowInfo> {
    Vec::new()
}

pub fn move_window(_handle: WindowHandle, _origin: Point) -> Result<()> {
    Err(Error::Unsupported("window placement"))
}

pub fn activate_window(_handle: WindowHandle) -> Result<()> {
    Err(Error::Unsupported("window activation"))
}
