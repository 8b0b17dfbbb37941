//! "Open with the associated handler" primitive.

use std::path::Path;

use crate::error::Result;

/// Ask the OS shell to open `path` with its default association.
#[cfg(windows)]
pub fn open_default(path: &Path) -> Result<()> {
    crate::win32::shell_open(path)
}

/// Ask the desktop environment to open `path` with its default association.
#[cfg(not(windows))]
pub fn open_default(path: &Path) -> Result<()> {
    use std::process::{Command, Stdio};

    use crate::error::Error;

    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let status = Command::new(opener)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::os(opener, status))
    }
}
