//! Detached process creation.
//!
//! A [`SpawnedProcess`] owns the OS handle to the started process. Dropping it
//! releases the handle only; the process itself keeps running. On Unix a
//! released child is reaped in the background once it exits.

use std::{
    fs, io, mem,
    path::{Path, PathBuf},
};
#[cfg(windows)]
use std::os::windows::io::OwnedHandle;
#[cfg(not(windows))]
use std::{
    process::Child,
    thread::{self, JoinHandle},
};

use tracing::trace;
#[cfg(not(windows))]
use tracing::debug;

use crate::error::{Error, Result};

/// Handle kinds backing a [`SpawnedProcess`].
#[derive(Debug)]
enum ProcessHandle {
    /// Process started through `std::process::Command`.
    #[cfg(not(windows))]
    Child(Child),
    /// Process handle returned by `ShellExecuteExW`.
    #[cfg(windows)]
    Native(OwnedHandle),
    /// No handle available (shell reused an existing instance, or a test double).
    Untracked,
}

/// A process started by the launcher.
#[derive(Debug)]
pub struct SpawnedProcess {
    /// OS process id (0 when untracked).
    pid: u32,
    /// Executable base name without extension.
    name: String,
    /// Path that was launched.
    path: PathBuf,
    /// Handle owned until the request completes.
    handle: ProcessHandle,
}

impl SpawnedProcess {
    /// Record a process without an OS handle.
    pub fn untracked(pid: u32, path: &Path) -> Self {
        Self {
            pid,
            name: process_name_for(path),
            path: path.to_path_buf(),
            handle: ProcessHandle::Untracked,
        }
    }

    /// Wrap a `std::process::Child`.
    #[cfg(not(windows))]
    pub(crate) fn from_child(child: Child, path: &Path) -> Self {
        Self {
            pid: child.id(),
            name: process_name_for(path),
            path: path.to_path_buf(),
            handle: ProcessHandle::Child(child),
        }
    }

    /// Wrap a native process handle.
    #[cfg(windows)]
    pub(crate) fn from_native(pid: u32, handle: OwnedHandle, path: &Path) -> Self {
        Self {
            pid,
            name: process_name_for(path),
            path: path.to_path_buf(),
            handle: ProcessHandle::Native(handle),
        }
    }

    /// OS process id; 0 when the shell reused an existing instance.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Base name used for name-based window discovery.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the process was started from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when an OS handle is held for this process.
    pub fn is_tracked(&self) -> bool {
        !matches!(self.handle, ProcessHandle::Untracked)
    }

    /// Returns true once the process has exited or can no longer be observed.
    pub fn has_exited(&mut self) -> bool {
        match &mut self.handle {
            #[cfg(not(windows))]
            ProcessHandle::Child(child) => !matches!(child.try_wait(), Ok(None)),
            #[cfg(windows)]
            ProcessHandle::Native(handle) => crate::win32::process_exited(handle),
            ProcessHandle::Untracked => true,
        }
    }
}

impl Drop for SpawnedProcess {
    fn drop(&mut self) {
        match mem::replace(&mut self.handle, ProcessHandle::Untracked) {
            #[cfg(not(windows))]
            ProcessHandle::Child(child) => {
                trace!(pid = self.pid, name = %self.name, "releasing process handle");
                reap_in_background(child);
            }
            #[cfg(windows)]
            ProcessHandle::Native(_) => {
                trace!(pid = self.pid, name = %self.name, "releasing process handle");
            }
            ProcessHandle::Untracked => {}
        }
    }
}

/// Collect the exit status of a released child once it ends, so it never
/// lingers as a zombie in a long-lived host. Returns the reaper thread when
/// the child was still running.
#[cfg(not(windows))]
fn reap_in_background(mut child: Child) -> Option<JoinHandle<()>> {
    let pid = child.id();
    match child.try_wait() {
        Ok(Some(status)) => {
            trace!(pid, %status, "released child already exited");
            None
        }
        Err(err) => {
            debug!(pid, %err, "cannot poll released child");
            None
        }
        Ok(None) => {
            let reaper = thread::Builder::new()
                .name(format!("reap-{pid}"))
                .spawn(move || match child.wait() {
                    Ok(status) => trace!(pid, %status, "reaped released child"),
                    Err(err) => debug!(pid, %err, "wait on released child failed"),
                });
            match reaper {
                Ok(handle) => Some(handle),
                Err(err) => {
                    debug!(pid, %err, "reaper thread unavailable");
                    None
                }
            }
        }
    }
}

/// Base name of an executable path without its extension (`C:\a\notes.exe` -> `notes`).
pub fn process_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Verify that `path` names something the OS could start.
pub fn check_executable(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::NotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    if !meta.is_file() {
        return Err(Error::NotExecutable(path.to_path_buf()));
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 == 0 {
            return Err(Error::NotExecutable(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Start `path` detached from the launcher's lifetime.
pub fn spawn_detached(path: &Path) -> Result<SpawnedProcess> {
    check_executable(path)?;
    spawn_platform(path)
}

/// Windows: go through the shell so shortcuts and associations resolve.
#[cfg(windows)]
fn spawn_platform(path: &Path) -> Result<SpawnedProcess> {
    crate::win32::shell_execute_tracked(path)
}

/// Unix: plain exec in a fresh process group with null stdio.
#[cfg(not(windows))]
fn spawn_platform(path: &Path) -> Result<SpawnedProcess> {
    use std::{
        os::unix::process::CommandExt,
        process::{Command, Stdio},
    };

    let mut command = Command::new(path);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0);
    let child = command.spawn().map_err(|source| Error::Spawn {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SpawnedProcess::from_child(child, path))
}
