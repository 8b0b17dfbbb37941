//! The OS seam used by the launch engine.

use std::path::Path;

use crate::{
    Display, Result as WinResult, WindowHandle, WindowInfo, geom::Point, open,
    process::{self, SpawnedProcess},
    sys,
};

/// Trait abstraction over OS operations used by a targeted launch.
///
/// Every method reads live OS state; nothing is cached between calls.
pub trait WinOps: Send + Sync {
    /// Current display configuration.
    fn displays(&self) -> WinResult<Vec<Display>>;
    /// Start `path` detached from the caller.
    fn spawn_detached(&self, path: &Path) -> WinResult<SpawnedProcess>;
    /// Whether a previously spawned process has exited.
    fn has_exited(&self, process: &mut SpawnedProcess) -> bool;
    /// Main window of `pid`, if one is visible yet.
    fn main_window_for_pid(&self, pid: u32) -> Option<WindowInfo>;
    /// Main windows of all processes with executable base name `name`, in
    /// enumeration order.
    fn main_windows_named(&self, name: &str) -> Vec<WindowInfo>;
    /// Move a window's top-left corner, keeping its size.
    fn move_window(&self, window: WindowHandle, origin: Point) -> WinResult<()>;
    /// Restore and bring a window to the foreground.
    fn activate_window(&self, window: WindowHandle) -> WinResult<()>;
    /// Open `path` through the OS default handler.
    fn open_default(&self, path: &Path) -> WinResult<()>;
}

/// Production implementation of WinOps delegating to the platform backend.
pub struct RealWinOps;

impl WinOps for RealWinOps {
    fn displays(&self) -> WinResult<Vec<Display>> {
        sys::displays()
    }
    fn spawn_detached(&self, path: &Path) -> WinResult<SpawnedProcess> {
        process::spawn_detached(path)
    }
    fn has_exited(&self, process: &mut SpawnedProcess) -> bool {
        process.has_exited()
    }
    fn main_window_for_pid(&self, pid: u32) -> Option<WindowInfo> {
        sys::main_window_for_pid(pid)
    }
    fn main_windows_named(&self, name: &str) -> Vec<WindowInfo> {
        sys::main_windows_named(name)
    }
    fn move_window(&self, window: WindowHandle, origin: Point) -> WinResult<()> {
        sys::move_window(window, origin)
    }
    fn activate_window(&self, window: WindowHandle) -> WinResult<()> {
        sys::activate_window(window)
    }
    fn open_default(&self, path: &Path) -> WinResult<()> {
        open::open_default(path)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockWinOps;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::{
        collections::HashSet,
        path::{Path, PathBuf},
        sync::Arc,
    };

    use parking_lot::Mutex;

    use super::WinOps;
    use crate::{
        Display, Error, Result as WinResult, WindowHandle, WindowInfo, geom::Point,
        process::SpawnedProcess,
    };

    /// First pid handed out by the mock spawner.
    const FIRST_PID: u32 = 1000;

    /// Mutable state behind [`MockWinOps`].
    #[derive(Default)]
    struct MockState {
        calls: Vec<String>,
        displays: Vec<Display>,
        fail_displays: bool,
        missing: HashSet<PathBuf>,
        spawned: Vec<(u32, PathBuf)>,
        exited: HashSet<u32>,
        /// Spawned pids expose a main window from this `main_window_for_pid` call on (1-based).
        window_after: Option<u32>,
        pid_polls: u32,
        named: Vec<(String, WindowInfo)>,
        moves: Vec<(WindowHandle, Point)>,
        opened: Vec<PathBuf>,
        fail_move: bool,
        fail_activate: bool,
        fail_open: bool,
    }

    /// Scriptable in-memory implementation for tests (enabled with `test-utils`).
    #[derive(Clone, Default)]
    pub struct MockWinOps {
        state: Arc<Mutex<MockState>>,
    }

    impl MockWinOps {
        /// Empty mock: no displays, no windows, every call succeeds.
        pub fn new() -> Self {
            Self::default()
        }
        /// Handle the mock assigns to the main window of a spawned `pid`.
        pub fn handle_for_pid(pid: u32) -> WindowHandle {
            WindowHandle(0x1000 + pid as isize)
        }
        /// Displays returned by `displays()`.
        pub fn set_displays(&self, displays: Vec<Display>) {
            self.state.lock().displays = displays;
        }
        /// Make `displays()` fail.
        pub fn set_fail_displays(&self, v: bool) {
            self.state.lock().fail_displays = v;
        }
        /// Make spawning `path` fail as if it did not exist.
        pub fn set_missing(&self, path: impl Into<PathBuf>) {
            self.state.lock().missing.insert(path.into());
        }
        /// Spawned pids expose a main window from the `polls`-th
        /// `main_window_for_pid` call on; `None` never.
        pub fn set_main_window_after(&self, polls: Option<u32>) {
            self.state.lock().window_after = polls;
        }
        /// Report `pid` as exited.
        pub fn mark_exited(&self, pid: u32) {
            self.state.lock().exited.insert(pid);
        }
        /// Register a window owned by a process named `name` (e.g. a re-spawned instance).
        pub fn add_named_window(&self, name: &str, info: WindowInfo) {
            self.state.lock().named.push((name.to_string(), info));
        }
        /// Make `move_window` fail with `WindowGone`.
        pub fn set_fail_move(&self, v: bool) {
            self.state.lock().fail_move = v;
        }
        /// Make `activate_window` fail.
        pub fn set_fail_activate(&self, v: bool) {
            self.state.lock().fail_activate = v;
        }
        /// Make `open_default` fail (the path is still recorded).
        pub fn set_fail_open(&self, v: bool) {
            self.state.lock().fail_open = v;
        }
        /// Ordered log of every operation invoked.
        pub fn calls(&self) -> Vec<String> {
            self.state.lock().calls.clone()
        }
        /// Paths spawned so far, in order.
        pub fn spawned(&self) -> Vec<PathBuf> {
            self.state.lock().spawned.iter().map(|(_, p)| p.clone()).collect()
        }
        /// Pids handed out so far, in order.
        pub fn spawned_pids(&self) -> Vec<u32> {
            self.state.lock().spawned.iter().map(|(pid, _)| *pid).collect()
        }
        /// Paths passed to `open_default`, in order.
        pub fn opened(&self) -> Vec<PathBuf> {
            self.state.lock().opened.clone()
        }
        /// Accepted moves, in order.
        pub fn moves(&self) -> Vec<(WindowHandle, Point)> {
            self.state.lock().moves.clone()
        }
        /// Number of `main_window_for_pid` calls so far.
        pub fn main_window_polls(&self) -> u32 {
            self.state.lock().pid_polls
        }
        /// Append to the call log.
        fn note(&self, s: String) {
            self.state.lock().calls.push(s);
        }
    }

    impl WinOps for MockWinOps {
        fn displays(&self) -> WinResult<Vec<Display>> {
            self.note("displays".into());
            let g = self.state.lock();
            if g.fail_displays {
                return Err(Error::Unsupported("display enumeration"));
            }
            Ok(g.displays.clone())
        }
        fn spawn_detached(&self, path: &Path) -> WinResult<SpawnedProcess> {
            self.note(format!("spawn:{}", path.display()));
            let mut g = self.state.lock();
            if g.missing.contains(path) {
                return Err(Error::NotFound(path.to_path_buf()));
            }
            let pid = FIRST_PID + g.spawned.len() as u32;
            g.spawned.push((pid, path.to_path_buf()));
            Ok(SpawnedProcess::untracked(pid, path))
        }
        fn has_exited(&self, process: &mut SpawnedProcess) -> bool {
            self.state.lock().exited.contains(&process.pid())
        }
        fn main_window_for_pid(&self, pid: u32) -> Option<WindowInfo> {
            self.note(format!("main_window:{pid}"));
            let mut g = self.state.lock();
            g.pid_polls += 1;
            let ready = g.window_after.is_some_and(|n| g.pid_polls >= n);
            let path = g.spawned.iter().find(|(p, _)| *p == pid).map(|(_, path)| path);
            match path {
                Some(path) if ready => Some(WindowInfo {
                    handle: Self::handle_for_pid(pid),
                    pid,
                    title: path.display().to_string(),
                }),
                _ => None,
            }
        }
        fn main_windows_named(&self, name: &str) -> Vec<WindowInfo> {
            self.note(format!("named:{name}"));
            self.state
                .lock()
                .named
                .iter()
                .filter(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, w)| w.clone())
                .collect()
        }
        fn move_window(&self, window: WindowHandle, origin: Point) -> WinResult<()> {
            self.note(format!("move:{window}@{origin}"));
            let mut g = self.state.lock();
            if g.fail_move {
                return Err(Error::WindowGone);
            }
            g.moves.push((window, origin));
            Ok(())
        }
        fn activate_window(&self, window: WindowHandle) -> WinResult<()> {
            self.note(format!("activate:{window}"));
            if self.state.lock().fail_activate {
                return Err(Error::os("SetForegroundWindow", "refused"));
            }
            Ok(())
        }
        fn open_default(&self, path: &Path) -> WinResult<()> {
            self.note(format!("open:{}", path.display()));
            let mut g = self.state.lock();
            g.opened.push(path.to_path_buf());
            if g.fail_open {
                return Err(Error::os("ShellExecuteW", "code 2"));
            }
            Ok(())
        }
    }
}
