//! Launch orchestrator.
//!
//! One request walks `Idle → Spawning → Discovering → Placing → Done`. Any
//! failure before placement diverts to `Fallback`, which opens the executable
//! through the OS default handler exactly once and then finishes. Placement
//! failures never divert: the application is already running and a second
//! open would start a duplicate instance.
//!
//! Cancellation ends a request in `Cancelled` without a fallback open. Once
//! the first move has landed the window is already on the target display, so
//! a cancel arriving during the re-apply delay still reports `Placed` with
//! `interrupted` set.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use launch_winops::{DisplayId, WinOps};
use tokio::task::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::{
    config::LaunchConfig,
    discovery::{Discovery, WindowPoller},
    display::DisplayDirectory,
    error::Error,
    placement::{PlacementExecutor, PlacementResult},
    spawner::ProcessSpawner,
};

/// A single user launch action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Executable (or any openable file) to launch.
    pub executable_path: PathBuf,
    /// Display to place the main window on; `None` means a plain open.
    pub target_display: Option<DisplayId>,
}

impl LaunchRequest {
    /// Request for an untargeted open.
    pub fn plain(path: impl Into<PathBuf>) -> Self {
        Self {
            executable_path: path.into(),
            target_display: None,
        }
    }

    /// Request for a launch placed on `display`.
    pub fn on_display(path: impl Into<PathBuf>, display: DisplayId) -> Self {
        Self {
            executable_path: path.into(),
            target_display: Some(display),
        }
    }
}

/// States of the per-request state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    /// Request accepted, nothing done yet.
    Idle,
    /// Starting the process.
    Spawning,
    /// Polling for its main window.
    Discovering,
    /// Moving the resolved window.
    Placing,
    /// Opening through the default handler instead.
    Fallback,
    /// Abandoned before any move landed; terminal.
    Cancelled,
    /// Finished; terminal.
    Done,
}

/// How a request ended.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// Spawned, window found, placement attempted.
    Placed(PlacementResult),
    /// No display requested (or targeting disabled); opened directly.
    Plain {
        /// Whether the default-open call was accepted.
        opened: bool,
    },
    /// Targeting could not complete; opened through the default handler.
    Fallback {
        /// Why targeting was abandoned.
        reason: Error,
        /// Whether the default-open call was accepted.
        opened: bool,
    },
    /// The launcher shut down before the window was moved.
    Cancelled,
}

impl LaunchOutcome {
    /// True when placement ran, i.e. at least one move was issued.
    pub fn is_targeted(&self) -> bool {
        matches!(self, Self::Placed(_))
    }
}

/// Everything known about a finished request.
#[derive(Debug)]
pub struct LaunchReport {
    /// The request as submitted.
    pub request: LaunchRequest,
    /// How it ended.
    pub outcome: LaunchOutcome,
    /// Every state visited, starting with `Idle`.
    pub states: Vec<LaunchState>,
}

impl LaunchReport {
    /// Last state entered.
    pub fn final_state(&self) -> LaunchState {
        self.states.last().copied().unwrap_or(LaunchState::Idle)
    }
}

/// State history for one request.
struct Transitions {
    /// Visited states, oldest first.
    states: Vec<LaunchState>,
}

impl Transitions {
    fn new() -> Self {
        Self {
            states: vec![LaunchState::Idle],
        }
    }

    fn enter(&mut self, next: LaunchState) {
        let from = self.states.last().copied().unwrap_or(LaunchState::Idle);
        debug!(?from, to = ?next, "launch state");
        self.states.push(next);
    }
}

/// Entry point for launching applications, optionally onto a display.
///
/// Cheap to clone; clones share only the OS seam and the shutdown token.
/// Each request is independent and fully request-scoped.
#[derive(Clone)]
pub struct Launcher {
    /// OS seam, shared with every component.
    ops: Arc<dyn WinOps>,
    /// Timing and gating.
    config: LaunchConfig,
    /// Display lookup.
    displays: DisplayDirectory,
    /// Process start.
    spawner: ProcessSpawner,
    /// Window moves.
    placement: PlacementExecutor,
    /// Parent of every request's cancellation token.
    shutdown: CancellationToken,
}

impl Launcher {
    /// Launcher over `ops` with `config`.
    pub fn new(ops: Arc<dyn WinOps>, config: LaunchConfig) -> Self {
        Self {
            displays: DisplayDirectory::new(ops.clone()),
            spawner: ProcessSpawner::new(ops.clone()),
            placement: PlacementExecutor::new(ops.clone(), &config),
            ops,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Display lookup used for targeted requests.
    pub fn displays(&self) -> &DisplayDirectory {
        &self.displays
    }

    /// Cancel every in-flight request. Requests still waiting before their
    /// first move stop without placing or falling back.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Launch `path` and place its main window on `display`.
    ///
    /// Returns true when the window was moved onto the display, false when
    /// the fallback open was used or the request was cancelled first. Never
    /// fails.
    pub async fn launch_on_display(&self, path: impl AsRef<Path>, display: DisplayId) -> bool {
        let request = LaunchRequest::on_display(path.as_ref(), display);
        self.launch(request).await.outcome.is_targeted()
    }

    /// Open `path` through the OS default handler.
    pub async fn launch_plain(&self, path: impl AsRef<Path>) -> bool {
        let report = self.launch(LaunchRequest::plain(path.as_ref())).await;
        matches!(report.outcome, LaunchOutcome::Plain { opened: true })
    }

    /// Run one request to completion under the launcher's shutdown token.
    pub async fn launch(&self, request: LaunchRequest) -> LaunchReport {
        let cancel = self.shutdown.child_token();
        self.launch_with_cancel(request, cancel).await
    }

    /// Run one request to completion under an explicit cancellation token.
    pub async fn launch_with_cancel(
        &self,
        request: LaunchRequest,
        cancel: CancellationToken,
    ) -> LaunchReport {
        let span = info_span!(
            "launch",
            path = %request.executable_path.display(),
            display = ?request.target_display
        );
        async move {
            let mut transitions = Transitions::new();
            let outcome = self.drive(&request, &cancel, &mut transitions).await;
            LaunchReport {
                request,
                outcome,
                states: transitions.states,
            }
        }
        .instrument(span)
        .await
    }

    /// Run `request` on its own task.
    pub fn spawn_launch(&self, request: LaunchRequest) -> JoinHandle<LaunchReport> {
        let launcher = self.clone();
        tokio::spawn(async move { launcher.launch(request).await })
    }

    async fn drive(
        &self,
        request: &LaunchRequest,
        cancel: &CancellationToken,
        transitions: &mut Transitions,
    ) -> LaunchOutcome {
        let path = request.executable_path.as_path();

        let Some(display_id) = request.target_display else {
            let opened = self.open_default(path).await;
            transitions.enter(LaunchState::Done);
            return LaunchOutcome::Plain { opened };
        };
        if !self.config.targeted_placement {
            debug!("targeted placement disabled; opening plainly");
            let opened = self.open_default(path).await;
            transitions.enter(LaunchState::Done);
            return LaunchOutcome::Plain { opened };
        }

        let display = match self.displays.resolve(display_id) {
            Ok(display) => display,
            Err(reason) => {
                info!(error = %reason, "target display unavailable");
                return self.fall_back(path, reason, transitions).await;
            }
        };

        transitions.enter(LaunchState::Spawning);
        let mut process = match self.spawner.spawn(path).await {
            Ok(process) => process,
            Err(reason) => return self.fall_back(path, reason, transitions).await,
        };

        transitions.enter(LaunchState::Discovering);
        let poller = WindowPoller::new(self.ops.clone(), &self.config);
        let window = match poller.poll(&mut process, cancel).await {
            Discovery::Found(window) => window,
            Discovery::Exhausted { attempts, elapsed } => {
                warn!(attempts, ?elapsed, name = process.name(), "no window appeared");
                let reason = Error::DiscoveryTimeout { attempts, elapsed };
                return self.fall_back(path, reason, transitions).await;
            }
            Discovery::Cancelled { attempts } => {
                info!(attempts, "cancelled during discovery; leaving window untouched");
                transitions.enter(LaunchState::Cancelled);
                return LaunchOutcome::Cancelled;
            }
        };

        transitions.enter(LaunchState::Placing);
        let result = self
            .placement
            .apply(window.handle, display.bounds, cancel)
            .await;
        if result.interrupted && result.moves == 0 {
            info!(window = %window.handle, "cancelled before the first move");
            transitions.enter(LaunchState::Cancelled);
            return LaunchOutcome::Cancelled;
        }
        info!(
            window = %window.handle,
            success = result.success,
            moves = result.moves,
            interrupted = result.interrupted,
            "placement finished"
        );
        transitions.enter(LaunchState::Done);
        LaunchOutcome::Placed(result)
    }

    /// Enter `Fallback`, open the executable once, finish.
    async fn fall_back(
        &self,
        path: &Path,
        reason: Error,
        transitions: &mut Transitions,
    ) -> LaunchOutcome {
        transitions.enter(LaunchState::Fallback);
        let opened = self.open_default(path).await;
        transitions.enter(LaunchState::Done);
        LaunchOutcome::Fallback { reason, opened }
    }

    /// Default-open `path` on the blocking pool; the shell call can stall.
    async fn open_default(&self, path: &Path) -> bool {
        let ops = self.ops.clone();
        let owned = path.to_path_buf();
        let opened = match task::spawn_blocking(move || ops.open_default(&owned)).await {
            Ok(opened) => opened,
            Err(join) => {
                error!(path = %path.display(), error = %join, "default open task failed");
                return false;
            }
        };
        match opened {
            Ok(()) => {
                info!(path = %path.display(), "opened with default handler");
                true
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "default open failed");
                false
            }
        }
    }
}
