//! Window discovery: find the main window the user will actually see.
//!
//! Window creation races process start, and launcher-style executables often
//! hand off to a different process before any window exists. The poller
//! therefore evaluates independent [`WindowStrategy`] values on every attempt,
//! first match wins, with a cancellable sleep between attempts.

use std::{sync::Arc, time::Duration};

use launch_winops::{SpawnedProcess, WinOps, WindowHandle, WindowInfo};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::LaunchConfig;

/// A single way of mapping a spawned process to a window.
pub trait WindowStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    /// One non-blocking lookup against the current OS state.
    fn resolve(&self, ops: &dyn WinOps, process: &mut SpawnedProcess) -> Option<WindowInfo>;
}

/// The spawned process's own main window.
///
/// Skipped once the process has exited; its pid can no longer own a window.
pub struct SpawnedProcessWindow;

impl WindowStrategy for SpawnedProcessWindow {
    fn name(&self) -> &'static str {
        "spawned-pid"
    }

    fn resolve(&self, ops: &dyn WinOps, process: &mut SpawnedProcess) -> Option<WindowInfo> {
        if ops.has_exited(process) {
            trace!(pid = process.pid(), "spawned process exited; skipping direct check");
            return None;
        }
        ops.main_window_for_pid(process.pid())
    }
}

/// Any process with the same executable base name that exposes a main window.
///
/// With several candidates the last enumerated one wins. Enumeration order
/// only tends to follow start order; this is a heuristic, not a guarantee.
pub struct NamedProcessWindow;

impl WindowStrategy for NamedProcessWindow {
    fn name(&self) -> &'static str {
        "process-name"
    }

    fn resolve(&self, ops: &dyn WinOps, process: &mut SpawnedProcess) -> Option<WindowInfo> {
        if process.name().is_empty() {
            return None;
        }
        let mut candidates = ops.main_windows_named(process.name());
        if candidates.len() > 1 {
            debug!(
                name = process.name(),
                count = candidates.len(),
                "multiple name matches; taking last enumerated"
            );
        }
        candidates.pop()
    }
}

/// A window resolved for placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWindow {
    /// Window to place.
    pub handle: WindowHandle,
    /// Process owning the window; may differ from the spawned pid.
    pub owner_pid: u32,
    /// 1-based attempt on which the window was found.
    pub attempt: u32,
    /// Name of the strategy that matched.
    pub strategy: &'static str,
}

/// Terminal result of a discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// A window was resolved.
    Found(ResolvedWindow),
    /// All attempts were used without a match.
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Time spent polling.
        elapsed: Duration,
    },
    /// The request was abandoned mid-poll.
    Cancelled {
        /// Attempts completed before cancellation.
        attempts: u32,
    },
}

/// Bounded polling loop over a list of strategies.
pub struct WindowPoller {
    /// OS seam.
    ops: Arc<dyn WinOps>,
    /// Tried in order on every attempt.
    strategies: Vec<Box<dyn WindowStrategy>>,
    /// Attempt bound.
    max_attempts: u32,
    /// Sleep between attempts.
    interval: Duration,
}

impl WindowPoller {
    /// Poller with the default strategies: spawned pid first, then name match.
    pub fn new(ops: Arc<dyn WinOps>, config: &LaunchConfig) -> Self {
        Self::with_strategies(
            ops,
            vec![Box::new(SpawnedProcessWindow), Box::new(NamedProcessWindow)],
            config.max_attempts,
            config.poll_interval(),
        )
    }

    /// Poller with explicit strategies and bounds.
    pub fn with_strategies(
        ops: Arc<dyn WinOps>,
        strategies: Vec<Box<dyn WindowStrategy>>,
        max_attempts: u32,
        interval: Duration,
    ) -> Self {
        Self {
            ops,
            strategies,
            max_attempts,
            interval,
        }
    }

    /// Upper bound on polling time: `max_attempts × interval`.
    pub fn timeout(&self) -> Duration {
        self.interval * self.max_attempts
    }

    /// Evaluate every strategy once; first match wins.
    fn attempt(&self, process: &mut SpawnedProcess, attempt: u32) -> Option<ResolvedWindow> {
        self.strategies.iter().find_map(|strategy| {
            strategy
                .resolve(self.ops.as_ref(), process)
                .map(|w| ResolvedWindow {
                    handle: w.handle,
                    owner_pid: w.pid,
                    attempt,
                    strategy: strategy.name(),
                })
        })
    }

    /// Poll until a window is found, attempts run out, or `cancel` fires.
    ///
    /// No sleep follows the final attempt, so this returns within
    /// [`timeout`](Self::timeout) even if no window ever appears.
    pub async fn poll(&self, process: &mut SpawnedProcess, cancel: &CancellationToken) -> Discovery {
        let start = Instant::now();
        let mut attempts = 0;
        while attempts < self.max_attempts {
            if cancel.is_cancelled() {
                return Discovery::Cancelled { attempts };
            }
            attempts += 1;
            if let Some(found) = self.attempt(process, attempts) {
                debug!(
                    window = %found.handle,
                    owner = found.owner_pid,
                    attempt = attempts,
                    strategy = found.strategy,
                    "window resolved"
                );
                return Discovery::Found(found);
            }
            trace!(attempt = attempts, max = self.max_attempts, "no window yet");
            if attempts == self.max_attempts {
                break;
            }
            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = cancel.cancelled() => {
                    debug!(attempts, "discovery cancelled");
                    return Discovery::Cancelled { attempts };
                }
            }
        }
        Discovery::Exhausted {
            attempts,
            elapsed: start.elapsed(),
        }
    }
}
