//! Window placement: move, activate, wait, move again.
//!
//! Many applications restore their own saved position shortly after their
//! window first becomes visible. A single move therefore loses the race; the
//! second move after a fixed delay wins it in practice. The order
//! move → activate → delay → move is load-bearing.

use std::{sync::Arc, time::Duration};

use launch_winops::{Point, Rect, WinOps, WindowHandle};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{config::LaunchConfig, error::Error};

/// Maximum number of moves issued per resolved window.
pub const MAX_MOVES: u8 = 2;

/// Outcome of one placement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementResult {
    /// True when the last move issued was accepted by the OS. A rejected
    /// re-apply clears it even if the first move landed (see `applied_origin`).
    pub success: bool,
    /// Origin of the last accepted move, if any.
    pub applied_origin: Option<Point>,
    /// Moves issued (0..=2).
    pub moves: u8,
    /// True when cancellation cut the sequence short.
    pub interrupted: bool,
}

/// Applies target-display placement to a resolved window.
#[derive(Clone)]
pub struct PlacementExecutor {
    /// OS seam.
    ops: Arc<dyn WinOps>,
    /// Pause before the first move.
    settle_delay: Duration,
    /// Pause before the re-applied move.
    reapply_delay: Duration,
}

impl PlacementExecutor {
    /// Executor using the delays from `config`.
    pub fn new(ops: Arc<dyn WinOps>, config: &LaunchConfig) -> Self {
        Self {
            ops,
            settle_delay: config.settle_delay(),
            reapply_delay: config.reapply_delay(),
        }
    }

    /// Move `window` onto `target`, keeping its size. Step failures are
    /// logged and never abort the sequence.
    pub async fn apply(
        &self,
        window: WindowHandle,
        target: Rect,
        cancel: &CancellationToken,
    ) -> PlacementResult {
        let origin = target.origin();
        let mut result = PlacementResult {
            success: false,
            applied_origin: None,
            moves: 0,
            interrupted: false,
        };

        if !pause(self.settle_delay, cancel).await {
            result.interrupted = true;
            return result;
        }

        self.move_once(window, origin, "move", &mut result);

        if let Err(source) = self.ops.activate_window(window) {
            let err = Error::Placement {
                step: "activate",
                source,
            };
            warn!(%window, error = %err, "activation failed");
        }

        if !pause(self.reapply_delay, cancel).await {
            debug!(%window, "placement interrupted before re-apply");
            result.interrupted = true;
            return result;
        }

        self.move_once(window, origin, "reapply", &mut result);
        result
    }

    fn move_once(
        &self,
        window: WindowHandle,
        origin: Point,
        step: &'static str,
        result: &mut PlacementResult,
    ) {
        result.moves += 1;
        match self.ops.move_window(window, origin) {
            Ok(()) => {
                debug!(%window, %origin, step, "window moved");
                result.success = true;
                result.applied_origin = Some(origin);
            }
            Err(source) => {
                let err = Error::Placement { step, source };
                warn!(%window, %origin, error = %err, "move failed");
                result.success = false;
            }
        }
    }
}

/// Sleep for `delay` unless cancelled first. Returns false on cancellation.
async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = time::sleep(delay) => true,
        _ = cancel.cancelled() => false,
    }
}

#[cfg(test)]
mod tests {
    use launch_winops::MockWinOps;
    use tokio::time::Instant;

    use super::*;

    const TARGET: Rect = Rect::new(1920, 0, 1920, 1080);

    fn executor(mock: &MockWinOps) -> PlacementExecutor {
        PlacementExecutor::new(Arc::new(mock.clone()), &LaunchConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn moves_activates_then_moves_again() {
        let mock = MockWinOps::new();
        let start = Instant::now();
        let r = executor(&mock)
            .apply(WindowHandle(0x42), TARGET, &CancellationToken::new())
            .await;
        assert!(r.success);
        assert_eq!(r.moves, MAX_MOVES);
        assert_eq!(r.applied_origin, Some(Point { x: 1920, y: 0 }));
        assert_eq!(
            mock.calls(),
            vec![
                "move:0x42@(1920,0)".to_string(),
                "activate:0x42".to_string(),
                "move:0x42@(1920,0)".to_string(),
            ]
        );
        assert!(start.elapsed() >= Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_not_retried() {
        let mock = MockWinOps::new();
        mock.set_fail_move(true);
        mock.set_fail_activate(true);
        let r = executor(&mock)
            .apply(WindowHandle(0x42), TARGET, &CancellationToken::new())
            .await;
        assert!(!r.success);
        assert_eq!(r.moves, 2);
        assert_eq!(r.applied_origin, None);
        let moves = mock.calls().iter().filter(|c| c.starts_with("move:")).count();
        assert_eq!(moves, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_reapply_skips_second_move() {
        let mock = MockWinOps::new();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });
        let r = executor(&mock).apply(WindowHandle(0x42), TARGET, &cancel).await;
        assert!(r.interrupted);
        assert_eq!(r.moves, 1);
        assert_eq!(mock.moves().len(), 1);
    }
}
