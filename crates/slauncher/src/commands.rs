//! Subcommand implementations.

use std::fmt::Write as _;

use launch_engine::{LabeledDisplay, LaunchOutcome, LaunchReport, LaunchRequest, Launcher};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    cli::{DisplaysArgs, LaunchArgs, OpenArgs},
    error::Result,
};

/// Print the current displays.
pub fn displays(launcher: &Launcher, args: &DisplaysArgs) -> Result<()> {
    let displays = launcher.displays().labeled()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&displays)?);
    } else {
        print!("{}", display_table(&displays));
    }
    Ok(())
}

/// Run a launch request, cancelling it on Ctrl-C.
///
/// Launch failures are reported, not returned: the request has always
/// degraded to something by the time it finishes.
pub async fn launch(launcher: &Launcher, args: &LaunchArgs) -> Result<()> {
    let request = LaunchRequest {
        executable_path: args.path.clone(),
        target_display: args.display,
    };
    let report = run_until_interrupted(launcher, request).await?;
    println!("{}", describe(&report));
    Ok(())
}

/// Open a path through the OS default handler.
pub async fn open(launcher: &Launcher, args: &OpenArgs) -> Result<()> {
    let report = run_until_interrupted(launcher, LaunchRequest::plain(args.path.clone())).await?;
    println!("{}", describe(&report));
    Ok(())
}

/// Drive `request` on its own task; Ctrl-C triggers launcher shutdown.
async fn run_until_interrupted(launcher: &Launcher, request: LaunchRequest) -> Result<LaunchReport> {
    let mut task = launcher.spawn_launch(request);
    tokio::select! {
        report = &mut task => Ok(report?),
        interrupted = signal::ctrl_c() => {
            if let Err(err) = interrupted {
                warn!(error = %err, "ctrl-c handler unavailable; waiting for launch");
            } else {
                info!("interrupted; cancelling launch");
                launcher.shutdown();
            }
            Ok(task.await?)
        }
    }
}

/// Plain-text table of displays, one per line.
fn display_table(displays: &[LabeledDisplay]) -> String {
    let mut out = String::new();
    for d in displays {
        let primary = if d.display.primary { " primary" } else { "" };
        writeln!(
            out,
            "{:>4}  {:<24} {}{}",
            d.display.id, d.label, d.display.bounds, primary
        )
        .ok();
    }
    out
}

/// One-line summary of a finished request.
fn describe(report: &LaunchReport) -> String {
    let path = report.request.executable_path.display();
    match &report.outcome {
        LaunchOutcome::Placed(result) => {
            let display = report.request.target_display.unwrap_or_default();
            match (result.success, result.applied_origin) {
                (true, Some(origin)) => format!(
                    "launched {path} on display {display} at {origin} ({} moves)",
                    result.moves
                ),
                (false, Some(origin)) => format!(
                    "launched {path} on display {display} at {origin}; final re-apply was rejected"
                ),
                (_, None) => {
                    format!("launched {path}; placement on display {display} was not applied")
                }
            }
        }
        LaunchOutcome::Plain { opened: true } => format!("opened {path}"),
        LaunchOutcome::Plain { opened: false } => format!("could not open {path}"),
        LaunchOutcome::Fallback { reason, opened } => {
            let verb = if *opened { "opened" } else { "could not open" };
            format!("{verb} {path} without placement: {reason}")
        }
        LaunchOutcome::Cancelled => format!("launch of {path} cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use launch_engine::{Error, LaunchState, PlacementResult};
    use launch_winops::{Display, Point, Rect};

    use super::*;

    fn report(outcome: LaunchOutcome) -> LaunchReport {
        LaunchReport {
            request: LaunchRequest::on_display("notes.exe", 2),
            outcome,
            states: vec![LaunchState::Idle, LaunchState::Done],
        }
    }

    #[test]
    fn describes_placement() {
        let r = report(LaunchOutcome::Placed(PlacementResult {
            success: true,
            applied_origin: Some(Point { x: 1920, y: 0 }),
            moves: 2,
            interrupted: false,
        }));
        let text = describe(&r);
        assert!(text.contains("display 2"), "{text}");
        assert!(text.contains("1920"), "{text}");
    }

    #[test]
    fn rejected_reapply_still_reports_landed_move() {
        let r = report(LaunchOutcome::Placed(PlacementResult {
            success: false,
            applied_origin: Some(Point { x: 1920, y: 0 }),
            moves: 2,
            interrupted: false,
        }));
        let text = describe(&r);
        assert!(text.contains("at (1920,0)"), "{text}");
        assert!(text.contains("re-apply was rejected"), "{text}");
        assert!(!text.contains("not applied"), "{text}");
    }

    #[test]
    fn describes_unapplied_placement() {
        let r = report(LaunchOutcome::Placed(PlacementResult {
            success: false,
            applied_origin: None,
            moves: 2,
            interrupted: false,
        }));
        assert!(describe(&r).contains("was not applied"));
    }

    #[test]
    fn describes_fallback_reason() {
        let r = report(LaunchOutcome::Fallback {
            reason: Error::DisplayNotFound(2),
            opened: true,
        });
        assert_eq!(
            describe(&r),
            "opened notes.exe without placement: display 2 not found"
        );
    }

    #[test]
    fn table_marks_primary() {
        let rows = vec![LabeledDisplay {
            label: "Display 1 (1920x1080)".into(),
            display: Display {
                id: 1,
                bounds: Rect::new(0, 0, 1920, 1080),
                primary: true,
            },
        }];
        let table = display_table(&rows);
        assert!(table.contains("Display 1 (1920x1080)"));
        assert!(table.trim_end().ends_with("primary"));
    }
}
