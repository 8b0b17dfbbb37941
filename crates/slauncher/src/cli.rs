//! Command-line interface definitions for slauncher.

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use launch_engine::LaunchConfig;
use launch_winops::DisplayId;
use logging::LogArgs;

/// Command-line interface for the `slauncher` binary.
#[derive(Parser, Debug)]
#[command(
    name = "slauncher",
    about = "Launch applications onto a chosen display",
    version
)]
pub struct Cli {
    /// Logging controls shared across slauncher binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Optional path to a launch configuration file (RON).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Timing overrides applied on top of the configuration file.
    #[command(flatten)]
    pub overrides: Overrides,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List attached displays with their labels and bounds.
    Displays(DisplaysArgs),
    /// Start an executable, optionally placing its window on a display.
    Launch(LaunchArgs),
    /// Open a file or executable with the OS default handler.
    Open(OpenArgs),
}

/// Arguments for the `displays` subcommand.
#[derive(Args, Debug, Clone)]
pub struct DisplaysArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `launch` subcommand.
#[derive(Args, Debug, Clone)]
pub struct LaunchArgs {
    /// Executable to start.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Target display id (see `slauncher displays`). Omit for a plain open.
    #[arg(long, value_name = "ID", allow_negative_numbers = true)]
    pub display: Option<DisplayId>,
}

/// Arguments for the `open` subcommand.
#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
    /// File or executable to open.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Command-line overrides for [`LaunchConfig`] timing.
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Maximum window discovery attempts.
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Interval between discovery attempts.
    #[arg(long, value_parser = humantime::parse_duration, value_name = "DURATION")]
    pub poll_interval: Option<Duration>,
}

impl Overrides {
    /// Apply every override that was given to `config`.
    pub fn apply(&self, config: &mut LaunchConfig) {
        if let Some(n) = self.max_attempts {
            config.max_attempts = n;
        }
        if let Some(interval) = self.poll_interval {
            config.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_launch_with_display() {
        let cli = Cli::try_parse_from([
            "slauncher",
            "--poll-interval",
            "250ms",
            "launch",
            "C:/apps/notes.exe",
            "--display",
            "2",
        ])
        .unwrap();
        let Commands::Launch(args) = cli.command else {
            panic!("expected launch");
        };
        assert_eq!(args.display, Some(2));
        assert_eq!(cli.overrides.poll_interval, Some(Duration::from_millis(250)));
    }

    #[test]
    fn overrides_only_touch_given_fields() {
        let mut cfg = LaunchConfig::default();
        Overrides {
            max_attempts: Some(3),
            poll_interval: None,
        }
        .apply(&mut cfg);
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.poll_interval_ms, LaunchConfig::default().poll_interval_ms);
    }

    #[test]
    fn launch_requires_path() {
        assert!(Cli::try_parse_from(["slauncher", "launch"]).is_err());
    }
}
