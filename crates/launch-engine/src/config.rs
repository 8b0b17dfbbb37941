//! Tunables for targeted launches.
//!
//! Loaded from a RON file; every field is optional and falls back to the
//! defaults below, e.g.
//!
//! ```ron
//! (max_attempts: 20, poll_interval_ms: 250)
//! ```

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Discovery attempts before giving up.
pub const MAX_ATTEMPTS: u32 = 40;
/// Sleep between discovery attempts.
pub const POLL_INTERVAL_MS: u64 = 500;
/// Pause between resolving a window and the first move.
pub const SETTLE_DELAY_MS: u64 = 200;
/// Pause between activation and the second move.
pub const REAPPLY_DELAY_MS: u64 = 1000;

const fn default_max_attempts() -> u32 {
    MAX_ATTEMPTS
}
const fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL_MS
}
const fn default_settle_delay_ms() -> u64 {
    SETTLE_DELAY_MS
}
const fn default_reapply_delay_ms() -> u64 {
    REAPPLY_DELAY_MS
}
const fn default_true() -> bool {
    true
}

/// Timing and gating for the targeted launch path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchConfig {
    /// Upper bound on window discovery attempts.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Milliseconds slept between discovery attempts.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Milliseconds to wait before the first move.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Milliseconds between activation and the re-applied move.
    #[serde(default = "default_reapply_delay_ms")]
    pub reapply_delay_ms: u64,
    /// When false, display-targeted launches degrade to a plain open.
    #[serde(default = "default_true")]
    pub targeted_placement: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            poll_interval_ms: POLL_INTERVAL_MS,
            settle_delay_ms: SETTLE_DELAY_MS,
            reapply_delay_ms: REAPPLY_DELAY_MS,
            targeted_placement: true,
        }
    }
}

impl LaunchConfig {
    /// Sleep between discovery attempts.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Pause before the first move.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Pause between activation and the second move.
    pub fn reapply_delay(&self) -> Duration {
        Duration::from_millis(self.reapply_delay_ms)
    }

    /// Worst-case wall-clock time spent in discovery.
    pub fn discovery_timeout(&self) -> Duration {
        self.poll_interval() * self.max_attempts
    }

    /// Reject configurations that would make discovery meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        let cfg: Self = ron::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a RON config file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bound_discovery_to_twenty_seconds() {
        let cfg = LaunchConfig::default();
        assert_eq!(cfg.max_attempts, 40);
        assert_eq!(cfg.discovery_timeout(), Duration::from_secs(20));
        assert_eq!(cfg.settle_delay(), Duration::from_millis(200));
        assert_eq!(cfg.reapply_delay(), Duration::from_secs(1));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let cfg = LaunchConfig::from_ron("(max_attempts: 5, targeted_placement: false)").unwrap();
        assert_eq!(cfg.max_attempts, 5);
        assert!(!cfg.targeted_placement);
        assert_eq!(cfg.poll_interval_ms, POLL_INTERVAL_MS);
        assert_eq!(LaunchConfig::from_ron("()").unwrap(), LaunchConfig::default());
    }

    #[test]
    fn rejects_zero_attempts_and_unknown_fields() {
        assert!(matches!(
            LaunchConfig::from_ron("(max_attempts: 0)"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            LaunchConfig::from_ron("(retries: 3)"),
            Err(Error::ConfigParse(_))
        ));
    }
}
