//! Process spawner.

use std::{io, path::Path, sync::Arc};

use launch_winops::{SpawnedProcess, WinOps};
use tokio::task;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Starts executables detached from the launcher.
#[derive(Clone)]
pub struct ProcessSpawner {
    /// OS seam.
    ops: Arc<dyn WinOps>,
}

impl ProcessSpawner {
    /// Spawner backed by `ops`.
    pub fn new(ops: Arc<dyn WinOps>) -> Self {
        Self { ops }
    }

    /// Start `path`. Every call starts a new process; nothing is de-duplicated.
    ///
    /// The OS call can block (shell association lookup), so it runs on the
    /// blocking pool.
    pub async fn spawn(&self, path: &Path) -> Result<SpawnedProcess> {
        let ops = self.ops.clone();
        let owned = path.to_path_buf();
        let spawned = task::spawn_blocking(move || ops.spawn_detached(&owned))
            .await
            .unwrap_or_else(|join| Err(launch_winops::Error::Io(io::Error::other(join))));
        match spawned {
            Ok(process) => {
                info!(
                    pid = process.pid(),
                    name = process.name(),
                    path = %process.path().display(),
                    tracked = process.is_tracked(),
                    "spawned"
                );
                Ok(process)
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "spawn failed");
                Err(Error::Spawn {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
}
