//! Display directory: a fresh snapshot of attached monitors on every query.

use std::sync::Arc;

use launch_winops::{Display, DisplayId, WinOps};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// A display paired with its shell label (`Display 2 (1920x1080)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledDisplay {
    /// Positional label, e.g. `Display 2 (1920x1080)`.
    pub label: String,
    #[serde(flatten)]
    /// The display itself.
    pub display: Display,
}

/// Read-only view of the current display configuration.
///
/// Never caches: monitors can be attached, removed or rearranged between
/// launches.
#[derive(Clone)]
pub struct DisplayDirectory {
    /// OS seam.
    ops: Arc<dyn WinOps>,
}

impl DisplayDirectory {
    /// Directory backed by `ops`.
    pub fn new(ops: Arc<dyn WinOps>) -> Self {
        Self { ops }
    }

    /// Query the OS for the current displays.
    pub fn list_displays(&self) -> Result<Vec<Display>> {
        let displays = self.ops.displays().map_err(Error::DisplayQuery)?;
        trace!(count = displays.len(), "display snapshot");
        Ok(displays)
    }

    /// Current displays with 1-based positional labels.
    pub fn labeled(&self) -> Result<Vec<LabeledDisplay>> {
        Ok(self
            .list_displays()?
            .into_iter()
            .enumerate()
            .map(|(i, display)| LabeledDisplay {
                label: display.label(i + 1),
                display,
            })
            .collect())
    }

    /// Find `id` in a fresh snapshot.
    pub fn resolve(&self, id: DisplayId) -> Result<Display> {
        let displays = self.list_displays()?;
        match displays.into_iter().find(|d| d.id == id) {
            Some(d) => {
                debug!(id, bounds = %d.bounds, "resolved display");
                Ok(d)
            }
            None => Err(Error::DisplayNotFound(id)),
        }
    }
}
