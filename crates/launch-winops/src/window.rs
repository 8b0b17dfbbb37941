//! Display and window value types.

use std::fmt::{Display as FmtDisplay, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::geom::Rect;

/// Stable integer identifier of a display for the lifetime of one request.
pub type DisplayId = i64;

/// A physical display as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    /// OS display number (`\\.\DISPLAY2` -> 2).
    pub id: DisplayId,
    /// Full monitor bounds in virtual-desktop pixels.
    pub bounds: Rect,
    /// True for the display holding the desktop origin.
    pub primary: bool,
}

impl Display {
    /// Human label used by the launcher shell, e.g. `Display 2 (1920x1080)`.
    ///
    /// `position` is the 1-based enumeration position, not the id.
    pub fn label(&self, position: usize) -> String {
        format!(
            "Display {} ({}x{})",
            position, self.bounds.width, self.bounds.height
        )
    }
}

/// Opaque native top-level window handle (an `HWND` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub isize);

impl FmtDisplay for WindowHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:#x}", self.0)
    }
}

/// A visible, unowned top-level window: the "main window" of its process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Native handle.
    pub handle: WindowHandle,
    /// Owning process id.
    pub pid: u32,
    /// Window title at enumeration time.
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_uses_position_and_size() {
        let d = Display {
            id: 2,
            bounds: Rect::new(1920, 0, 2560, 1440),
            primary: false,
        };
        assert_eq!(d.label(2), "Display 2 (2560x1440)");
        assert_eq!(WindowHandle(0x1f2e).to_string(), "0x1f2e");
    }
}
