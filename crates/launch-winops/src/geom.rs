//! Pixel geometry in the global virtual-desktop coordinate space.
//! The primary display's top-left is (0, 0); other displays may sit at negative offsets.

use std::fmt::{Display as FmtDisplay, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// A pixel position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the primary display's left edge.
    pub x: i32,
    /// Vertical offset from the primary display's top edge.
    pub y: i32,
}

/// An axis-aligned pixel rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Rectangle from origin and size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from Win32-style edges (`left, top, right, bottom`).
    #[inline]
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

impl FmtDisplay for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl FmtDisplay for Rect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "({},{} {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_edges_matches_monitor_rect() {
        let r = Rect::from_edges(1920, 0, 3840, 1080);
        assert_eq!(r, Rect::new(1920, 0, 1920, 1080));
        assert_eq!(r.origin(), Point { x: 1920, y: 0 });
    }
}
