//! Vector primitives consumed from the page reader.
//!
//! Coordinates use the top-left origin system shared with [`BBox`].

use crate::geometry::BBox;

/// Orientation of a line segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
    Diagonal,
}

/// A straight line segment drawn on the page.
///
/// `(x0, top)` and `(x1, bottom)` are the two endpoints as reported by the
/// page reader; they are not required to be ordered.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl Line {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Horizontal extent of the segment.
    pub fn dx(&self) -> f64 {
        (self.x1 - self.x0).abs()
    }

    /// Vertical extent of the segment.
    pub fn dy(&self) -> f64 {
        (self.bottom - self.top).abs()
    }

    /// Classify the segment, treating extents below `tolerance` as zero.
    pub fn orientation(&self, tolerance: f64) -> Orientation {
        if self.dy() < tolerance {
            Orientation::Horizontal
        } else if self.dx() < tolerance {
            Orientation::Vertical
        } else {
            Orientation::Diagonal
        }
    }
}

/// A rectangle drawn on the page (stroked or filled).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(
            self.x0.min(self.x1),
            self.top.min(self.bottom),
            self.x0.max(self.x1),
            self.top.max(self.bottom),
        )
    }
}
