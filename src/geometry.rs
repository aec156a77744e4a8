//! Screen-space points and axis-aligned rectangles.
//!
//! Everything here is pure. The drag tracker produces a [`Rect`] via
//! [`normalize`] and the selection engine tests it against each cell's
//! bounding box with [`overlaps`].

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Largest per-axis distance to `other` (Chebyshev distance).
    #[must_use]
    pub fn chebyshev(self, other: Point) -> f64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Axis-aligned rectangle with a top-left origin and non-negative size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "width")]
    pub w: f64,
    #[serde(rename = "height")]
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Whether the rectangle has zero area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.w == 0.0 || self.h == 0.0
    }
}

/// Build the rectangle spanned by two arbitrary corner points.
#[must_use]
pub fn normalize(p1: Point, p2: Point) -> Rect {
    Rect {
        x: p1.x.min(p2.x),
        y: p1.y.min(p2.y),
        w: (p1.x - p2.x).abs(),
        h: (p1.y - p2.y).abs(),
    }
}

/// Strict separating-axis overlap test. Shared edges do not overlap.
#[must_use]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}
