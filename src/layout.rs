//! Viewport geometry source: where each light currently sits on screen.
//!
//! The selection engine queries [`CellGeometry`] on every drag update. A
//! browser host implements it over element bounding boxes; [`RowLayout`] is
//! the headless implementation that lays rows out centered, the way the grid
//! is styled.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::consts::{LAYOUT_CELL_SIZE_PX, LAYOUT_GAP_PX, LIGHTS_ROW_LENGTHS};
use crate::geometry::{Point, Rect};
use crate::grid::{CellAddr, GridMap};

/// Supplies the on-screen bounding box of a light on demand.
pub trait CellGeometry {
    /// Bounding box of `addr`, or `None` if the light is not mounted.
    fn cell_bounds(&self, addr: CellAddr) -> Option<Rect>;
}

impl CellGeometry for GridMap<Rect> {
    fn cell_bounds(&self, addr: CellAddr) -> Option<Rect> {
        self.get(addr).copied()
    }
}

/// Rows of square cells, each row centered on the widest row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    shape: Vec<usize>,
    origin: Point,
    cell_size: f64,
    gap: f64,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self::new(&LIGHTS_ROW_LENGTHS, Point::new(0.0, 0.0), LAYOUT_CELL_SIZE_PX, LAYOUT_GAP_PX)
    }
}

impl RowLayout {
    #[must_use]
    pub fn new(shape: &[usize], origin: Point, cell_size: f64, gap: f64) -> Self {
        Self { shape: shape.to_vec(), origin, cell_size, gap }
    }

    /// Width of the widest row.
    #[must_use]
    pub fn width(&self) -> f64 {
        let widest = self.shape.iter().copied().max().unwrap_or(0);
        self.row_width(widest)
    }

    #[allow(clippy::cast_precision_loss)]
    fn row_width(&self, len: usize) -> f64 {
        if len == 0 {
            return 0.0;
        }
        len as f64 * (self.cell_size + self.gap) - self.gap
    }

    /// Snapshot every cell's bounds into a map.
    #[must_use]
    pub fn measure(&self) -> GridMap<Rect> {
        GridMap::build(&self.shape, |addr| self.bounds_of(addr))
    }

    #[allow(clippy::cast_precision_loss)]
    fn bounds_of(&self, addr: CellAddr) -> Rect {
        let len = self.shape.get(addr.row).copied().unwrap_or(0);
        let pitch = self.cell_size + self.gap;
        let inset = (self.width() - self.row_width(len)) / 2.0;
        Rect {
            x: self.origin.x + inset + addr.col as f64 * pitch,
            y: self.origin.y + addr.row as f64 * pitch,
            w: self.cell_size,
            h: self.cell_size,
        }
    }
}

impl CellGeometry for RowLayout {
    fn cell_bounds(&self, addr: CellAddr) -> Option<Rect> {
        let len = self.shape.get(addr.row)?;
        (addr.col < *len).then(|| self.bounds_of(addr))
    }
}
