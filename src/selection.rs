//! Selection engine: per-light selection flags driven by drags and clicks.
//!
//! DESIGN
//! ======
//! While a drag is active, every drag update recomputes the whole selection
//! from cell geometry: a light is selected iff its bounds overlap the drag
//! rectangle, unioned with the previous selection when the gesture is
//! additive (ctrl/meta held at any point). Clicks are only considered while
//! no drag is active; the session enforces that gate.
//!
//! An empty selection means "all lights" for bulk edits. [`Selection::covers`]
//! encodes that policy so callers never special-case it.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::drag::DragState;
use crate::geometry::overlaps;
use crate::grid::{CellAddr, GridError, GridMap, LIGHTS_ROW_LENGTHS};
use crate::input::ClickEvent;
use crate::layout::CellGeometry;

/// One selection flag per light. Owned by the UI session, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    cells: GridMap<bool>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(&LIGHTS_ROW_LENGTHS)
    }
}

impl Selection {
    /// An empty selection over `shape`.
    #[must_use]
    pub fn new(shape: &[usize]) -> Self {
        Self { cells: GridMap::filled(shape, false) }
    }

    #[must_use]
    pub fn cells(&self) -> &GridMap<bool> {
        &self.cells
    }

    #[must_use]
    pub fn is_selected(&self, addr: CellAddr) -> bool {
        self.cells.get(addr).copied().unwrap_or(false)
    }

    /// Whether any light is selected.
    #[must_use]
    pub fn any(&self) -> bool {
        self.cells.iter().any(|(_, &selected)| selected)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.any()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|(_, selected)| **selected).count()
    }

    /// Selected addresses in row-major order.
    pub fn selected(&self) -> impl Iterator<Item = CellAddr> + '_ {
        self.cells.iter().filter(|(_, selected)| **selected).map(|(addr, _)| addr)
    }

    /// Whether a bulk edit applies to `addr`: selected, or nothing is selected.
    #[must_use]
    pub fn covers(&self, addr: CellAddr) -> bool {
        self.cells.contains(addr) && (self.is_empty() || self.is_selected(addr))
    }

    /// Set one flag. Returns whether it changed.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] if `addr` is not part of the grid.
    pub fn set(&mut self, addr: CellAddr, selected: bool) -> Result<bool, GridError> {
        let previous = self.cells.set(addr, selected)?;
        Ok(previous != selected)
    }

    /// Deselect everything. Returns whether anything changed.
    pub fn clear(&mut self) -> bool {
        let mut changed = false;
        for (_, flag) in self.cells.iter_mut() {
            changed |= *flag;
            *flag = false;
        }
        changed
    }

    /// Recompute the selection for a drag update. No-op when not dragging.
    ///
    /// Every light is measured before any flag is written, so a measurement
    /// failure leaves the selection untouched. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingBounds`] for the first light the geometry
    /// source cannot measure.
    pub fn apply_drag(
        &mut self,
        drag: &DragState,
        geometry: &dyn CellGeometry,
    ) -> Result<bool, GridError> {
        let Some(rect) = drag.rect() else {
            return Ok(false);
        };
        let additive = drag.modifier_held();

        let mut next = Vec::with_capacity(self.cells.len());
        for (addr, &previous) in self.cells.iter() {
            let bounds = geometry.cell_bounds(addr).ok_or(GridError::MissingBounds(addr))?;
            let overlapped = overlaps(rect, bounds);
            next.push(if additive { overlapped || previous } else { overlapped });
        }

        let mut changed = false;
        for ((_, flag), selected) in self.cells.iter_mut().zip(next) {
            changed |= *flag != selected;
            *flag = selected;
        }
        Ok(changed)
    }

    /// Apply click semantics. Returns whether anything changed.
    ///
    /// - clicked light with modifier: selected
    /// - any other light without modifier: deselected
    /// - everything else unchanged
    pub fn apply_click(&mut self, click: &ClickEvent) -> bool {
        let target = click.target.cell();
        let modifier = click.modifiers.multi_select();
        let mut changed = false;
        for (addr, flag) in self.cells.iter_mut() {
            let clicked = target == Some(addr);
            let next = if clicked && modifier {
                true
            } else if !clicked && !modifier {
                false
            } else {
                *flag
            };
            changed |= *flag != next;
            *flag = next;
        }
        changed
    }
}
