//! Configuration buffer: the staged, locally edited copy of a configuration.
//!
//! The buffer keeps the authoritative configuration it was derived from as a
//! baseline. Dirtiness is structural comparison against that baseline, so
//! staging a cell back to its original value makes the buffer clean again.

#[cfg(test)]
#[path = "buffer_test.rs"]
mod buffer_test;

use crate::grid::{CellAddr, Configuration, GridError, Rgb};
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBuffer {
    baseline: Configuration,
    staged: Configuration,
}

impl ConfigBuffer {
    /// A clean buffer over `authoritative`.
    #[must_use]
    pub fn new(authoritative: Configuration) -> Self {
        Self { staged: authoritative.clone(), baseline: authoritative }
    }

    #[must_use]
    pub fn staged(&self) -> &Configuration {
        &self.staged
    }

    #[must_use]
    pub fn baseline(&self) -> &Configuration {
        &self.baseline
    }

    /// Overwrite one cell. Returns whether the staged value changed.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] if `addr` is not part of the grid.
    pub fn stage(&mut self, addr: CellAddr, value: Rgb) -> Result<bool, GridError> {
        let previous = self.staged.set(addr, value)?;
        Ok(previous != value)
    }

    /// Overwrite every cell matching `predicate`. Returns how many changed.
    pub fn stage_many(&mut self, mut predicate: impl FnMut(CellAddr) -> bool, value: Rgb) -> usize {
        let mut changed = 0;
        for (addr, slot) in self.staged.iter_mut() {
            if predicate(addr) && *slot != value {
                *slot = value;
                changed += 1;
            }
        }
        changed
    }

    /// Bulk edit over `selection`; every cell when nothing is selected.
    pub fn stage_selection(&mut self, selection: &Selection, value: Rgb) -> usize {
        self.stage_many(|addr| selection.covers(addr), value)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.staged != self.baseline
    }

    /// Drop every staged edit. Returns whether anything was dropped.
    pub fn discard(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        self.staged.clone_from(&self.baseline);
        true
    }

    /// Replace the baseline after a successful write, keeping staged edits.
    pub fn rebase(&mut self, authoritative: &Configuration) {
        self.baseline.clone_from(authoritative);
    }

    /// Staged value of the first selected cell in row-major order, or of the
    /// first cell when nothing is selected.
    ///
    /// An empty grid yields black.
    #[must_use]
    pub fn first_selected_value(&self, selection: &Selection) -> Rgb {
        let addr = selection.selected().next().unwrap_or(CellAddr::new(0, 0));
        self.staged.get(addr).copied().unwrap_or_default()
    }
}
