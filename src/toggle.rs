//! Open/close toggles for the bulk color picker and the per-light pickers.
//!
//! Open requests are applied on the next scheduling turn, so the click that
//! requested them cannot also be seen as an outside click that closes the
//! picker again. While open, a click outside the picker or an Escape key
//! press closes it immediately.
//!
//! [`OpenToggle`] backs the single bulk picker. [`LightPickers`] tracks which
//! light, if any, has its own picker open; opening one closes the others
//! because the click that opens it lands outside them.

#[cfg(test)]
#[path = "toggle_test.rs"]
mod toggle_test;

use crate::grid::CellAddr;
use crate::input::{ClickEvent, ClickTarget, Key};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenToggle {
    open: bool,
    deferred: Option<bool>,
}

impl OpenToggle {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Request a state for the next turn. A later request in the same turn wins.
    pub fn request(&mut self, open: bool) {
        self.deferred = Some(open);
    }

    /// Request the opposite of the current state.
    pub fn request_toggle(&mut self) {
        self.request(!self.open);
    }

    /// Apply a deferred request. Returns whether the state changed.
    pub fn next_turn(&mut self) -> bool {
        match self.deferred.take() {
            Some(open) if open != self.open => {
                self.open = open;
                true
            }
            _ => false,
        }
    }

    /// Observe a click anywhere. Returns whether it closed the picker.
    pub fn on_click(&mut self, click: &ClickEvent) -> bool {
        if click.target == ClickTarget::Picker {
            return false;
        }
        self.close()
    }

    /// Observe a key press. Only Escape while open has an effect.
    pub fn on_key(&mut self, key: &Key) -> bool {
        key.is_escape() && self.close()
    }

    fn close(&mut self) -> bool {
        let was_open = self.open;
        self.open = false;
        was_open
    }
}

/// Which light's own color picker is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightPickers {
    open: Option<CellAddr>,
    deferred: Option<(CellAddr, bool)>,
}

impl LightPickers {
    #[must_use]
    pub fn open_light(&self) -> Option<CellAddr> {
        self.open
    }

    #[must_use]
    pub fn is_open(&self, addr: CellAddr) -> bool {
        self.open == Some(addr)
    }

    /// Request a state for `addr` on the next turn. A later request in the same turn wins.
    pub fn request(&mut self, addr: CellAddr, open: bool) {
        self.deferred = Some((addr, open));
    }

    /// Request the opposite of the current state of `addr`.
    pub fn request_toggle(&mut self, addr: CellAddr) {
        self.request(addr, !self.is_open(addr));
    }

    /// Apply a deferred request. Returns whether the open light changed.
    pub fn next_turn(&mut self) -> bool {
        let Some((addr, open)) = self.deferred.take() else {
            return false;
        };
        let next = match (open, self.open) {
            (true, _) => Some(addr),
            (false, Some(current)) if current == addr => None,
            (false, current) => current,
        };
        let changed = next != self.open;
        self.open = next;
        changed
    }

    /// Observe a click anywhere. Clicks outside the open light's subtree close
    /// its picker. Returns whether one was closed.
    pub fn on_click(&mut self, click: &ClickEvent) -> bool {
        if self.open.is_some() && click.target.cell() == self.open {
            return false;
        }
        self.open.take().is_some()
    }

    /// Observe a key press. Only Escape while a picker is open has an effect.
    pub fn on_key(&mut self, key: &Key) -> bool {
        key.is_escape() && self.open.take().is_some()
    }

    /// Close everything, including a pending request.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
