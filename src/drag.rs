//! Pointer drag tracker: raw pointer events in, drag snapshots out.
//!
//! The tracker is a small state machine over primary-button events:
//!
//! ```text
//! Idle --down--> Pressed --move past threshold--> Dragging
//!   ^                |                               |
//!   +------- up -----+--------------- up ------------+
//! ```
//!
//! Each accepted event recomputes a [`DragState`] snapshot. [`DragTracker::handle`]
//! returns the snapshot only when it differs from the previous one, so
//! consumers never recompute selection for an unchanged gesture.
//!
//! Moves are sampled at most once per throttle window. Pointer-up is never
//! throttled and is accepted anywhere in the viewport, not only over the
//! grid surface.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::consts::{DEFAULT_DRAG_DISTANCE_PX, DEFAULT_DRAG_THROTTLE_MS};
use crate::geometry::{Point, Rect, normalize};
use crate::input::{PointerEvent, PointerPhase};

/// Thresholds for drag recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Minimum Chebyshev extent in pixels before a press counts as a drag.
    pub min_distance_px: f64,
    /// Minimum spacing between accepted move samples, in milliseconds.
    pub throttle_ms: u64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { min_distance_px: DEFAULT_DRAG_DISTANCE_PX, throttle_ms: DEFAULT_DRAG_THROTTLE_MS }
    }
}

/// Published drag snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress. Also covers a press that has not moved far enough.
    #[default]
    NotDragging,
    /// An active rectangular drag.
    Dragging {
        start: Point,
        end: Point,
        /// Ctrl or meta was held at some sample of this gesture.
        modifier_held: bool,
    },
}

impl DragState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// The normalized drag rectangle, if dragging.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        match *self {
            Self::Dragging { start, end, .. } => Some(normalize(start, end)),
            Self::NotDragging => None,
        }
    }

    #[must_use]
    pub fn modifier_held(&self) -> bool {
        matches!(self, Self::Dragging { modifier_held: true, .. })
    }
}

/// Internal gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// Waiting for the next primary pointer-down.
    #[default]
    Idle,
    /// Pressed, but the pointer has not moved past the drag threshold.
    Pressed { start: Point, end: Point, modifier_held: bool },
    /// Pressed and moved past the drag threshold.
    Dragging { start: Point, end: Point, modifier_held: bool },
}

/// Converts a pointer event stream into [`DragState`] snapshots.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    config: DragConfig,
    gesture: Gesture,
    last_sample_ms: Option<u64>,
    snapshot: DragState,
}

impl DragTracker {
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn state(&self) -> DragState {
        self.snapshot
    }

    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Feed one pointer event. Returns the new snapshot if it changed.
    pub fn handle(&mut self, event: &PointerEvent) -> Option<DragState> {
        match event.phase {
            PointerPhase::Down => self.on_down(event),
            PointerPhase::Move => self.on_move(event),
            PointerPhase::Up => self.on_up(event),
        }
    }

    /// Abandon any gesture in progress, e.g. when the grid is torn down.
    pub fn reset(&mut self) -> Option<DragState> {
        self.gesture = Gesture::Idle;
        self.last_sample_ms = None;
        self.publish()
    }

    fn on_down(&mut self, event: &PointerEvent) -> Option<DragState> {
        if !event.is_primary_button() || !event.on_surface {
            return None;
        }
        self.gesture = Gesture::Pressed {
            start: event.position,
            end: event.position,
            modifier_held: event.modifiers.multi_select(),
        };
        self.last_sample_ms = None;
        self.publish()
    }

    fn on_move(&mut self, event: &PointerEvent) -> Option<DragState> {
        if !event.is_primary || !event.on_surface {
            return None;
        }
        let (start, held) = match self.gesture {
            Gesture::Idle => return None,
            Gesture::Pressed { start, modifier_held, .. }
            | Gesture::Dragging { start, modifier_held, .. } => (start, modifier_held),
        };
        if let Some(last) = self.last_sample_ms {
            if event.timestamp_ms < last.saturating_add(self.config.throttle_ms) {
                return None;
            }
        }
        self.last_sample_ms = Some(event.timestamp_ms);

        let end = event.position;
        let modifier_held = held || event.modifiers.multi_select();
        self.gesture = if start.chebyshev(end) >= self.config.min_distance_px {
            Gesture::Dragging { start, end, modifier_held }
        } else {
            Gesture::Pressed { start, end, modifier_held }
        };
        self.publish()
    }

    fn on_up(&mut self, event: &PointerEvent) -> Option<DragState> {
        if !event.is_primary_button() {
            return None;
        }
        self.gesture = Gesture::Idle;
        self.last_sample_ms = None;
        self.publish()
    }

    fn publish(&mut self) -> Option<DragState> {
        let next = match self.gesture {
            Gesture::Dragging { start, end, modifier_held } => {
                DragState::Dragging { start, end, modifier_held }
            }
            Gesture::Idle | Gesture::Pressed { .. } => DragState::NotDragging,
        };
        if next == self.snapshot {
            return None;
        }
        self.snapshot = next;
        Some(next)
    }
}
