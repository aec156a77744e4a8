//! Input model: modifier keys, pointer buttons, and raw UI events.
//!
//! These are the events the host forwards from its event loop. Pointer events
//! feed the [`crate::drag::DragTracker`]; clicks feed the selection engine's
//! click semantics; key presses drive the picker toggle. Positions are in
//! screen space, timestamps in milliseconds from an arbitrary origin.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::grid::CellAddr;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or meta, the modifier that makes a selection gesture additive.
    #[must_use]
    pub fn multi_select(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button, pen contact, or single-finger touch.
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Position in screen space.
    pub position: Point,
    #[serde(default)]
    pub button: Button,
    /// Whether this pointer is the primary pointer of its type.
    #[serde(default = "yes")]
    pub is_primary: bool,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Event time in milliseconds.
    #[serde(default)]
    pub timestamp_ms: u64,
    /// Whether the event happened over the grid surface (as opposed to
    /// elsewhere in the viewport).
    #[serde(default = "yes")]
    pub on_surface: bool,
}

fn yes() -> bool {
    true
}

impl PointerEvent {
    /// A primary-button event over the grid surface.
    #[must_use]
    pub fn primary(phase: PointerPhase, position: Point, timestamp_ms: u64) -> Self {
        Self {
            phase,
            position,
            button: Button::Primary,
            is_primary: true,
            modifiers: Modifiers::default(),
            timestamp_ms,
            on_surface: true,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn off_surface(mut self) -> Self {
        self.on_surface = false;
        self
    }

    /// Primary button of the primary pointer.
    #[must_use]
    pub fn is_primary_button(&self) -> bool {
        self.button == Button::Primary && self.is_primary
    }
}

/// Where a click landed, resolved from the event's element path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ClickTarget {
    /// On the color dot of one light.
    Cell { row: usize, col: usize },
    /// Inside the open color picker of one light. Part of that light's subtree.
    LightPicker { row: usize, col: usize },
    /// On the grid surface but not on any light.
    Surface,
    /// On the bulk color picker or its trigger button.
    Picker,
    /// Outside the grid surface and the picker.
    Outside,
}

impl ClickTarget {
    /// The light whose subtree contains the click, if any.
    #[must_use]
    pub fn cell(self) -> Option<CellAddr> {
        match self {
            Self::Cell { row, col } | Self::LightPicker { row, col } => Some(CellAddr { row, col }),
            _ => None,
        }
    }
}

/// A click (pointer-down followed by pointer-up) as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub target: ClickTarget,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl ClickEvent {
    #[must_use]
    pub fn on_cell(addr: CellAddr, modifiers: Modifiers) -> Self {
        Self { target: ClickTarget::Cell { row: addr.row, col: addr.col }, modifiers }
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Host platform, used only for the selection hint shown above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    MacOs,
    Windows,
    Mobile,
    #[default]
    Other,
}

impl Platform {
    /// Classify an OS name as reported by a user-agent parser.
    #[must_use]
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "Mac OS" => Self::MacOs,
            "Windows" => Self::Windows,
            "Android" | "BlackBerry" | "iOS" | "Windows Phone" | "Windows Mobile" => Self::Mobile,
            _ => Self::Other,
        }
    }

    /// Instruction line describing how to select lights on this platform.
    #[must_use]
    pub fn selection_hint(self) -> &'static str {
        match self {
            Self::MacOs => "⌘+click or drag to select",
            Self::Mobile => "drag to select",
            Self::Windows | Self::Other => "ctrl+click or drag to select",
        }
    }
}
