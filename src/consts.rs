//! Shared constants for the lightboard crate.

use crate::grid::Rgb;

// ── Grid topology ───────────────────────────────────────────────

/// Cells per row of the light grid, top to bottom.
pub const LIGHTS_ROW_LENGTHS: [usize; 11] = [3, 7, 9, 9, 11, 11, 11, 9, 9, 7, 3];

/// Color of every cell in a freshly created configuration.
pub const DEFAULT_LIGHT_COLOR: Rgb = Rgb { r: 255, g: 0, b: 0 };

// ── Pointer input ───────────────────────────────────────────────

/// Minimum extent in pixels before a pressed pointer counts as a drag.
pub const DEFAULT_DRAG_DISTANCE_PX: f64 = 3.0;

/// Pointer-move sampling window in milliseconds (~60 Hz).
pub const DEFAULT_DRAG_THROTTLE_MS: u64 = 16;

// ── Notifications ───────────────────────────────────────────────

/// Auto-dismiss delay for notifications in milliseconds. 0 disables.
pub const DEFAULT_NOTIFY_DELAY_MS: u64 = 6000;

// ── Headless layout ─────────────────────────────────────────────

/// Edge length of one light in the headless row layout, in pixels.
pub const LAYOUT_CELL_SIZE_PX: f64 = 20.0;

/// Horizontal and vertical spacing between lights, in pixels.
pub const LAYOUT_GAP_PX: f64 = 4.0;
