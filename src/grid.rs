//! Grid topology, cell values, and configurations.
//!
//! The light grid is a fixed, non-rectangular set of rows (see
//! [`LIGHTS_ROW_LENGTHS`]). [`GridMap`] stores one value per address in
//! row-major order and is the single owned grid structure used for colors
//! (as [`Configuration`]), selection flags, and cell bounds alike.
//!
//! A configuration persists as nested JSON arrays of `{r, g, b}` objects.
//! Decoding ignores an `a` channel if one is present.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::consts::LIGHTS_ROW_LENGTHS;

/// Address of one cell: zero-based row, then zero-based column within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddr {
    pub row: usize,
    pub col: usize,
}

impl CellAddr {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Errors raised by grid addressing and measurement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cell {0} is outside the grid")]
    OutOfRange(CellAddr),
    #[error("no bounding box available for cell {0}")]
    MissingBounds(CellAddr),
    #[error("grid shape mismatch: expected rows {expected:?}, found {found:?}")]
    ShapeMismatch { expected: Vec<usize>, found: Vec<usize> },
}

/// Errors raised while encoding or decoding a stored configuration.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid configuration json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration shape: {0}")]
    Shape(#[from] GridError),
}

// =============================================================================
// CELL VALUES
// =============================================================================

/// An opaque 8-bit-per-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB`.
    #[must_use]
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => Some(Self {
                r: hex_channel(&hex[0..1].repeat(2))?,
                g: hex_channel(&hex[1..2].repeat(2))?,
                b: hex_channel(&hex[2..3].repeat(2))?,
            }),
            6 => Some(Self {
                r: hex_channel(&hex[0..2])?,
                g: hex_channel(&hex[2..4])?,
                b: hex_channel(&hex[4..6])?,
            }),
            _ => None,
        }
    }

    /// Canonical lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn hex_channel(digits: &str) -> Option<u8> {
    u8::from_str_radix(digits, 16).ok()
}

/// A color as reported by a picker widget, with an alpha channel in `0.0..=1.0`.
///
/// Alpha is never persisted; converting to [`Rgb`] drops it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl From<Rgba> for Rgb {
    fn from(c: Rgba) -> Self {
        Self { r: c.r, g: c.g, b: c.b }
    }
}

// =============================================================================
// GRID MAP
// =============================================================================

/// One value per grid address, stored row-major.
///
/// Equality is structural: two maps are equal iff they have the same shape
/// and hold equal values at every address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridMap<T> {
    rows: Vec<Vec<T>>,
}

impl<T> GridMap<T> {
    /// Build a map over `shape` (cells per row) by calling `make` for every address.
    pub fn build(shape: &[usize], mut make: impl FnMut(CellAddr) -> T) -> Self {
        let rows = shape
            .iter()
            .enumerate()
            .map(|(row, &len)| (0..len).map(|col| make(CellAddr { row, col })).collect())
            .collect();
        Self { rows }
    }

    /// Build a map over the light grid topology.
    pub fn lights(make: impl FnMut(CellAddr) -> T) -> Self {
        Self::build(&LIGHTS_ROW_LENGTHS, make)
    }

    /// Cells per row.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    #[must_use]
    pub fn has_shape(&self, shape: &[usize]) -> bool {
        self.rows.len() == shape.len()
            && self.rows.iter().zip(shape).all(|(row, &len)| row.len() == len)
    }

    /// Whether `other` covers exactly the same addresses.
    #[must_use]
    pub fn same_shape<U>(&self, other: &GridMap<U>) -> bool {
        self.rows.len() == other.rows.len()
            && self.rows.iter().zip(&other.rows).all(|(a, b)| a.len() == b.len())
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, addr: CellAddr) -> bool {
        self.rows.get(addr.row).is_some_and(|row| addr.col < row.len())
    }

    #[must_use]
    pub fn get(&self, addr: CellAddr) -> Option<&T> {
        self.rows.get(addr.row).and_then(|row| row.get(addr.col))
    }

    pub fn get_mut(&mut self, addr: CellAddr) -> Option<&mut T> {
        self.rows.get_mut(addr.row).and_then(|row| row.get_mut(addr.col))
    }

    /// Replace the value at `addr`, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] if `addr` is not part of the grid.
    pub fn set(&mut self, addr: CellAddr, value: T) -> Result<T, GridError> {
        let slot = self.get_mut(addr).ok_or(GridError::OutOfRange(addr))?;
        Ok(std::mem::replace(slot, value))
    }

    /// Iterate addresses and values in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellAddr, &T)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells.iter().enumerate().map(move |(col, v)| (CellAddr { row, col }, v))
            })
    }

    /// Iterate addresses and mutable values in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CellAddr, &mut T)> {
        self.rows
            .iter_mut()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells.iter_mut().enumerate().map(move |(col, v)| (CellAddr { row, col }, v))
            })
    }

    /// Iterate addresses in row-major order.
    pub fn addrs(&self) -> impl Iterator<Item = CellAddr> + '_ {
        self.iter().map(|(addr, _)| addr)
    }

    /// Build a map of the same shape from this one.
    pub fn map<U>(&self, mut f: impl FnMut(CellAddr, &T) -> U) -> GridMap<U> {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells.iter().enumerate().map(|(col, v)| f(CellAddr { row, col }, v)).collect()
            })
            .collect();
        GridMap { rows }
    }

    /// Check that this map matches `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] with both shapes when they differ.
    pub fn ensure_shape(&self, shape: &[usize]) -> Result<(), GridError> {
        if self.has_shape(shape) {
            Ok(())
        } else {
            Err(GridError::ShapeMismatch { expected: shape.to_vec(), found: self.shape() })
        }
    }
}

impl<T: Clone> GridMap<T> {
    /// A map over `shape` holding `value` everywhere.
    #[must_use]
    pub fn filled(shape: &[usize], value: T) -> Self {
        Self::build(shape, |_| value.clone())
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// A complete color assignment for every light.
pub type Configuration = GridMap<Rgb>;

impl GridMap<Rgb> {
    /// Every light set to `color`, over the light grid topology.
    #[must_use]
    pub fn uniform(color: Rgb) -> Self {
        Self::filled(&LIGHTS_ROW_LENGTHS, color)
    }

    /// Serialize to the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if serialization fails.
    pub fn encode(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the stored JSON form and check it against `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] for malformed input and
    /// [`CodecError::Shape`] when the rows do not match `shape`.
    pub fn decode(json: &str, shape: &[usize]) -> Result<Self, CodecError> {
        let config: Self = serde_json::from_str(json)?;
        config.ensure_shape(shape)?;
        Ok(config)
    }
}
