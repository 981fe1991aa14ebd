//! Common types used throughout the crate

use std::fmt;

use serde::{Deserialize, Serialize};

/// Terrain category stored in a grid cell.
///
/// The core never interprets codes beyond `EMPTY`; the mapping from names
/// such as "grass" or "rubble_pile" to codes lives with the caller
/// (see `scene::TilePalette`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TileCode(pub u16);

impl TileCode {
    /// Empty / unassigned cell.
    pub const EMPTY: Self = Self(0);
    /// Conventional code for the base layer.
    pub const BASE: Self = Self(1);
    /// First code handed out to patches.
    pub const FIRST_PATCH: Self = Self(2);

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl From<u16> for TileCode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for TileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cell position: `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another cell.
    pub fn manhattan(self, other: Coord) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}
