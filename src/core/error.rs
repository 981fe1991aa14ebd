//! Error types for terrain generation

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: usize, height: usize },

    #[error("fill probability {0} outside the open interval (0, 1)")]
    InvalidProbability(f64),

    #[error("tile code 0 is reserved for empty cells")]
    ReservedTileCode,

    #[error("invalid patch size range ({min}, {max})")]
    InvalidSizeRange { min: usize, max: usize },

    #[error("grid dimensions {found:?} do not match {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown patch: {0}")]
    UnknownPatch(String),

    #[error("no tile code left for terrain '{0}'")]
    PaletteExhausted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
