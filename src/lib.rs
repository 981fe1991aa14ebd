//! Tilegen - cellular-automaton tile terrain generation
//!
//! Produces a connected walkable base layer on a rectangular tile grid and
//! composites named patch layers on top of it.

pub mod core;
pub mod grid;
pub mod region;
pub mod generation;
pub mod layer;
pub mod scene;

pub use crate::core::{Coord, Error, Result, TileCode};
pub use grid::Grid;
