//! Majority-rule cellular automaton smoothing.
//!
//! Every round reads only the previous round's grid (double-buffered), so the
//! result does not depend on scan order.

use serde::{Deserialize, Serialize};

use crate::core::TileCode;
use crate::grid::{Grid, MOORE};

/// Which cells take part in the neighbour vote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// The 8 surrounding cells, clipped at the grid boundary.
    #[default]
    Moore,
    /// The clipped 3x3 window including the cell itself (up to 9 votes).
    MooreWithCenter,
}

/// Cellular automaton pass configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Smoother {
    pub iterations: u32,
    /// A cell becomes the tile when at least this many voters hold it.
    pub threshold: u32,
    pub neighborhood: Neighborhood,
}

impl Smoother {
    pub fn new(iterations: u32, threshold: u32) -> Self {
        Self {
            iterations,
            threshold,
            neighborhood: Neighborhood::Moore,
        }
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Run all rounds and return the smoothed grid.
    ///
    /// Cells end up either `tile_code` or empty; any other code present in
    /// the input is cleared by the first round.
    pub fn apply(&self, grid: &Grid, tile_code: TileCode) -> Grid {
        let mut current = grid.clone();
        if self.iterations == 0 {
            return current;
        }

        let mut next = grid.empty_like();
        for _ in 0..self.iterations {
            for idx in 0..current.len() {
                let cell = current.coord_of(idx);
                let mut votes = current
                    .neighbors(cell, &MOORE)
                    .filter(|&n| current.get(n) == Some(tile_code))
                    .count() as u32;
                if self.neighborhood == Neighborhood::MooreWithCenter
                    && current.cells()[idx] == tile_code
                {
                    votes += 1;
                }

                next.cells_mut()[idx] = if votes >= self.threshold {
                    tile_code
                } else {
                    TileCode::EMPTY
                };
            }
            std::mem::swap(&mut current, &mut next);
        }

        log::trace!(
            "smooth: {} rounds, threshold {}, {} cells of tile {}",
            self.iterations, self.threshold, current.count(tile_code), tile_code
        );
        current
    }
}

/// Smooth `grid` for `iterations` rounds with the 8-neighbour vote.
pub fn smooth(grid: &Grid, tile_code: TileCode, iterations: u32, threshold: u32) -> Grid {
    Smoother::new(iterations, threshold).apply(grid, tile_code)
}
