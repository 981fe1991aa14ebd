//! Seeded Bernoulli grid initialisation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::{Error, Result, TileCode};
use crate::grid::Grid;

/// Fill a `width x height` grid where each cell independently becomes
/// `tile_code` with probability `fill_probability`, otherwise empty.
///
/// Uses its own `ChaCha8Rng` seeded from `seed`, so the same arguments always
/// give the same grid and no generator state is shared with other calls.
pub fn random_grid(
    width: usize,
    height: usize,
    fill_probability: f64,
    tile_code: TileCode,
    seed: u64,
) -> Result<Grid> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_grid_with(&mut rng, width, height, fill_probability, tile_code)
}

/// Like [`random_grid`] but draws from a caller-owned generator.
pub fn random_grid_with<R: Rng>(
    rng: &mut R,
    width: usize,
    height: usize,
    fill_probability: f64,
    tile_code: TileCode,
) -> Result<Grid> {
    validate_probability(fill_probability)?;
    if tile_code.is_empty() {
        return Err(Error::ReservedTileCode);
    }

    let mut grid = Grid::new(width, height)?;
    for cell in grid.cells_mut() {
        if rng.gen_bool(fill_probability) {
            *cell = tile_code;
        }
    }
    Ok(grid)
}

/// Fill probabilities must lie strictly between 0 and 1.
pub fn validate_probability(p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidProbability(p))
    }
}
