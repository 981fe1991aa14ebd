//! Patch placement against a base mask.
//!
//! A `PatchGrower` owns the claimed-cell layer for one generation pass:
//! patches are placed in order and a cell claimed by an earlier patch is never
//! handed to a later one.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::{Coord, Result, TileCode};
use crate::grid::{Grid, VON_NEUMANN};
use crate::region::keep_largest;
use super::config::{PatchSpec, PlacementStrategy};
use super::random_grid::random_grid;
use super::smoother::Smoother;

/// Cells kept clear of the border when picking a growth seed.
pub const SEED_MARGIN: usize = 3;

/// Random picks allowed per attempt when looking for a usable seed cell.
pub const MAX_SEED_PICKS: u32 = 100;

/// Places patches inside (or alongside) one base mask.
pub struct PatchGrower<'a> {
    base: &'a Grid,
    claimed: Grid,
}

impl<'a> PatchGrower<'a> {
    pub fn new(base: &'a Grid) -> Self {
        Self {
            base,
            claimed: base.empty_like(),
        }
    }

    /// Union of all patches placed so far, each cell holding its patch code.
    pub fn claimed(&self) -> &Grid {
        &self.claimed
    }

    /// Place a patch using its configured strategy.
    ///
    /// Returns `None` when no candidate reached the minimum viable size
    /// within `max_attempts`. Successful patches are claimed.
    pub fn place(&mut self, spec: &PatchSpec) -> Result<Option<Grid>> {
        spec.validate()?;
        let patch = match &spec.placement {
            PlacementStrategy::GrownInsideBase => self.grow(spec)?,
            PlacementStrategy::IndependentRegion {
                fill_probability,
                smoothing_iterations,
                neighbor_threshold,
                neighborhood,
            } => {
                let smoother = Smoother::new(*smoothing_iterations, *neighbor_threshold)
                    .with_neighborhood(*neighborhood);
                self.independent(spec, *fill_probability, smoother)?
            }
        };

        match &patch {
            Some(grid) => {
                self.claim(grid);
                log::debug!(
                    "patch '{}' placed with tile {} ({} cells)",
                    spec.name, spec.tile_code, grid.count(spec.tile_code)
                );
            }
            None => log::warn!(
                "patch '{}' not produced after {} attempts (min {} cells)",
                spec.name, spec.max_attempts, spec.min_viable()
            ),
        }
        Ok(patch)
    }

    /// Seeded flood growth inside the base mask.
    ///
    /// Each attempt picks a random interior seed cell that is in the base and
    /// unclaimed, samples a target size from `size_range`, and grows
    /// breadth-first through unclaimed base cells until the target is met or
    /// the frontier runs dry. The attempt succeeds when the patch reaches half
    /// the target and the minimum viable size. Does not claim the result.
    pub fn grow(&self, spec: &PatchSpec) -> Result<Option<Grid>> {
        spec.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(spec.seed);
        let (min, max) = spec.size_range;
        let min_viable = spec.min_viable();

        for attempt in 0..spec.max_attempts {
            let Some(seed_cell) = self.pick_seed(&mut rng) else {
                log::trace!("grow '{}': attempt {} found no seed cell", spec.name, attempt);
                continue;
            };

            let target = rng.gen_range(min..=max);
            let patch = self.flood_from(seed_cell, spec.tile_code, target);
            let count = patch.count(spec.tile_code);
            log::trace!(
                "grow '{}': attempt {} from {:?}, target {}, got {}",
                spec.name, attempt, seed_cell, target, count
            );

            if count > 0 && count >= target / 2 && count >= min_viable {
                return Ok(Some(patch));
            }
        }
        Ok(None)
    }

    /// Independent smoothed-noise blob, masked against earlier claims.
    ///
    /// Attempt `k` reseeds with `seed + k`.
    fn independent(
        &self,
        spec: &PatchSpec,
        fill_probability: f64,
        smoother: Smoother,
    ) -> Result<Option<Grid>> {
        let (width, height) = self.base.dimensions();
        let min_viable = spec.min_viable();

        for attempt in 0..spec.max_attempts {
            let seed = spec.seed.wrapping_add(u64::from(attempt));
            let raw = random_grid(width, height, fill_probability, spec.tile_code, seed)?;
            let smoothed = smoother.apply(&raw, spec.tile_code);
            let patch = keep_largest(&smoothed, spec.tile_code).mask_where(&self.claimed)?;

            let count = patch.count(spec.tile_code);
            log::trace!("independent '{}': attempt {} seed {}, got {}", spec.name, attempt, seed, count);
            if count >= min_viable && count > 0 {
                return Ok(Some(patch));
            }
        }
        Ok(None)
    }

    fn pick_seed(&self, rng: &mut ChaCha8Rng) -> Option<Coord> {
        let xs = interior_range(self.base.width());
        let ys = interior_range(self.base.height());

        (0..MAX_SEED_PICKS)
            .map(|_| Coord::new(rng.gen_range(xs.clone()), rng.gen_range(ys.clone())))
            .find(|&c| self.is_open(c))
    }

    fn is_open(&self, cell: Coord) -> bool {
        matches!(self.base.get(cell), Some(code) if !code.is_empty())
            && self.claimed.get(cell) == Some(TileCode::EMPTY)
    }

    fn flood_from(&self, seed_cell: Coord, tile_code: TileCode, target: usize) -> Grid {
        let mut patch = self.base.empty_like();
        let mut visited = vec![false; patch.len()];
        let mut queue = VecDeque::from([seed_cell]);
        visited[patch.index_of(seed_cell)] = true;
        let mut count = 0;

        while count < target {
            let Some(cell) = queue.pop_front() else {
                break;
            };
            patch.set(cell, tile_code);
            count += 1;

            for next in self.base.neighbors(cell, &VON_NEUMANN) {
                let idx = patch.index_of(next);
                if !visited[idx] && self.is_open(next) {
                    visited[idx] = true;
                    queue.push_back(next);
                }
            }
        }
        patch
    }

    fn claim(&mut self, patch: &Grid) {
        for (cell, code) in patch.iter() {
            if !code.is_empty() && self.claimed.get(cell) == Some(TileCode::EMPTY) {
                self.claimed.set(cell, code);
            }
        }
    }
}

/// Seed coordinates along one axis, `SEED_MARGIN` away from both edges when
/// the axis is long enough.
fn interior_range(len: usize) -> std::ops::Range<usize> {
    if len > 2 * SEED_MARGIN {
        SEED_MARGIN..len - SEED_MARGIN
    } else {
        0..len
    }
}

/// Grow one patch inside `base_mask` with a fresh claimed layer.
///
/// Returns `None` when no attempt produced at least `size_range.0` cells.
pub fn grow_patch(
    base_mask: &Grid,
    tile_code: TileCode,
    size_range: (usize, usize),
    max_attempts: u32,
    seed: u64,
) -> Result<Option<Grid>> {
    let spec = PatchSpec {
        tile_code,
        size_range,
        max_attempts,
        seed,
        placement: PlacementStrategy::GrownInsideBase,
        ..Default::default()
    };
    PatchGrower::new(base_mask).grow(&spec)
}
