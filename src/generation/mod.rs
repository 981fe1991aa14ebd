//! Terrain generation pipeline: base mask, patch placement, compositing.
//!
//! The pipeline orchestrates:
//! 1. Base noise (RandomGrid) smoothed by the cellular automaton
//! 2. Connectivity repair of the base (largest region or carved corridors)
//! 3. Patch placement in request order against a shared claimed layer
//! 4. Compositing into combined / expanded-base / patch-union views
//!
//! Every stochastic step owns a generator seeded from its request, so
//! independent configs can be generated concurrently.

pub mod config;
pub mod random_grid;
pub mod smoother;
pub mod patch_grower;

pub use config::{
    ConnectivityRepair, GenerationRequest, PatchSpec, PlacementStrategy, TerrainConfig,
};
pub use patch_grower::{grow_patch, PatchGrower};
pub use random_grid::random_grid;
pub use smoother::{smooth, Neighborhood, Smoother};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result, TileCode};
use crate::grid::Grid;
use crate::layer::CompositeLayers;
use crate::region::{connect_regions, keep_largest};

/// Outcome of one patch request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOutcome {
    pub name: String,
    pub tile_code: TileCode,
    /// `None` when the patch could not be produced within its attempt budget.
    pub grid: Option<Grid>,
}

impl PatchOutcome {
    pub fn is_placed(&self) -> bool {
        self.grid.is_some()
    }
}

/// Result of a full generation pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTerrain {
    /// Cleaned, connected base mask.
    pub base: Grid,
    /// One entry per requested patch, in request order.
    pub patches: Vec<PatchOutcome>,
    pub layers: CompositeLayers,
}

impl GeneratedTerrain {
    /// Names of patches that were requested but not produced.
    pub fn missing_patches(&self) -> impl Iterator<Item = &str> {
        self.patches.iter().filter(|p| !p.is_placed()).map(|p| p.name.as_str())
    }

    /// Outcome of the patch requested under `name`.
    pub fn patch(&self, name: &str) -> Result<&PatchOutcome> {
        self.patches
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::UnknownPatch(name.to_string()))
    }
}

/// Random -> smooth -> repair for one request.
///
/// With `KeepLargest` an input that smooths away entirely yields an all-empty
/// grid rather than an error.
pub fn generate_mask(
    width: usize,
    height: usize,
    request: &GenerationRequest,
    repair: ConnectivityRepair,
) -> Result<Grid> {
    request.validate()?;
    let raw = random_grid(width, height, request.fill_probability, request.tile_code, request.seed)?;
    let smoothed = request.smoother().apply(&raw, request.tile_code);
    let mask = match repair {
        ConnectivityRepair::KeepLargest => keep_largest(&smoothed, request.tile_code),
        ConnectivityRepair::CarveCorridors => connect_regions(&smoothed, request.tile_code),
    };

    log::debug!(
        "mask tile {} seed {}: {} raw -> {} smoothed -> {} kept",
        request.tile_code,
        request.seed,
        raw.count(request.tile_code),
        smoothed.count(request.tile_code),
        mask.count(request.tile_code)
    );
    Ok(mask)
}

/// Runs the generation pipeline for one `TerrainConfig`.
pub struct TerrainGenerator {
    config: TerrainConfig,
}

impl TerrainGenerator {
    /// Create a generator, validating the configuration up front.
    pub fn new(config: TerrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Generate only the base mask.
    pub fn generate_base(&self) -> Result<Grid> {
        let base = generate_mask(self.config.width, self.config.height, &self.config.base, self.config.repair)?;
        if base.is_all_empty() {
            log::warn!(
                "base tile {} (seed {}) is empty after smoothing",
                self.config.base.tile_code, self.config.base.seed
            );
        }
        Ok(base)
    }

    /// Place every requested patch against `base`, in order.
    pub fn place_patches(&self, base: &Grid) -> Result<Vec<PatchOutcome>> {
        let mut grower = PatchGrower::new(base);
        self.config
            .patches
            .iter()
            .map(|spec| {
                Ok(PatchOutcome {
                    name: spec.name.clone(),
                    tile_code: spec.tile_code,
                    grid: grower.place(spec)?,
                })
            })
            .collect()
    }

    /// Full pass: base, patches, composite.
    pub fn generate(&self) -> Result<GeneratedTerrain> {
        let base = self.generate_base()?;
        let patches = self.place_patches(&base)?;

        let layer_inputs: Vec<_> = patches
            .iter()
            .map(|p| (p.tile_code, p.grid.as_ref()))
            .collect();
        let layers = self.config.compositor.composite(&base, &layer_inputs)?;

        let placed = patches.iter().filter(|p| p.is_placed()).count();
        log::debug!(
            "generated {}x{} terrain: base {} cells, {}/{} patches, walkable {} cells",
            self.config.width,
            self.config.height,
            base.count_non_empty(),
            placed,
            patches.len(),
            layers.expanded_base.count_non_empty()
        );

        Ok(GeneratedTerrain { base, patches, layers })
    }
}

/// Generate many configs in parallel.
///
/// Results are returned in input order; a failing config does not affect
/// the others.
pub fn generate_many(configs: &[TerrainConfig]) -> Vec<Result<GeneratedTerrain>> {
    let start = std::time::Instant::now();
    let results: Vec<_> = configs
        .par_iter()
        .map(|config| TerrainGenerator::new(config.clone())?.generate())
        .collect();

    let elapsed = start.elapsed();
    log::info!(
        "Generated {} terrains in {:.1}ms ({} failed)",
        results.len(),
        elapsed.as_secs_f64() * 1000.0,
        results.iter().filter(|r| r.is_err()).count()
    );
    results
}
