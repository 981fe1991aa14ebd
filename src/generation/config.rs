//! Generation requests and pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result, TileCode};
use crate::layer::LayerCompositor;
use super::random_grid::validate_probability;
use super::smoother::{Neighborhood, Smoother};

/// Canonical grid size of the scene maps.
pub const DEFAULT_WIDTH: usize = 30;
pub const DEFAULT_HEIGHT: usize = 20;

/// Everything needed to reproduce one stochastic, smoothed grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    pub tile_code: TileCode,
    /// Chance that a cell starts as `tile_code`, in (0, 1).
    pub fill_probability: f64,
    pub smoothing_iterations: u32,
    /// Votes needed for a cell to survive a smoothing round (0..=8 for Moore).
    pub neighbor_threshold: u32,
    pub neighborhood: Neighborhood,
    pub seed: u64,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            tile_code: TileCode::BASE,
            fill_probability: 0.65,
            smoothing_iterations: 4,
            neighbor_threshold: 5,
            neighborhood: Neighborhood::Moore,
            seed: 42,
        }
    }
}

impl GenerationRequest {
    pub fn smoother(&self) -> Smoother {
        Smoother::new(self.smoothing_iterations, self.neighbor_threshold)
            .with_neighborhood(self.neighborhood)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_code.is_empty() {
            return Err(Error::ReservedTileCode);
        }
        validate_probability(self.fill_probability)
    }
}

/// How a patch is placed relative to the base mask.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Generate the patch as its own smoothed noise blob, ignoring the base.
    IndependentRegion {
        fill_probability: f64,
        smoothing_iterations: u32,
        neighbor_threshold: u32,
        #[serde(default)]
        neighborhood: Neighborhood,
    },
    /// Flood-grow the patch from a random seed cell inside the base mask.
    #[default]
    GrownInsideBase,
}

impl PlacementStrategy {
    /// Independent placement with the scripts' patch noise settings.
    pub fn independent() -> Self {
        Self::IndependentRegion {
            fill_probability: 0.5,
            smoothing_iterations: 2,
            neighbor_threshold: 5,
            neighborhood: Neighborhood::Moore,
        }
    }
}

/// A named patch request. Consumed once per generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchSpec {
    pub name: String,
    pub tile_code: TileCode,
    /// Inclusive `(min, max)` tile count. `max` bounds the growth target of
    /// `GrownInsideBase`; `min` is the smallest patch accepted.
    pub size_range: (usize, usize),
    /// Overrides `size_range.0` as the minimum viable size.
    pub min_tiles: Option<usize>,
    pub max_attempts: u32,
    pub placement: PlacementStrategy,
    pub seed: u64,
}

impl Default for PatchSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            tile_code: TileCode::FIRST_PATCH,
            size_range: (20, 40),
            min_tiles: None,
            max_attempts: 50,
            placement: PlacementStrategy::default(),
            seed: 1234,
        }
    }
}

impl PatchSpec {
    pub fn new(name: impl Into<String>, tile_code: TileCode) -> Self {
        Self {
            name: name.into(),
            tile_code,
            ..Default::default()
        }
    }

    pub fn with_size_range(mut self, min: usize, max: usize) -> Self {
        self.size_range = (min, max);
        self
    }

    pub fn with_placement(mut self, placement: PlacementStrategy) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_min_tiles(mut self, min_tiles: usize) -> Self {
        self.min_tiles = Some(min_tiles);
        self
    }

    /// Smallest tile count a produced patch may have.
    pub fn min_viable(&self) -> usize {
        self.min_tiles.unwrap_or(self.size_range.0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_code.is_empty() {
            return Err(Error::ReservedTileCode);
        }
        let (min, max) = self.size_range;
        if min > max || max == 0 {
            return Err(Error::InvalidSizeRange { min, max });
        }
        // A patch never grows past `max`, so a larger floor is unreachable.
        if let Some(min_tiles) = self.min_tiles.filter(|&m| m > max) {
            return Err(Error::InvalidSizeRange { min: min_tiles, max });
        }
        if let PlacementStrategy::IndependentRegion { fill_probability, .. } = self.placement {
            validate_probability(fill_probability)?;
        }
        Ok(())
    }
}

/// How the base layer is made into a single walkable component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityRepair {
    /// Keep the largest region and drop the rest.
    #[default]
    KeepLargest,
    /// Keep every region and carve corridors between them.
    CarveCorridors,
}

/// Configuration for one terrain generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: usize,
    pub height: usize,
    pub base: GenerationRequest,
    pub repair: ConnectivityRepair,
    /// Placed in order; earlier patches claim contested cells.
    pub patches: Vec<PatchSpec>,
    pub compositor: LayerCompositor,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            base: GenerationRequest::default(),
            repair: ConnectivityRepair::default(),
            patches: Vec::new(),
            compositor: LayerCompositor::default(),
        }
    }
}

impl TerrainConfig {
    /// Check everything that would otherwise fail mid-pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimension { width: self.width, height: self.height });
        }
        self.base.validate()?;
        for patch in &self.patches {
            patch.validate()?;
        }
        Ok(())
    }
}
