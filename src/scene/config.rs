//! Scene files: per-scene base terrain and patch requests.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Result, TileCode};
use crate::generation::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::generation::{
    ConnectivityRepair, GenerationRequest, Neighborhood, PatchSpec, PlacementStrategy, TerrainConfig,
};
use crate::layer::LayerCompositor;
use super::palette::TilePalette;

/// Base terrain of a scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneBase {
    pub name: String,
    pub fill_probability: f64,
    pub smoothing_iterations: u32,
    pub neighbor_threshold: u32,
    pub neighborhood: Neighborhood,
    /// Falls back to the scene's `base_seed`.
    pub seed: Option<u64>,
}

impl Default for SceneBase {
    fn default() -> Self {
        let request = GenerationRequest::default();
        Self {
            name: "grass".to_string(),
            fill_probability: request.fill_probability,
            smoothing_iterations: request.smoothing_iterations,
            neighbor_threshold: request.neighbor_threshold,
            neighborhood: request.neighborhood,
            seed: None,
        }
    }
}

/// One named patch in a scene. The tile code is assigned by the palette.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenePatch {
    pub name: String,
    pub size_range: (usize, usize),
    pub min_tiles: Option<usize>,
    pub max_attempts: u32,
    pub placement: PlacementStrategy,
    /// Falls back to `patch_seed + index`.
    pub seed: Option<u64>,
}

impl Default for ScenePatch {
    fn default() -> Self {
        let spec = PatchSpec::default();
        Self {
            name: String::new(),
            size_range: spec.size_range,
            min_tiles: spec.min_tiles,
            max_attempts: spec.max_attempts,
            placement: spec.placement,
            seed: None,
        }
    }
}

impl ScenePatch {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A scene: one base terrain and any number of patches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub base: SceneBase,
    pub patches: Vec<ScenePatch>,
    pub base_seed: u64,
    pub patch_seed: u64,
    pub repair: ConnectivityRepair,
    pub compositor: LayerCompositor,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "scene".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            base: SceneBase::default(),
            patches: Vec::new(),
            base_seed: 42,
            patch_seed: 1234,
            repair: ConnectivityRepair::default(),
            compositor: LayerCompositor::default(),
        }
    }
}

impl SceneConfig {
    /// Resolve names to tile codes and build the generator config.
    ///
    /// Patch codes and fallback seeds are assigned in listing order over the
    /// patches that are kept. A repeated patch name is dropped after its first
    /// occurrence, as is a patch named after the base terrain.
    pub fn to_terrain_config(&self) -> Result<(TerrainConfig, TilePalette)> {
        let mut palette = TilePalette::new(self.base.name.clone());
        let mut patches: Vec<PatchSpec> = Vec::with_capacity(self.patches.len());

        for patch in &self.patches {
            if patch.name == palette.base_name() {
                log::warn!("scene '{}': patch '{}' shares the base terrain name, ignored", self.title, patch.name);
                continue;
            }
            if palette.code_of(&patch.name).is_some() {
                log::warn!("scene '{}': duplicate terrain '{}' ignored", self.title, patch.name);
                continue;
            }
            let index = patches.len() as u64;
            let tile_code = palette.allocate(&patch.name)?;
            patches.push(PatchSpec {
                name: patch.name.clone(),
                tile_code,
                size_range: patch.size_range,
                min_tiles: patch.min_tiles,
                max_attempts: patch.max_attempts,
                placement: patch.placement.clone(),
                seed: patch.seed.unwrap_or_else(|| self.patch_seed.wrapping_add(index)),
            });
        }

        let config = TerrainConfig {
            width: self.width,
            height: self.height,
            base: GenerationRequest {
                tile_code: TileCode::BASE,
                fill_probability: self.base.fill_probability,
                smoothing_iterations: self.base.smoothing_iterations,
                neighbor_threshold: self.base.neighbor_threshold,
                neighborhood: self.base.neighborhood,
                seed: self.base.seed.unwrap_or(self.base_seed),
            },
            repair: self.repair,
            patches,
            compositor: self.compositor,
        };
        config.validate()?;
        Ok((config, palette))
    }
}

/// A list of scenes stored as one JSON file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneBatch {
    pub scenes: Vec<SceneConfig>,
}

impl SceneBatch {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;

    fn scene() -> SceneConfig {
        SceneConfig {
            title: "Collapsed Market".to_string(),
            patches: vec![ScenePatch::named("rubble_pile"), ScenePatch::named("puddle")],
            ..Default::default()
        }
    }

    #[test]
    fn test_codes_and_seeds_assigned_in_order() {
        let (config, palette) = scene().to_terrain_config().unwrap();
        assert_eq!(config.base.seed, 42);
        assert_eq!(config.patches[0].tile_code, TileCode(2));
        assert_eq!(config.patches[0].seed, 1234);
        assert_eq!(config.patches[1].tile_code, TileCode(3));
        assert_eq!(config.patches[1].seed, 1235);
        assert_eq!(palette.name_of(TileCode(3)), Some("puddle"));
    }

    #[test]
    fn test_duplicate_patch_dropped() {
        let mut scene = scene();
        scene.patches.push(ScenePatch::named("rubble_pile"));
        let (config, palette) = scene.to_terrain_config().unwrap();
        assert_eq!(config.patches.len(), 2);
        assert_eq!(palette.patch_count(), 2);
    }

    #[test]
    fn test_dropped_patch_keeps_later_seeds() {
        let mut scene = scene();
        scene.patches.insert(1, ScenePatch::named("rubble_pile"));
        scene.patches.insert(0, ScenePatch::named("grass"));
        let (config, palette) = scene.to_terrain_config().unwrap();
        assert_eq!(config.patches.len(), 2);
        assert_eq!(config.patches[1].name, "puddle");
        assert_eq!(config.patches[1].tile_code, TileCode(3));
        assert_eq!(config.patches[1].seed, 1235);
        assert_eq!(palette.code_of("grass"), Some(TileCode::BASE));
    }

    #[test]
    fn test_explicit_seed_wins() {
        let mut scene = scene();
        scene.base.seed = Some(7);
        scene.patches[1].seed = Some(99);
        let (config, _) = scene.to_terrain_config().unwrap();
        assert_eq!(config.base.seed, 7);
        assert_eq!(config.patches[1].seed, 99);
    }

    #[test]
    fn test_invalid_scene_rejected() {
        let mut scene = scene();
        scene.base.fill_probability = 1.2;
        assert!(matches!(scene.to_terrain_config(), Err(Error::InvalidProbability(_))));
    }

    #[test]
    fn test_minimal_json() {
        let json = r#"{
            "scenes": [
                {
                    "title": "Forest Edge",
                    "base": { "name": "mud" },
                    "patches": [
                        { "name": "fallen_log", "size_range": [10, 20] },
                        { "name": "moss", "placement": { "strategy": "independent_region",
                          "fill_probability": 0.5, "smoothing_iterations": 2, "neighbor_threshold": 5 } }
                    ]
                }
            ]
        }"#;
        let batch: SceneBatch = serde_json::from_str(json).unwrap();
        let scene = &batch.scenes[0];
        assert_eq!(scene.width, 30);
        assert_eq!(scene.base.name, "mud");
        assert_eq!(scene.patches[0].size_range, (10, 20));
        assert_eq!(scene.patches[1].placement, PlacementStrategy::independent());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes").join("story.json");
        let batch = SceneBatch { scenes: vec![scene()] };

        batch.save(&path).unwrap();
        let loaded = SceneBatch::load(&path).unwrap();
        assert_eq!(loaded, batch);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneBatch::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
