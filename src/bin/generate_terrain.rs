//! Terrain generator binary: builds base + patch tile maps for scenes.
//!
//! Usage: cargo run --release --bin generate_terrain -- [OPTIONS]
//!
//! Options:
//!   --scenes <PATH>   Scene batch JSON (default: one built-in scene)
//!   --out <DIR>       Write one JSON file per scene into DIR
//!   --seed <SEED>     Override the base seed of every scene
//!   --width <W>       Override grid width
//!   --height <H>      Override grid height
//!   --jobs <N>        Max parallel scene builds (default: 4)
//!   --quiet           Do not print tile matrices
//!
//! Output structure:
//!   <out>/
//!     scene_00.json   # grids (rows of tile codes) + legend + missing patches
//!     ...

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::json;

use tilegen::generation::{generate_many, GeneratedTerrain, PlacementStrategy};
use tilegen::scene::{SceneBatch, SceneConfig, ScenePatch, TilePalette};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let scenes_path = parse_str_arg(&args, "--scenes").map(PathBuf::from);
    let out_dir = parse_str_arg(&args, "--out").map(PathBuf::from);
    let seed = parse_u64_arg(&args, "--seed");
    let width = parse_usize_arg(&args, "--width");
    let height = parse_usize_arg(&args, "--height");
    let jobs = parse_usize_arg(&args, "--jobs").unwrap_or(4);
    let quiet = args.iter().any(|a| a == "--quiet");

    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .expect("Failed to configure thread pool");

    let mut batch = match &scenes_path {
        Some(path) => SceneBatch::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => default_batch(),
    };
    for scene in &mut batch.scenes {
        if let Some(seed) = seed {
            scene.base_seed = seed;
        }
        if let Some(width) = width {
            scene.width = width;
        }
        if let Some(height) = height {
            scene.height = height;
        }
    }

    println!("=== Tilegen Terrain Generator ===");
    println!("Scenes: {}", batch.scenes.len());
    println!("Source: {}", scenes_path.as_deref().map_or("built-in".into(), |p| p.display().to_string()));
    println!("Jobs:   {} parallel", jobs);
    println!();

    // Phase 1: Resolve names to tile codes
    let mut resolved = Vec::with_capacity(batch.scenes.len());
    for scene in &batch.scenes {
        match scene.to_terrain_config() {
            Ok((config, palette)) => resolved.push((scene, config, palette)),
            Err(e) => eprintln!("Skipping scene '{}': {}", scene.title, e),
        }
    }

    // Phase 2: Generate
    let start = Instant::now();
    let configs: Vec<_> = resolved.iter().map(|(_, config, _)| config.clone()).collect();
    let results = generate_many(&configs);
    let elapsed = start.elapsed();

    if let Some(dir) = &out_dir {
        std::fs::create_dir_all(dir).expect("Failed to create output directory");
    }

    // Phase 3: Report and write
    let mut failed = 0;
    for (i, ((scene, _, palette), result)) in resolved.iter().zip(results).enumerate() {
        let terrain = match result {
            Ok(terrain) => terrain,
            Err(e) => {
                eprintln!("Scene '{}' failed: {}", scene.title, e);
                failed += 1;
                continue;
            }
        };

        print_summary(i, scene, palette, &terrain, quiet);

        if let Some(dir) = &out_dir {
            let path = dir.join(format!("scene_{:02}.json", i));
            write_scene(&path, scene, palette, &terrain);
        }
    }

    println!("=== Generation Complete ===");
    println!("Scenes: {} generated, {} failed in {:.1}ms",
        resolved.len() - failed, failed, elapsed.as_secs_f64() * 1000.0);
    if let Some(dir) = &out_dir {
        println!("Output: {}", dir.display());
    }
}

fn default_batch() -> SceneBatch {
    SceneBatch {
        scenes: vec![SceneConfig {
            title: "Collapsed Market".to_string(),
            patches: vec![
                ScenePatch::named("rubble_pile"),
                ScenePatch {
                    placement: PlacementStrategy::independent(),
                    ..ScenePatch::named("puddle")
                },
            ],
            ..Default::default()
        }],
    }
}

fn print_summary(i: usize, scene: &SceneConfig, palette: &TilePalette, terrain: &GeneratedTerrain, quiet: bool) {
    println!("Scene {}: {}", i + 1, scene.title);
    println!("  Base terrain: {} ({} cells)", palette.base_name(), terrain.base.count_non_empty());
    for outcome in &terrain.patches {
        match &outcome.grid {
            Some(grid) => println!("  Patch {} [{}]: {} cells",
                outcome.name, outcome.tile_code, grid.count(outcome.tile_code)),
            None => println!("  Patch {} [{}]: not placed", outcome.name, outcome.tile_code),
        }
    }
    if !quiet {
        println!("\nCombined:\n{}", terrain.layers.combined);
        println!("\nExpanded base:\n{}", terrain.layers.expanded_base);
    }
    println!();
}

fn write_scene(path: &Path, scene: &SceneConfig, palette: &TilePalette, terrain: &GeneratedTerrain) {
    let document = json!({
        "title": scene.title,
        "width": scene.width,
        "height": scene.height,
        "legend": palette.legend().iter().map(|(code, name)| {
            json!({"code": code, "name": name})
        }).collect::<Vec<_>>(),
        "missing_patches": terrain.missing_patches().collect::<Vec<_>>(),
        "base": terrain.base,
        "combined": terrain.layers.combined,
        "expanded_base": terrain.layers.expanded_base,
        "patch_union": terrain.layers.patch_union,
    });

    let text = serde_json::to_string_pretty(&document).expect("Failed to serialize scene");
    std::fs::write(path, text).expect("Failed to write scene file");
    log::info!("Wrote {}", path.display());
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
