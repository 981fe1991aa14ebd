use criterion::{criterion_group, criterion_main, Criterion, black_box};

use tilegen::core::TileCode;
use tilegen::generation::{
    generate_many, grow_patch, random_grid, smooth, PatchSpec, TerrainConfig, TerrainGenerator,
};
use tilegen::grid::Grid;
use tilegen::region::{find_regions, keep_largest};

fn bench_smooth_30x20(c: &mut Criterion) {
    let grid = random_grid(30, 20, 0.65, TileCode::BASE, 42).unwrap();

    c.bench_function("smooth_30x20_x4", |b| {
        b.iter(|| smooth(black_box(&grid), TileCode::BASE, 4, 5));
    });
}

fn bench_smooth_256(c: &mut Criterion) {
    let grid = random_grid(256, 256, 0.55, TileCode::BASE, 42).unwrap();

    c.bench_function("smooth_256_x4", |b| {
        b.iter(|| smooth(black_box(&grid), TileCode::BASE, 4, 5));
    });
}

fn bench_find_regions_256(c: &mut Criterion) {
    let grid = random_grid(256, 256, 0.5, TileCode::BASE, 7).unwrap();

    c.bench_function("find_regions_256", |b| {
        b.iter(|| find_regions(black_box(&grid), TileCode::BASE));
    });
}

fn bench_grow_patch(c: &mut Criterion) {
    let raw = random_grid(30, 20, 0.65, TileCode::BASE, 42).unwrap();
    let base = keep_largest(&smooth(&raw, TileCode::BASE, 4, 5), TileCode::BASE);

    c.bench_function("grow_patch_30x20", |b| {
        b.iter(|| grow_patch(black_box(&base), TileCode(2), (20, 40), 50, 1234));
    });
}

fn scene_config(seed: u64) -> TerrainConfig {
    let mut config = TerrainConfig {
        patches: vec![
            PatchSpec::new("rubble_pile", TileCode(2)),
            PatchSpec::new("puddle", TileCode(3)).with_seed(1235),
        ],
        ..Default::default()
    };
    config.base.seed = seed;
    config
}

fn bench_full_pipeline(c: &mut Criterion) {
    let generator = TerrainGenerator::new(scene_config(42)).unwrap();

    c.bench_function("pipeline_30x20_two_patches", |b| {
        b.iter(|| generator.generate());
    });
}

fn bench_generate_many(c: &mut Criterion) {
    let configs: Vec<_> = (0..64).map(scene_config).collect();

    c.bench_function("generate_many_64", |b| {
        b.iter(|| generate_many(black_box(&configs)));
    });
}

fn bench_grid_json(c: &mut Criterion) {
    let grid = Grid::filled(30, 20, TileCode::BASE).unwrap();

    c.bench_function("grid_to_json_30x20", |b| {
        b.iter(|| serde_json::to_string(black_box(&grid)));
    });
}

criterion_group!(
    benches,
    bench_smooth_30x20,
    bench_smooth_256,
    bench_find_regions_256,
    bench_grow_patch,
    bench_full_pipeline,
    bench_generate_many,
    bench_grid_json,
);
criterion_main!(benches);
