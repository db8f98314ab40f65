//! Benchmarks for the world tick, the hot path of a running session.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sim_soviet::city::terrain::{TerrainGrid, TerrainKind};
use sim_soviet::core::config::SimulationConfig;
use sim_soviet::simulation::{save_to_json, SimulationWorld};

fn founded(seed: u64) -> (SimulationWorld, ChaCha8Rng) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let world = SimulationWorld::new(
        SimulationConfig::default(),
        TerrainGrid::filled(32, 32, TerrainKind::Plains),
        &mut rng,
    )
    .expect("default config founds a settlement");
    (world, rng)
}

fn bench_single_tick(c: &mut Criterion) {
    c.bench_function("single_tick", |b| {
        b.iter_batched(
            || founded(42),
            |(mut world, mut rng)| black_box(world.tick(&mut rng).ok()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_one_year(c: &mut Criterion) {
    c.bench_function("one_year_360_ticks", |b| {
        b.iter_batched(
            || founded(42),
            |(mut world, mut rng)| {
                for _ in 0..360 {
                    if world.tick(&mut rng).is_err() {
                        break;
                    }
                }
                black_box(world.score())
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_snapshot_and_save(c: &mut Criterion) {
    let (mut world, mut rng) = founded(7);
    for _ in 0..360 {
        if world.tick(&mut rng).is_err() {
            break;
        }
    }
    c.bench_function("snapshot", |b| b.iter(|| black_box(world.snapshot())));
    c.bench_function("save_to_json", |b| b.iter(|| black_box(save_to_json(&world).ok())));
}

criterion_group!(benches, bench_single_tick, bench_one_year, bench_snapshot_and_save);
criterion_main!(benches);
