/*
 * Boid Simulation Benchmark
 *
 * This file contains benchmarks for the boid simulation to identify performance bottlenecks.
 * It measures the performance of key operations like spatial partitioning, force calculations,
 * and the overall update loop, plus the grid against the brute force neighbor search.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use flocksim::simulation::{brute_force_neighbors, spawn_population};
use flocksim::{NeighborSearch, Simulation, SimulationParams, SpatialGrid};

const SIZES: [usize; 4] = [100, 500, 1000, 2000];

fn params_for(num_boids: usize) -> SimulationParams {
    SimulationParams {
        num_boids,
        seed: Some(42),
        ..SimulationParams::default()
    }
}

// Benchmark the spatial grid operations
fn bench_spatial_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_grid");

    for &n in SIZES.iter() {
        let params = params_for(n);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut boids = spawn_population(&mut rng, &params);
        let mut grid = SpatialGrid::from_params(&params).unwrap();

        group.bench_with_input(BenchmarkId::new("populate", n), &n, |b, _| {
            b.iter(|| {
                grid.populate(black_box(&mut boids));
            });
        });

        group.bench_with_input(BenchmarkId::new("query_all", n), &n, |b, _| {
            grid.populate(&mut boids);
            b.iter(|| {
                let mut total = 0;
                for i in 0..boids.len() {
                    total += grid.query_neighbors(&boids, i).len();
                }
                black_box(total)
            });
        });
    }

    group.finish();
}

// Benchmark the force calculations (separation, alignment, cohesion)
fn bench_force_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_calculations");

    for &n in SIZES.iter() {
        let params = params_for(n);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut boids = spawn_population(&mut rng, &params);
        let mut grid = SpatialGrid::from_params(&params).unwrap();
        grid.populate(&mut boids);

        let neighbor_lists: Vec<Vec<usize>> = (0..boids.len())
            .map(|i| grid.query_neighbors(&boids, i).to_vec())
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                for (boid, neighbors) in boids.iter().zip(&neighbor_lists) {
                    black_box(boid.steering_force(&boids, neighbors, &params));
                }
            });
        });
    }

    group.finish();
}

// Benchmark the overall update loop
fn bench_update_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_loop");

    for &n in SIZES.iter() {
        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, &n| {
            let mut sim = Simulation::new(params_for(n)).unwrap();
            b.iter(|| sim.step());
        });

        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |b, &n| {
            let mut sim = Simulation::new(SimulationParams {
                enable_parallel: true,
                ..params_for(n)
            })
            .unwrap();
            b.iter(|| sim.step());
        });
    }

    group.finish();
}

// Grid lookups against the quadratic scan they replace
fn bench_neighbor_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_search");

    for &n in SIZES.iter() {
        let params = params_for(n);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut boids = spawn_population(&mut rng, &params);
        let mut grid = SpatialGrid::from_params(&params).unwrap();
        grid.populate(&mut boids);
        let radius_squared = params.vision_radius_squared();

        group.bench_with_input(BenchmarkId::new("grid", n), &n, |b, _| {
            let mut out = Vec::new();
            b.iter(|| {
                for i in 0..boids.len() {
                    grid.collect_neighbors(&boids, i, &mut out);
                    black_box(out.len());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("brute_force", n), &n, |b, _| {
            let mut out = Vec::new();
            b.iter(|| {
                for i in 0..boids.len() {
                    brute_force_neighbors(&boids, i, radius_squared, &mut out);
                    black_box(out.len());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("brute_force_tick", n), &n, |b, &n| {
            let mut sim = Simulation::new(SimulationParams {
                neighbor_search: NeighborSearch::BruteForce,
                ..params_for(n)
            })
            .unwrap();
            b.iter(|| sim.step());
        });
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_spatial_grid, bench_force_calculations, bench_update_loop, bench_neighbor_search
}

criterion_main!(benches);
