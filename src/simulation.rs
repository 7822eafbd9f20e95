/*
 * Simulation Module
 *
 * This module drives the flock one fixed tick at a time. A tick runs in two
 * strictly ordered phases:
 * 1. Index: the spatial grid is brought up to date with every boid's position.
 * 2. Steer and move: each boid's steering force is computed from the
 *    unchanged pre-tick state (optionally in parallel), and only after every
 *    force is known are drag, integration and wrapping applied.
 *
 * Because forces are buffered before any boid moves, no boid ever observes a
 * neighbor's new position within the same tick.
 */

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, trace_span};

use crate::boid::{Boid, BoidId};
use crate::error::ConfigError;
use crate::params::{IndexMaintenance, NeighborSearch, SimulationParams};
use crate::spatial_grid::SpatialGrid;
use crate::vector::Vec2;

pub struct Simulation {
    params: SimulationParams,
    boids: Vec<Boid>,
    grid: SpatialGrid,
    // Steering force per boid for the tick in progress
    forces: Vec<Vec2>,
    // Scratch for the sequential brute force search
    neighbor_buffer: Vec<usize>,
    rng: ChaCha8Rng,
    tick_count: u64,
}

/// Aggregate numbers for logging a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockStats {
    pub boids: usize,
    pub mean_speed: f64,
    pub max_speed: f64,
    pub centroid: Vec2,
}

impl Simulation {
    /// Validates `params` and spawns `num_boids` boids, seeded from
    /// `params.seed` when set.
    pub fn new(params: SimulationParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut rng = seeded_rng(params.seed);
        let boids = spawn_population(&mut rng, &params);
        debug!(boids = boids.len(), seed = ?params.seed, "spawned population");

        Self::assemble(params, boids, rng)
    }

    /// Builds a simulation around a caller-provided population. The
    /// population size in `params` is replaced by `boids.len()`.
    pub fn from_boids(mut params: SimulationParams, boids: Vec<Boid>) -> Result<Self, ConfigError> {
        params.num_boids = boids.len();
        params.validate()?;
        let rng = seeded_rng(params.seed);
        Self::assemble(params, boids, rng)
    }

    fn assemble(params: SimulationParams, mut boids: Vec<Boid>, rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        let grid = SpatialGrid::from_params(&params)?;
        for boid in &mut boids {
            boid.cell = None;
        }

        Ok(Self {
            forces: Vec::with_capacity(boids.len()),
            params,
            boids,
            grid,
            neighbor_buffer: Vec::new(),
            rng,
            tick_count: 0,
        })
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // Advance by the configured fixed step
    pub fn step(&mut self) {
        self.tick(self.params.dt());
    }

    /// Advances every boid by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        let _span = trace_span!("tick", tick = self.tick_count, boids = self.boids.len()).entered();

        self.update_index();
        self.compute_forces();

        for (boid, &force) in self.boids.iter_mut().zip(&self.forces) {
            boid.advance(force, &self.params, dt);
        }

        self.tick_count += 1;
    }

    fn update_index(&mut self) {
        if self.params.neighbor_search != NeighborSearch::Grid {
            return;
        }

        match self.params.index_maintenance {
            IndexMaintenance::Rebuild => self.grid.populate(&mut self.boids),
            IndexMaintenance::Incremental => {
                for (i, boid) in self.boids.iter_mut().enumerate() {
                    self.grid.relocate(i, boid);
                }
            }
        }
    }

    // Fill `forces` from the pre-tick snapshot; nothing moves in here
    fn compute_forces(&mut self) {
        let search = self.params.neighbor_search;
        let radius_squared = self.params.vision_radius_squared();

        if self.params.enable_parallel {
            let boids = &self.boids;
            let grid = &self.grid;
            let params = &self.params;

            boids
                .par_iter()
                .enumerate()
                .map_init(Vec::new, |neighbors, (i, boid)| {
                    match search {
                        NeighborSearch::Grid => grid.collect_neighbors(boids, i, neighbors),
                        NeighborSearch::BruteForce => brute_force_neighbors(boids, i, radius_squared, neighbors),
                    }
                    boid.steering_force(boids, neighbors, params)
                })
                .collect_into_vec(&mut self.forces);
        } else {
            self.forces.clear();

            for i in 0..self.boids.len() {
                let neighbors: &[usize] = match search {
                    NeighborSearch::Grid => self.grid.query_neighbors(&self.boids, i),
                    NeighborSearch::BruteForce => {
                        brute_force_neighbors(&self.boids, i, radius_squared, &mut self.neighbor_buffer);
                        self.neighbor_buffer.as_slice()
                    }
                };

                let force = self.boids[i].steering_force(&self.boids, neighbors, &self.params);
                self.forces.push(force);
            }
        }
    }

    /// Respawns the population from the simulation's RNG; a fresh run.
    pub fn reset(&mut self) {
        self.boids = spawn_population(&mut self.rng, &self.params);
        self.grid.clear();
        self.tick_count = 0;
        debug!(boids = self.boids.len(), "reset population");
    }

    /// Swaps in new parameters. The grid is rebuilt when the window or vision
    /// radius changed, and the population is respawned when its size changed.
    /// Invalid parameters are rejected and the old ones stay in effect.
    pub fn update_params(&mut self, params: SimulationParams) -> Result<(), ConfigError> {
        params.validate()?;

        let geometry_changed = params.vision_radius != self.params.vision_radius
            || params.window_width != self.params.window_width
            || params.window_height != self.params.window_height;
        let population_changed = params.num_boids != self.params.num_boids;

        if geometry_changed {
            self.grid = SpatialGrid::from_params(&params)?;
            for boid in &mut self.boids {
                boid.cell = None;
            }
        }

        self.params = params;

        if population_changed {
            self.reset();
        }

        Ok(())
    }

    pub fn stats(&self) -> FlockStats {
        let count = self.boids.len();
        if count == 0 {
            return FlockStats {
                boids: 0,
                mean_speed: 0.0,
                max_speed: 0.0,
                centroid: Vec2::ZERO,
            };
        }

        let mut speed_sum = 0.0;
        let mut max_speed: f64 = 0.0;
        let mut position_sum = Vec2::ZERO;
        for boid in &self.boids {
            let speed = boid.velocity.length();
            speed_sum += speed;
            max_speed = max_speed.max(speed);
            position_sum += boid.position;
        }

        FlockStats {
            boids: count,
            mean_speed: speed_sum / count as f64,
            max_speed,
            centroid: position_sum / count as f64,
        }
    }
}

/// Quadratic neighbor search over every pair, with the same inclusive radius
/// as the grid query.
pub fn brute_force_neighbors(boids: &[Boid], index: usize, radius_squared: f64, out: &mut Vec<usize>) {
    out.clear();
    let boid = &boids[index];
    for (other_index, other) in boids.iter().enumerate() {
        if other_index != index && boid.distance_squared_to(other) <= radius_squared {
            out.push(other_index);
        }
    }
}

pub fn spawn_population(rng: &mut ChaCha8Rng, params: &SimulationParams) -> Vec<Boid> {
    (0..params.num_boids)
        .map(|i| Boid::random(BoidId(i), &mut *rng, params))
        .collect()
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
