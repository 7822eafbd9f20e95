/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid follows three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Rules read neighbors as indices into a slice of boids holding the pre-tick
 * snapshot, so one boid's force never sees another boid's new position.
 */

use std::f64::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use crate::params::SimulationParams;
use crate::spatial_grid::CellCoord;
use crate::vector::{SteeringVector, Vec2};

// Separation divides by squared distance; keep it away from zero
pub const MIN_DISTANCE_SQUARED: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoidId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub id: BoidId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    // Total acceleration used by the last integration, kept for the force overlay
    pub last_acceleration: Vec2,
    // Grid cell recorded at the last insertion; the grid owns placement
    pub cell: Option<CellCoord>,
}

impl Boid {
    pub fn new(id: BoidId, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id,
            position,
            velocity,
            acceleration: Vec2::ZERO,
            last_acceleration: Vec2::ZERO,
            cell: None,
        }
    }

    // Spawn somewhere in the window, heading in a uniformly random direction
    pub fn random<R: Rng + ?Sized>(id: BoidId, rng: &mut R, params: &SimulationParams) -> Self {
        let position = Vec2::new(
            rng.gen_range(0.0..params.window_width),
            rng.gen_range(0.0..params.window_height),
        );

        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(params.min_speed..=params.max_starting_speed);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

        Self::new(id, position, velocity)
    }

    #[inline]
    pub fn distance_squared_to(&self, other: &Boid) -> f64 {
        self.position.distance_squared(other.position)
    }

    // Calculate separation force (avoid crowding neighbors)
    pub fn separation(&self, boids: &[Boid], neighbors: &[usize], params: &SimulationParams) -> Vec2 {
        let separation_radius_sq = params.separation_radius_squared();
        let mut separation = Vec2::ZERO;

        for &i in neighbors {
            let other = &boids[i];
            let distance_squared = self.distance_squared_to(other).max(MIN_DISTANCE_SQUARED);

            if distance_squared <= separation_radius_sq {
                // Inverse-square repulsion away from the neighbor
                let difference = self.position - other.position;
                separation += difference.normalized() / distance_squared;
            }
        }

        if separation == Vec2::ZERO {
            return Vec2::ZERO;
        }

        separation /= neighbors.len() as f64;

        // Reynolds: steering = desired - velocity
        let desired = separation.normalized() * params.max_speed;
        (desired - self.velocity).clamp_magnitude(params.max_force)
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    pub fn alignment(&self, boids: &[Boid], neighbors: &[usize], params: &SimulationParams) -> Vec2 {
        let mut average_velocity = Vec2::ZERO;
        for &i in neighbors {
            average_velocity += boids[i].velocity;
        }
        average_velocity /= neighbors.len() as f64;

        let desired = if average_velocity.length_squared() > 0.0 {
            average_velocity.normalized() * params.max_speed
        } else {
            Vec2::ZERO
        };

        (desired - self.velocity).clamp_magnitude(params.max_force)
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    pub fn cohesion(&self, boids: &[Boid], neighbors: &[usize], params: &SimulationParams) -> Vec2 {
        let mut center_of_mass = Vec2::ZERO;
        for &i in neighbors {
            center_of_mass += boids[i].position;
        }
        center_of_mass /= neighbors.len() as f64;

        let desired = (center_of_mass - self.position).normalized() * params.max_speed;
        (desired - self.velocity).clamp_magnitude(params.max_force)
    }

    /// Weighted blend of the enabled rules. Zero when there are no neighbors,
    /// so the per-rule averages never divide by an empty count.
    pub fn steering_force(&self, boids: &[Boid], neighbors: &[usize], params: &SimulationParams) -> Vec2 {
        if neighbors.is_empty() {
            return Vec2::ZERO;
        }

        let behaviors = params.behaviors;
        let weights = params.weights;
        let mut total_force = Vec2::ZERO;

        if behaviors.separation {
            total_force += self.separation(boids, neighbors, params) * weights.separation;
        }
        if behaviors.alignment {
            total_force += self.alignment(boids, neighbors, params) * weights.alignment;
        }
        if behaviors.cohesion {
            total_force += self.cohesion(boids, neighbors, params) * weights.cohesion;
        }

        total_force
    }

    // Apply a force to the boid
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    // Quadratic drag opposing the current motion
    #[inline]
    pub fn apply_drag(&mut self, drag_coefficient: f64) {
        let speed = self.velocity.length();
        self.acceleration += self.velocity * (-drag_coefficient * speed);
    }

    // Semi-implicit Euler: velocity first, then position with the new velocity
    #[inline]
    pub fn integrate(&mut self, dt: f64, max_speed: f64) {
        self.velocity += self.acceleration * dt;
        self.velocity = self.velocity.clamp_magnitude(max_speed);
        self.position += self.velocity * dt;
    }

    // Wrap the boid around the window edges
    #[inline]
    pub fn wrap_edges(&mut self, width: f64, height: f64) {
        self.position.x = wrap_coordinate(self.position.x, width);
        self.position.y = wrap_coordinate(self.position.y, height);
    }

    /// Runs one tick for this boid given its steering force: reset and
    /// accumulate, drag, integrate, wrap, then clear the acceleration.
    pub fn advance(&mut self, steering: Vec2, params: &SimulationParams, dt: f64) {
        self.acceleration = Vec2::ZERO;
        self.apply_force(steering);
        self.apply_drag(params.drag_coefficient);
        self.integrate(dt, params.max_speed);

        if params.boundary_wrapping {
            self.wrap_edges(params.window_width, params.window_height);
        }

        self.last_acceleration = self.acceleration;
        self.acceleration = Vec2::ZERO;
    }

    /// Rotation that takes the "up" axis (+y) onto the velocity, in radians.
    /// `None` while the boid is stationary.
    pub fn heading(&self) -> Option<f64> {
        if self.velocity.length_squared() == 0.0 {
            None
        } else {
            Some(self.velocity.y.atan2(self.velocity.x) - FRAC_PI_2)
        }
    }
}

/// Snaps a coordinate that left `[0, edge)` onto the opposite edge: below
/// zero goes to the far edge, at or past `edge` goes to zero. Values already
/// inside are returned unchanged.
#[inline]
pub fn wrap_coordinate(value: f64, edge: f64) -> f64 {
    if value < 0.0 {
        just_below(edge)
    } else if value >= edge {
        0.0
    } else {
        value
    }
}

// Largest f64 strictly below `edge`; the window edge itself is outside.
// `edge` is positive and finite (checked by `SimulationParams::validate`).
#[inline]
fn just_below(edge: f64) -> f64 {
    f64::from_bits(edge.to_bits() - 1)
}
