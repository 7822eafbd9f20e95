/*
 * Boid Flocking Simulation - Module Definitions
 *
 * The simulation core (vector, boid, spatial_grid, simulation, params, error)
 * has no windowing dependencies and can be driven directly. The app, ui and
 * renderer modules wrap it in a nannou window with an egui control panel.
 */

// Re-export key components for easier access
pub use boid::{Boid, BoidId};
pub use debug::PerformanceMonitor;
pub use error::ConfigError;
pub use params::{BehaviorFlags, Config, DisplayParams, IndexMaintenance, NeighborSearch, RuleWeights, SimulationParams};
pub use simulation::{FlockStats, Simulation};
pub use spatial_grid::{CellCoord, SpatialGrid};
pub use vector::{SteeringVector, Vec2};

// Define modules
pub mod app;
pub mod boid;
pub mod debug;
pub mod error;
pub mod params;
pub mod renderer;
pub mod simulation;
pub mod spatial_grid;
pub mod ui;
pub mod vector;
