/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains every
 * simulation-affecting constant, plus the DisplayParams used only by the
 * window front end. Both load from TOML and can be modified through the UI.
 * Rule toggles live here as plain fields so that independent simulations can
 * run side by side with their own settings.
 */

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::spatial_grid::grid_dimensions;

// Per-rule weights applied when blending steering forces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleWeights {
    pub separation: f64,
    pub alignment: f64,
    pub cohesion: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            separation: 10.0,
            alignment: 5.0,
            cohesion: 6.0,
        }
    }
}

// Which steering rules participate in the blend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorFlags {
    pub separation: bool,
    pub alignment: bool,
    pub cohesion: bool,
}

impl BehaviorFlags {
    pub const ALL: Self = Self {
        separation: true,
        alignment: true,
        cohesion: true,
    };

    pub const NONE: Self = Self {
        separation: false,
        alignment: false,
        cohesion: false,
    };

    pub fn any(&self) -> bool {
        self.separation || self.alignment || self.cohesion
    }
}

impl Default for BehaviorFlags {
    fn default() -> Self {
        Self::ALL
    }
}

/// How the driver finds each boid's neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// 3x3 cell scan over the spatial grid.
    #[default]
    Grid,
    /// Check every pair. Quadratic, kept as a reference.
    BruteForce,
}

/// How the grid is kept in sync with boid positions between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMaintenance {
    /// Clear every cell and reinsert all boids.
    #[default]
    Rebuild,
    /// Move only the boids whose cell changed.
    Incremental,
}

// Parameters for the simulation that can be adjusted via config file or UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub window_width: f64,
    pub window_height: f64,
    pub fps: u32,
    pub num_boids: usize,
    pub min_speed: f64,
    pub max_speed: f64,
    pub max_starting_speed: f64,
    pub max_force: f64,
    pub vision_radius: f64,
    pub separation_radius: f64,
    pub drag_coefficient: f64,
    pub weights: RuleWeights,
    pub behaviors: BehaviorFlags,
    pub boundary_wrapping: bool,
    // Performance settings
    pub neighbor_search: NeighborSearch,
    pub index_maintenance: IndexMaintenance,
    pub enable_parallel: bool,
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            window_width: 800.0,
            window_height: 600.0,
            fps: 60,
            num_boids: 200,
            min_speed: 1.0,
            max_speed: 500.0,
            max_starting_speed: 50.0,
            max_force: 10.0,
            vision_radius: 50.0,
            separation_radius: 20.0,
            drag_coefficient: 0.01,
            weights: RuleWeights::default(),
            behaviors: BehaviorFlags::ALL,
            boundary_wrapping: true,
            neighbor_search: NeighborSearch::Grid,
            index_maintenance: IndexMaintenance::Rebuild,
            enable_parallel: false,
            seed: None,
        }
    }
}

impl SimulationParams {
    // Fixed tick duration in seconds
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.fps)
    }

    pub fn vision_radius_squared(&self) -> f64 {
        self.vision_radius * self.vision_radius
    }

    pub fn separation_radius_squared(&self) -> f64 {
        self.separation_radius * self.separation_radius
    }

    // Grid cells are never smaller than the vision radius so that a 3x3 scan
    // covers every boid within range
    pub fn cell_size(&self) -> f64 {
        self.vision_radius.ceil()
    }

    /// Checks every numeric parameter once, before a simulation is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(ConfigError::invalid(name, format!("must be at least 1, got {value}")));
            }
        }

        if self.fps == 0 {
            return Err(ConfigError::invalid("fps", "must be positive"));
        }

        for (name, value) in [
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("max_starting_speed", self.max_starting_speed),
            ("max_force", self.max_force),
            ("separation_radius", self.separation_radius),
            ("drag_coefficient", self.drag_coefficient),
            ("weights.separation", self.weights.separation),
            ("weights.alignment", self.weights.alignment),
            ("weights.cohesion", self.weights.cohesion),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::invalid(name, format!("must be finite, got {value}")));
            }
        }

        for (name, value) in [
            ("min_speed", self.min_speed),
            ("max_force", self.max_force),
            ("separation_radius", self.separation_radius),
            ("drag_coefficient", self.drag_coefficient),
        ] {
            if value < 0.0 {
                return Err(ConfigError::invalid(name, format!("must not be negative, got {value}")));
            }
        }

        if self.max_speed <= 0.0 {
            return Err(ConfigError::invalid("max_speed", "must be positive"));
        }
        if self.min_speed > self.max_starting_speed {
            return Err(ConfigError::invalid(
                "max_starting_speed",
                format!("must be at least min_speed ({})", self.min_speed),
            ));
        }
        if self.max_starting_speed > self.max_speed {
            return Err(ConfigError::invalid(
                "max_starting_speed",
                format!("must not exceed max_speed ({})", self.max_speed),
            ));
        }

        if !self.vision_radius.is_finite() || self.vision_radius <= 0.0 {
            return Err(ConfigError::EmptyGrid {
                cell_size: self.cell_size(),
            });
        }
        grid_dimensions(self.cell_size(), self.window_width, self.window_height)?;

        Ok(())
    }

    // Parameter ranges for UI sliders
    pub fn get_num_boids_range() -> RangeInclusive<usize> {
        10..=5000
    }

    pub fn get_max_speed_range() -> RangeInclusive<f64> {
        10.0..=1000.0
    }

    pub fn get_max_force_range() -> RangeInclusive<f64> {
        0.0..=50.0
    }

    pub fn get_weight_range() -> RangeInclusive<f64> {
        0.0..=20.0
    }

    pub fn get_radius_range() -> RangeInclusive<f64> {
        1.0..=150.0
    }

    pub fn get_drag_range() -> RangeInclusive<f64> {
        0.0..=0.1
    }
}

// Front-end only settings; nothing here changes how boids move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayParams {
    pub title: String,
    pub background: [u8; 3],
    pub boid_color: [u8; 3],
    pub boid_scale: f32,
    pub show_vision_radius: bool,
    pub show_velocity_vectors: bool,
    pub show_force_vectors: bool,
    pub performance_monitoring: bool,
    // Frames between performance log lines
    pub performance_log_interval: u32,
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            title: "Boids Simulation".to_string(),
            background: [0x00, 0x3a, 0x59],
            boid_color: [0xff, 0xff, 0xff],
            boid_scale: 1.0,
            show_vision_radius: false,
            show_velocity_vectors: false,
            show_force_vectors: false,
            performance_monitoring: true,
            performance_log_interval: 60,
        }
    }
}

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationParams,
    pub display: DisplayParams,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
