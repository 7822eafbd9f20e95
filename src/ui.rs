/*
 * UI Module
 *
 * This module contains the egui control panel. It edits a working copy of the
 * simulation parameters; the app hands changed parameters to the simulation,
 * which validates them before they take effect.
 */

use nannou_egui::{egui, Egui};

use crate::debug::PerformanceMonitor;
use crate::params::{DisplayParams, IndexMaintenance, NeighborSearch, SimulationParams};

// What the panel asked for this frame
#[derive(Debug, Default, Clone, Copy)]
pub struct UiResponse {
    pub reset_requested: bool,
    pub params_changed: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    display: &mut DisplayParams,
    paused: &mut bool,
    monitor: &PerformanceMonitor,
) -> UiResponse {
    let before = params.clone();
    let mut reset_requested = false;

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Boid Parameters", |ui| {
                ui.add(egui::Slider::new(&mut params.num_boids, SimulationParams::get_num_boids_range()).text("Number of Boids"));

                if ui.button("Reset Boids").clicked() {
                    reset_requested = true;
                }

                ui.add(egui::Slider::new(&mut params.max_speed, SimulationParams::get_max_speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut params.max_force, SimulationParams::get_max_force_range()).text("Max Force"));
                ui.add(egui::Slider::new(&mut params.drag_coefficient, SimulationParams::get_drag_range()).text("Drag"));
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.checkbox(&mut params.behaviors.separation, "Separation");
                ui.checkbox(&mut params.behaviors.alignment, "Alignment");
                ui.checkbox(&mut params.behaviors.cohesion, "Cohesion");

                ui.add(egui::Slider::new(&mut params.weights.separation, SimulationParams::get_weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut params.weights.alignment, SimulationParams::get_weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut params.weights.cohesion, SimulationParams::get_weight_range()).text("Cohesion Weight"));

                ui.add(egui::Slider::new(&mut params.vision_radius, SimulationParams::get_radius_range()).text("Vision Radius"));
                ui.add(egui::Slider::new(&mut params.separation_radius, SimulationParams::get_radius_range()).text("Separation Radius"));

                ui.checkbox(&mut params.boundary_wrapping, "Wrap Around Edges");
            });

            ui.collapsing("Performance Tuning", |ui| {
                ui.checkbox(&mut params.enable_parallel, "Enable Parallel Processing");

                ui.label("Neighbor Search");
                ui.radio_value(&mut params.neighbor_search, NeighborSearch::Grid, "Spatial Grid");
                ui.radio_value(&mut params.neighbor_search, NeighborSearch::BruteForce, "Brute Force");

                ui.label("Grid Maintenance");
                ui.radio_value(&mut params.index_maintenance, IndexMaintenance::Rebuild, "Rebuild Every Tick");
                ui.radio_value(&mut params.index_maintenance, IndexMaintenance::Incremental, "Incremental");

                ui.separator();

                ui.checkbox(&mut display.performance_monitoring, "Performance Monitoring");

                // Performance metrics
                ui.label(format!("FPS: {:.1}", monitor.fps()));
                ui.label(format!("Frame time: {:.2} ms", monitor.average_frame_time()));
                ui.label(format!("Simulation time: {:.2} ms", monitor.average_simulation_time()));
                ui.label(format!("Render time: {:.2} ms", monitor.average_rendering_time()));
            });

            ui.collapsing("Debug Overlays", |ui| {
                ui.checkbox(&mut display.show_vision_radius, "Show Vision Radius");
                ui.checkbox(&mut display.show_velocity_vectors, "Show Velocity Vectors");
                ui.checkbox(&mut display.show_force_vectors, "Show Force Vectors");
            });

            ui.checkbox(paused, "Pause Simulation");
        });

    UiResponse {
        reset_requested,
        params_changed: *params != before,
    }
}
