/*
 * Application Module
 *
 * This module defines the nannou model for the windowed front end. It owns a
 * Simulation and advances it with a fixed timestep: wall-clock time from
 * nannou accumulates, and the simulation ticks by exactly `1 / fps` seconds
 * as many times as the accumulator allows. The simulation itself never reads
 * the clock.
 */

use std::cell::Cell;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{info, warn};

use crate::debug::PerformanceMonitor;
use crate::params::{Config, DisplayParams, SimulationParams};
use crate::renderer::view;
use crate::simulation::Simulation;
use crate::ui;

// Ticks allowed to queue up after a stall before time is dropped
const MAX_CATCH_UP_TICKS: u32 = 5;

// nannou builds the model from a plain fn pointer, so the parsed config is
// parked here before the event loop starts
static LAUNCH_CONFIG: OnceLock<Config> = OnceLock::new();

// Main model for the application
pub struct Model {
    pub simulation: Simulation,
    // Copy edited by the control panel; applied through `update_params`
    pub working_params: SimulationParams,
    pub display: DisplayParams,
    pub egui: Egui,
    pub monitor: PerformanceMonitor,
    pub paused: bool,
    // Fixed timestep physics variables
    pub physics_accumulator: Duration,
    pub physics_step_size: Duration,
    pub last_update_time: Instant,
    // Written by `view`, which only gets `&Model`
    pub last_render_time: Cell<Option<Duration>>,
}

/// Opens the window and runs until it is closed. `config` must already have
/// been validated.
pub fn launch(config: Config) {
    if LAUNCH_CONFIG.set(config).is_err() {
        warn!("window already launched; ignoring new configuration");
    }
    nannou::app(model).update(update).run();
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let config = LAUNCH_CONFIG.get().cloned().unwrap_or_default();
    let params = config.simulation;

    let window_id = app
        .new_window()
        .title(config.display.title.clone())
        .size(params.window_width as u32, params.window_height as u32)
        .view(view)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to create window");

    let window = app.window(window_id).expect("window was just created");
    let egui = Egui::from_window(&window);

    let simulation = Simulation::new(params.clone()).expect("configuration is validated before launch");
    info!(boids = simulation.boids().len(), fps = params.fps, "simulation window ready");

    let monitor = PerformanceMonitor::new(params.fps as usize, config.display.performance_monitoring);

    Model {
        physics_step_size: Duration::from_secs_f64(params.dt()),
        working_params: params,
        simulation,
        display: config.display,
        egui,
        monitor,
        paused: false,
        physics_accumulator: Duration::ZERO,
        last_update_time: Instant::now(),
        last_render_time: Cell::new(None),
    }
}

// Update the model
pub fn update(_app: &App, model: &mut Model, update: Update) {
    model.monitor.record_frame(update.since_last);
    if let Some(render_time) = model.last_render_time.take() {
        model.monitor.record_rendering(render_time);
    }

    let response = ui::update_ui(
        &mut model.egui,
        &mut model.working_params,
        &mut model.display,
        &mut model.paused,
        &model.monitor,
    );

    if response.params_changed {
        apply_params(model);
    }

    if model.monitor.is_enabled() != model.display.performance_monitoring {
        model.monitor.set_enabled(model.display.performance_monitoring);
    }

    if response.reset_requested {
        model.simulation.reset();
        model.physics_accumulator = Duration::ZERO;
    }

    let current_time = Instant::now();
    let frame_time = current_time.duration_since(model.last_update_time);
    model.last_update_time = current_time;

    if model.paused {
        model.physics_accumulator = Duration::ZERO;
    } else {
        model.physics_accumulator += frame_time;

        let max_backlog = model.physics_step_size * MAX_CATCH_UP_TICKS;
        if model.physics_accumulator > max_backlog {
            model.physics_accumulator = max_backlog;
        }

        // Run fixed timestep updates
        while model.physics_accumulator >= model.physics_step_size {
            model.monitor.start_simulation();
            model.simulation.step();
            model.monitor.end_simulation();

            model.physics_accumulator -= model.physics_step_size;
        }
    }

    let interval = <u64 as From<_>>::from(model.display.performance_log_interval);
    if interval > 0 && model.monitor.frames() % interval == 0 {
        model.monitor.log_performance();
    }
}

// Hand the panel's parameters to the simulation, reverting the panel on rejection
fn apply_params(model: &mut Model) {
    match model.simulation.update_params(model.working_params.clone()) {
        Ok(()) => {
            model.physics_step_size = Duration::from_secs_f64(model.simulation.params().dt());
        }
        Err(err) => {
            warn!(%err, "rejected parameter change");
            model.working_params = model.simulation.params().clone();
        }
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
