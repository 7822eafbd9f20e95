/*
 * Debug Information Module
 *
 * This module defines the PerformanceMonitor that keeps rolling timing windows
 * for the window front end and the headless runner.
 *
 * Includes metrics for:
 * - FPS (frames per second), instantaneous and over the whole run
 * - Frame time
 * - Simulation (tick) time
 * - Rendering time
 */

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::info;

pub struct PerformanceMonitor {
    enabled: bool,
    capacity: usize,
    // Rolling windows in milliseconds
    frame_times: VecDeque<f64>,
    simulation_times: VecDeque<f64>,
    rendering_times: VecDeque<f64>,
    simulation_start: Option<Instant>,
    frames: u64,
    started_at: Instant,
}

impl PerformanceMonitor {
    // `capacity` is the number of samples averaged; one second's worth at the tick rate
    pub fn new(capacity: usize, enabled: bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            enabled,
            capacity,
            frame_times: VecDeque::with_capacity(capacity),
            simulation_times: VecDeque::with_capacity(capacity),
            rendering_times: VecDeque::with_capacity(capacity),
            simulation_start: None,
            frames: 0,
            started_at: Instant::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start_simulation(&mut self) {
        if self.enabled {
            self.simulation_start = Some(Instant::now());
        }
    }

    pub fn end_simulation(&mut self) {
        if let Some(start) = self.simulation_start.take() {
            self.record_simulation(start.elapsed());
        }
    }

    // Samples measured elsewhere: nannou reports frame time, the view times itself
    pub fn record_frame(&mut self, elapsed: Duration) {
        if self.enabled {
            push_sample(&mut self.frame_times, self.capacity, elapsed);
            self.frames += 1;
        }
    }

    pub fn record_simulation(&mut self, elapsed: Duration) {
        if self.enabled {
            push_sample(&mut self.simulation_times, self.capacity, elapsed);
        }
    }

    pub fn record_rendering(&mut self, elapsed: Duration) {
        if self.enabled {
            push_sample(&mut self.rendering_times, self.capacity, elapsed);
        }
    }

    pub fn average_frame_time(&self) -> f64 {
        average(&self.frame_times)
    }

    pub fn average_simulation_time(&self) -> f64 {
        average(&self.simulation_times)
    }

    pub fn average_rendering_time(&self) -> f64 {
        average(&self.rendering_times)
    }

    pub fn fps(&self) -> f64 {
        let frame_time = self.average_frame_time();
        if frame_time > 0.0 {
            1000.0 / frame_time
        } else {
            0.0
        }
    }

    pub fn overall_fps(&self) -> f64 {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn log_performance(&self) {
        if !self.enabled {
            return;
        }
        info!(
            fps = self.fps(),
            frame_ms = self.average_frame_time(),
            sim_ms = self.average_simulation_time(),
            render_ms = self.average_rendering_time(),
            overall_fps = self.overall_fps(),
            "performance"
        );
    }
}

fn push_sample(window: &mut VecDeque<f64>, capacity: usize, elapsed: Duration) {
    if window.len() == capacity {
        window.pop_front();
    }
    window.push_back(elapsed.as_secs_f64() * 1000.0);
}

fn average(window: &VecDeque<f64>) -> f64 {
    if window.is_empty() {
        0.0
    } else {
        window.iter().sum::<f64>() / window.len() as f64
    }
}
