/*
 * Boid Flocking Simulation
 *
 * This application simulates the flocking behavior of birds (boids) based on three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * By default it opens a window with an interactive control panel. With
 * `--headless <TICKS>` it runs the same simulation without a window and logs
 * a summary instead.
 */

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flocksim::{app, Config, PerformanceMonitor, Simulation};

#[derive(Debug, Parser)]
#[command(name = "flocksim", version, about = "Boid flocking simulation")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the initial population
    #[arg(long)]
    seed: Option<u64>,

    /// Number of boids, overriding the config file
    #[arg(short = 'n', long)]
    boids: Option<usize>,

    /// Run this many ticks without a window, then exit
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Disable wrapping at the window edges
    #[arg(long)]
    no_wrap: bool,

    /// Compute steering forces on all cores
    #[arg(long)]
    parallel: bool,

    /// Log filter, e.g. `info` or `flocksim=debug` (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = load_config(&cli)?;
    config
        .simulation
        .validate()
        .context("invalid simulation configuration")?;

    match cli.headless {
        Some(ticks) => run_headless(config, ticks),
        None => {
            info!("Starting boid simulation window");
            app::launch(config);
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };

    let params = &mut config.simulation;
    if let Some(seed) = cli.seed {
        params.seed = Some(seed);
    }
    if let Some(boids) = cli.boids {
        params.num_boids = boids;
    }
    if cli.no_wrap {
        params.boundary_wrapping = false;
    }
    if cli.parallel {
        params.enable_parallel = true;
    }

    Ok(config)
}

fn run_headless(config: Config, ticks: u64) -> Result<()> {
    let params = config.simulation;
    let mut simulation = Simulation::new(params.clone()).context("building simulation")?;
    let mut monitor = PerformanceMonitor::new(params.fps as usize, true);

    info!(boids = simulation.boids().len(), ticks, "running headless");

    let started = Instant::now();
    for _ in 0..ticks {
        monitor.start_simulation();
        simulation.step();
        monitor.end_simulation();
    }

    let stats = simulation.stats();
    info!(
        ticks = simulation.tick_count(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        avg_tick_ms = monitor.average_simulation_time(),
        mean_speed = stats.mean_speed,
        max_speed = stats.max_speed,
        centroid_x = stats.centroid.x,
        centroid_y = stats.centroid.y,
        "headless run complete"
    );

    Ok(())
}
