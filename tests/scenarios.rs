use flocksim::{BehaviorFlags, Boid, BoidId, Config, NeighborSearch, Simulation, SimulationParams, Vec2};

fn separation_only() -> SimulationParams {
    SimulationParams {
        vision_radius: 50.0,
        behaviors: BehaviorFlags {
            separation: true,
            ..BehaviorFlags::NONE
        },
        ..SimulationParams::default()
    }
}

fn still(id: usize, x: f64, y: f64) -> Boid {
    Boid::new(BoidId(id), Vec2::new(x, y), Vec2::ZERO)
}

#[test]
fn close_pair_separates_after_one_tick() {
    let boids = vec![still(0, 100.0, 100.0), still(1, 105.0, 100.0)];
    let mut sim = Simulation::from_boids(separation_only(), boids).unwrap();

    sim.step();

    let a = &sim.boids()[0];
    let b = &sim.boids()[1];
    assert!(a.velocity.x < 0.0, "left boid should move left, got {}", a.velocity.x);
    assert!(b.velocity.x > 0.0, "right boid should move right, got {}", b.velocity.x);
    assert!(a.position.x < 100.0);
    assert!(b.position.x > 105.0);
}

#[test]
fn close_pair_separates_with_brute_force_search() {
    let params = SimulationParams {
        neighbor_search: NeighborSearch::BruteForce,
        ..separation_only()
    };
    let boids = vec![still(0, 100.0, 100.0), still(1, 105.0, 100.0)];
    let mut sim = Simulation::from_boids(params, boids).unwrap();

    sim.step();

    assert!(sim.boids()[0].velocity.x < 0.0);
    assert!(sim.boids()[1].velocity.x > 0.0);
}

#[test]
fn neighbors_see_pre_tick_positions() {
    // The pair is symmetric, so simultaneous updates must stay mirror images
    let boids = vec![still(0, 100.0, 100.0), still(1, 105.0, 100.0)];
    let mut sim = Simulation::from_boids(separation_only(), boids).unwrap();

    for _ in 0..5 {
        sim.step();
        let a = &sim.boids()[0];
        let b = &sim.boids()[1];
        assert_eq!(a.velocity.x, -b.velocity.x);
        assert!(((a.position.x + b.position.x) / 2.0 - 102.5).abs() < 1e-9);
    }
}

#[test]
fn lone_boid_gets_no_steering() {
    let params = SimulationParams::default();
    let boids = vec![Boid::new(BoidId(0), Vec2::new(400.0, 300.0), Vec2::new(20.0, 0.0))];

    let force = boids[0].steering_force(&boids, &[], &params);
    assert_eq!(force, Vec2::ZERO);

    let mut sim = Simulation::from_boids(params, boids).unwrap();
    sim.step();

    // Only drag: -0.01 * 20 * (20, 0)
    assert!((sim.boids()[0].last_acceleration - Vec2::new(-4.0, 0.0)).length() < 1e-12);
}

#[test]
fn disabled_rules_leave_only_drag() {
    let params = SimulationParams {
        num_boids: 100,
        behaviors: BehaviorFlags::NONE,
        boundary_wrapping: false,
        seed: Some(17),
        ..SimulationParams::default()
    };
    let mut sim = Simulation::new(params.clone()).unwrap();
    let headings: Vec<Vec2> = sim.boids().iter().map(|b| b.velocity).collect();

    for _ in 0..59 {
        sim.step();
    }
    let before_last: Vec<Vec2> = sim.boids().iter().map(|b| b.velocity).collect();
    sim.step();

    for ((boid, initial), previous) in sim.boids().iter().zip(&headings).zip(&before_last) {
        let cross = boid.velocity.x * initial.y - boid.velocity.y * initial.x;
        assert!(cross.abs() < 1e-9 * initial.length_squared().max(1.0));
        assert!(boid.velocity.dot(*initial) > 0.0);
        assert!(boid.velocity.length() <= initial.length());

        let drag = *previous * (-params.drag_coefficient * previous.length());
        assert!((boid.last_acceleration - drag).length() < 1e-6);
    }
}

#[test]
fn identical_starts_give_identical_trajectories() {
    let params = SimulationParams {
        behaviors: BehaviorFlags::NONE,
        ..SimulationParams::default()
    };
    let start: Vec<Boid> = (0..50)
        .map(|i| {
            let t = i as f64;
            Boid::new(BoidId(i), Vec2::new(13.0 * t % 800.0, 29.0 * t % 600.0), Vec2::new(t - 25.0, 40.0 - t))
        })
        .collect();

    let mut first = Simulation::from_boids(params.clone(), start.clone()).unwrap();
    let mut second = Simulation::from_boids(params, start).unwrap();

    for _ in 0..200 {
        first.step();
        second.step();
    }

    assert_eq!(first.boids(), second.boids());
}

#[test]
fn seeded_flocks_are_reproducible() {
    let params = SimulationParams {
        num_boids: 150,
        seed: Some(2024),
        ..SimulationParams::default()
    };

    let mut first = Simulation::new(params.clone()).unwrap();
    let mut second = Simulation::new(params).unwrap();
    for _ in 0..100 {
        first.step();
        second.step();
    }

    assert_eq!(first.boids(), second.boids());
}

fn coasting() -> SimulationParams {
    SimulationParams {
        behaviors: BehaviorFlags::NONE,
        drag_coefficient: 0.0,
        ..SimulationParams::default()
    }
}

#[test]
fn boid_leaving_right_edge_snaps_to_left_edge() {
    let boids = vec![Boid::new(BoidId(0), Vec2::new(799.5, 300.0), Vec2::new(60.0, 0.0))];
    let mut sim = Simulation::from_boids(coasting(), boids).unwrap();

    sim.step();
    let x = sim.boids()[0].position.x;
    assert_eq!(x, 0.0, "overshoot should be dropped, got {x}");

    sim.step();
    assert!((sim.boids()[0].position.x - 1.0).abs() < 1e-9);
}

#[test]
fn boids_exiting_either_side_land_on_opposite_edges() {
    let boids = vec![
        Boid::new(BoidId(0), Vec2::new(1.0, 300.0), Vec2::new(-120.0, 0.0)),
        Boid::new(BoidId(1), Vec2::new(799.0, 300.0), Vec2::new(120.0, 0.0)),
    ];
    let mut sim = Simulation::from_boids(coasting(), boids).unwrap();

    sim.step();

    let left_exit = sim.boids()[0].position.x;
    let right_exit = sim.boids()[1].position.x;
    assert!(left_exit < 800.0 && 800.0 - left_exit < 1e-9, "got {left_exit}");
    assert_eq!(right_exit, 0.0);
}

#[test]
fn unwrapped_boids_may_leave_window() {
    let params = SimulationParams {
        behaviors: BehaviorFlags::NONE,
        drag_coefficient: 0.0,
        boundary_wrapping: false,
        ..SimulationParams::default()
    };
    let boids = vec![Boid::new(BoidId(0), Vec2::new(799.5, 300.0), Vec2::new(60.0, 0.0))];
    let mut sim = Simulation::from_boids(params, boids).unwrap();

    for _ in 0..3 {
        sim.step();
    }
    assert!(sim.boids()[0].position.x > 800.0);
}

#[test]
fn config_file_drives_simulation() {
    let config = Config::from_toml_str(
        r#"
        [simulation]
        window_width = 400.0
        window_height = 300.0
        num_boids = 30
        vision_radius = 40.0
        seed = 5
        enable_parallel = true

        [simulation.weights]
        cohesion = 1.5
        "#,
    )
    .unwrap();

    let mut sim = Simulation::new(config.simulation).unwrap();
    assert_eq!(sim.boids().len(), 30);
    assert_eq!(sim.grid().cols(), 10);
    assert_eq!(sim.params().weights.cohesion, 1.5);

    for _ in 0..10 {
        sim.step();
    }
    for boid in sim.boids() {
        assert!((0.0..400.0).contains(&boid.position.x));
        assert!((0.0..300.0).contains(&boid.position.y));
    }
}

#[test]
fn bundled_sample_config_is_valid() {
    let config = Config::from_toml_str(include_str!("../boids.toml")).unwrap();
    assert!(config.simulation.validate().is_ok());
    assert_eq!(config.simulation.num_boids, 400);
    assert!(config.simulation.enable_parallel);

    let sim = Simulation::new(config.simulation).unwrap();
    assert_eq!(sim.boids().len(), 400);
}
