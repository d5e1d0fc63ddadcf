use std::collections::{HashSet, VecDeque};

use highway_rush::game::config::GameConfig;
use highway_rush::game::obstacle::{ObstacleId, ObstacleKind};
use highway_rush::game::random::RandomSource;
use highway_rush::game::sim::{obstacle_capacity, Simulation, SteeringIntent};
use highway_rush::game::snapshot::Phase;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Hands out pre-recorded draws; runs dry as "never spawn".
#[derive(Default)]
struct Scripted {
    units: VecDeque<f32>,
    picks: VecDeque<usize>,
}

impl RandomSource for Scripted {
    fn unit(&mut self) -> f32 {
        self.units.pop_front().unwrap_or(0.999)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}

fn quiet_run() -> Simulation {
    let mut sim = Simulation::seeded(GameConfig::default(), 42);
    sim.set_spawning(false);
    sim.start();
    sim
}

#[test]
fn five_hundred_quiet_ticks() {
    let mut sim = quiet_run();
    for _ in 0..500 {
        sim.tick();
    }
    let snap = sim.snapshot();
    assert_eq!(snap.score, 500);
    assert_eq!(snap.vehicle_x, 0.0);
    assert_eq!(snap.phase, Phase::Playing);
    assert_eq!(snap.speed, 61);
    assert_eq!(snap.distance, 50);
}

#[test]
fn overlapping_obstacle_ends_the_run_for_good() {
    let mut sim = quiet_run();
    let id = sim.place_obstacle(1, 5.0, ObstacleKind::Car).expect("lane");
    sim.tick();
    assert_eq!(sim.phase(), Phase::Ended);
    assert_eq!(sim.snapshot().crashed_into, Some(id));

    let score = sim.score();
    let obstacles = sim.snapshot().obstacles;
    for _ in 0..50 {
        sim.tick();
    }
    assert_eq!(sim.phase(), Phase::Ended);
    assert_eq!(sim.score(), score);
    assert_eq!(sim.snapshot().obstacles, obstacles);

    sim.reset();
    assert_eq!(sim.phase(), Phase::Playing);
}

#[test]
fn crash_lands_on_the_first_overlapping_tick() {
    let mut sim = quiet_run();
    sim.place_obstacle(1, 1.0, ObstacleKind::Car);
    for _ in 0..4 {
        sim.tick();
    }
    assert_eq!(sim.phase(), Phase::Playing);
    sim.tick();
    assert_eq!(sim.phase(), Phase::Ended);
    assert_eq!(sim.score(), 5);
}

#[test]
fn neighbouring_lane_traffic_is_a_near_miss() {
    let mut sim = quiet_run();
    sim.place_obstacle(0, 5.0, ObstacleKind::Truck);
    sim.place_obstacle(2, 5.0, ObstacleKind::Truck);
    for _ in 0..10 {
        sim.tick();
    }
    assert_eq!(sim.phase(), Phase::Playing);
}

#[test]
fn steering_left_clamps_at_the_road_edge() {
    let mut sim = quiet_run();
    sim.set_steering_intent(SteeringIntent::Left);
    for _ in 0..400 {
        sim.tick();
        assert!(sim.vehicle().x >= -3.0);
    }
    assert_eq!(sim.vehicle().target_x, -3.0);
    assert!(sim.vehicle().x < -2.99);

    for _ in 0..100 {
        sim.tick();
        assert!(sim.vehicle().x >= -3.0);
    }
}

#[test]
fn score_is_frozen_outside_play() {
    let mut sim = Simulation::seeded(GameConfig::default(), 5);
    for _ in 0..10 {
        sim.tick();
    }
    assert_eq!(sim.score(), 0);
    assert_eq!(sim.phase(), Phase::Idle);
}

#[test]
fn scripted_draws_spawn_exactly() {
    let rng = Scripted {
        units: VecDeque::from(vec![0.0, 0.0, 0.5]),
        picks: VecDeque::from(vec![2, 1, 1, 0]),
    };
    let mut sim = Simulation::with_rng(GameConfig::default(), rng);
    sim.start();

    sim.tick();
    let obstacles = sim.obstacles();
    assert_eq!(obstacles.len(), 1);
    assert_eq!(obstacles[0].id, ObstacleId(0));
    assert_eq!(obstacles[0].lane, 2);
    assert_eq!(obstacles[0].x, 3.0);
    assert_eq!(obstacles[0].z, -50.0);
    assert_eq!(obstacles[0].kind, ObstacleKind::Truck);

    // Lane 1 sits next to the fresh truck, so this draw is rejected.
    sim.tick();
    assert_eq!(sim.obstacles().len(), 1);

    // 0.5 is far above the spawn chance.
    sim.tick();
    assert_eq!(sim.obstacles().len(), 1);
}

#[test]
fn spawn_chance_threshold_at_base_speed() {
    // 0.02 + 60 / 10000 = 0.026
    let rng = Scripted {
        units: VecDeque::from(vec![0.0261, 0.0259]),
        picks: VecDeque::from(vec![1, 0]),
    };
    let mut sim = Simulation::with_rng(GameConfig::default(), rng);
    sim.start();

    sim.tick();
    assert!(sim.obstacles().is_empty());

    sim.tick();
    assert_eq!(sim.speed(), 60);
    assert_eq!(sim.obstacles().len(), 1);
    assert_eq!(sim.obstacles()[0].lane, 1);
    assert_eq!(sim.obstacles()[0].kind, ObstacleKind::Car);
}

#[test]
fn spawn_chance_grows_with_speed() {
    let config = GameConfig { speed_divisor: 1, ..GameConfig::default() };
    let mut units = vec![0.0261];
    units.extend([0.999; 9]);
    units.push(0.0261);
    let rng = Scripted { units: VecDeque::from(units), picks: VecDeque::from(vec![0, 2]) };
    let mut sim = Simulation::with_rng(config, rng);
    sim.start();

    for _ in 0..10 {
        sim.tick();
    }
    assert!(sim.obstacles().is_empty());
    assert_eq!(sim.speed(), 70);

    // 0.02 + 70 / 10000 = 0.027
    sim.tick();
    assert_eq!(sim.obstacles().len(), 1);
    assert_eq!(sim.obstacles()[0].lane, 0);
    assert_eq!(sim.obstacles()[0].kind, ObstacleKind::Cone);
}

#[test]
fn random_play_keeps_invariants() {
    let config = GameConfig::default();
    let cap = obstacle_capacity(&config);
    let (min, max) = config.road_bounds();
    let mut sim = Simulation::seeded(config.clone(), 2024);
    let mut driver = SmallRng::seed_from_u64(99);
    let mut seen = HashSet::new();

    sim.start();
    let mut last_speed = sim.speed();
    for _ in 0..20_000 {
        if driver.gen_bool(0.05) {
            sim.set_steering_intent(SteeringIntent::from_axis(driver.gen_range(-1..=1)));
        }
        sim.tick();

        let v = sim.vehicle();
        assert!(v.x >= min && v.x <= max);
        assert!(sim.speed() >= last_speed);
        assert!(sim.speed() <= config.speed_cap);
        assert!(sim.obstacles().len() <= cap);
        for o in sim.obstacles() {
            seen.insert(o.id);
        }
        let live: HashSet<_> = sim.obstacles().iter().map(|o| o.id).collect();
        assert_eq!(live.len(), sim.obstacles().len());

        if sim.phase() == Phase::Ended {
            sim.reset();
            assert_eq!(sim.speed(), config.base_speed);
            assert_eq!(sim.score(), 0);
        }
        last_speed = sim.speed();
    }
    assert!(!seen.is_empty());
}

#[test]
fn ids_are_never_reused_across_resets() {
    let mut sim = quiet_run();
    let a = sim.place_obstacle(0, -40.0, ObstacleKind::Cone).expect("lane");
    sim.place_obstacle(1, 5.0, ObstacleKind::Car);
    sim.tick();
    sim.reset();
    let b = sim.place_obstacle(0, -40.0, ObstacleKind::Cone).expect("lane");
    assert!(b > a);
    assert_ne!(a, b);
}

#[test]
fn snapshot_serializes_for_the_page() {
    let sim = quiet_run();
    let json = serde_json::to_value(sim.snapshot()).expect("json");
    assert_eq!(json["phase"], "playing");
    assert_eq!(json["vehicleX"], 0.0);
    assert_eq!(json["speed"], 60);
    assert!(json["obstacles"].as_array().expect("array").is_empty());
    assert!(json["crashedInto"].is_null());
}

#[test]
fn lanes_come_from_config() {
    let config = GameConfig::from_json(r#"{ "lanes": [-4.5, -1.5, 1.5, 4.5] }"#).expect("config");
    let mut sim = Simulation::seeded(config, 8);
    sim.set_spawning(false);
    sim.start();
    assert_eq!(sim.vehicle().x, 0.0);
    sim.set_steering_intent(SteeringIntent::Right);
    for _ in 0..500 {
        sim.tick();
    }
    assert_eq!(sim.vehicle().target_x, 4.5);
    assert!(sim.vehicle().x <= 4.5);
    assert_eq!(sim.place_obstacle(3, 5.0, ObstacleKind::Cone).map(|id| id.0), Some(0));
}

#[test]
fn shipped_config_loads() {
    let config = GameConfig::from_json(include_str!("../assets/config.json")).expect("config");
    assert_eq!(config.lanes, vec![-3.0, 0.0, 3.0]);
    assert_eq!(config.speed_cap, 120);
    assert_eq!(config.tick_hz, 60);
}
