use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::game::collision::Footprint;
use crate::game::config::{GameConfig, MAX_PER_LANE};
use crate::game::obstacle::{Obstacle, ObstacleId, ObstacleKind};
use crate::game::random::RandomSource;
use crate::game::snapshot::{ObstacleView, Phase, Snapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SteeringIntent {
    Left,
    Right,
    #[default]
    None,
}

impl SteeringIntent {
    /// Sign of `axis` picks the direction; anything else steers nowhere.
    pub fn from_axis(axis: i32) -> Self {
        match axis.signum() {
            -1 => SteeringIntent::Left,
            1 => SteeringIntent::Right,
            _ => SteeringIntent::None,
        }
    }

    fn sign(self) -> f32 {
        match self {
            SteeringIntent::Left => -1.0,
            SteeringIntent::Right => 1.0,
            SteeringIntent::None => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vehicle {
    pub x: f32,
    pub target_x: f32,
    pub z: f32,
}

impl Vehicle {
    fn parked(config: &GameConfig) -> Self {
        let x = config.center_x();
        Vehicle { x, target_x: x, z: config.vehicle_z }
    }

    pub fn footprint(&self, config: &GameConfig) -> Footprint {
        Footprint::centered(self.x, self.z, config.vehicle_size)
    }
}

/// The authoritative run state, advanced one fixed step per `tick`.
///
/// Steering eases with `x += (target - x) * steer_smoothing` once per tick, so
/// the feel is only frame-rate independent when ticks run at a fixed rate.
/// Drive it through `FixedStep`, never once per rendered frame.
pub struct Simulation<R = SmallRng> {
    config: GameConfig,
    rng: R,
    phase: Phase,
    vehicle: Vehicle,
    obstacles: Vec<Obstacle>,
    score: u32,
    speed: u32,
    scroll: f32,
    steering: SteeringIntent,
    spawning: bool,
    next_id: u64,
    crashed_into: Option<ObstacleId>,
}

impl Simulation<SmallRng> {
    pub fn new(config: GameConfig) -> Self {
        Simulation::with_rng(config, SmallRng::from_entropy())
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Simulation::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let obstacles = Vec::with_capacity(obstacle_capacity(&config));
        Simulation {
            vehicle: Vehicle::parked(&config),
            speed: config.base_speed,
            config,
            rng,
            phase: Phase::Idle,
            obstacles,
            score: 0,
            scroll: 0.0,
            steering: SteeringIntent::None,
            spawning: true,
            next_id: 0,
            crashed_into: None,
        }
    }

    /// Idle or ended → playing, from a fresh run. Ignored while already playing.
    pub fn start(&mut self) {
        if self.phase == Phase::Playing {
            debug!("start ignored, run already in progress");
            return;
        }
        self.reset_run();
        self.phase = Phase::Playing;
        info!("run started at speed {}", self.speed);
    }

    /// Fresh run values. An ended run resumes playing; idle stays idle.
    pub fn reset(&mut self) {
        self.reset_run();
        if self.phase == Phase::Ended {
            self.phase = Phase::Playing;
            info!("run restarted");
        }
    }

    pub fn set_steering_intent(&mut self, intent: SteeringIntent) {
        self.steering = intent;
    }

    /// Turns the random spawn policy on or off. Placed obstacles are unaffected.
    pub fn set_spawning(&mut self, enabled: bool) {
        self.spawning = enabled;
    }

    /// Puts an obstacle of `kind` at lane `lane` and longitudinal `z`, bypassing
    /// the spawn policy. Out-of-range lanes are clamped to the outermost lane.
    pub fn place_obstacle(&mut self, lane: usize, z: f32, kind: ObstacleKind) -> Option<ObstacleId> {
        let last = self.config.lanes.len().checked_sub(1)?;
        Some(self.push_obstacle(lane.min(last), z, kind))
    }

    /// One fixed step. Does nothing unless the run is playing.
    pub fn tick(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }

        self.steer();

        let advance = self.speed as f32 * self.config.scroll_per_speed;
        if self.config.marking_spacing > 0.0 {
            self.scroll = (self.scroll + advance) % self.config.marking_spacing;
        }
        for obstacle in &mut self.obstacles {
            obstacle.z += advance;
        }
        let despawn_z = self.config.despawn_z;
        self.obstacles.retain(|o| !o.is_past(despawn_z));

        if self.spawning {
            self.maybe_spawn();
        }

        self.score = self.score.saturating_add(1);
        self.speed = self.speed_for(self.score);

        if let Some((id, kind)) = self.first_collision().map(|o| (o.id, o.kind)) {
            info!(
                "crashed into {} #{} at score {}, speed {}",
                kind.name(),
                id.0,
                self.score,
                self.speed
            );
            self.crashed_into = Some(id);
            self.phase = Phase::Ended;
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            vehicle_x: self.vehicle.x,
            vehicle_z: self.vehicle.z,
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView { id: o.id, lane: o.lane, x: o.x, z: o.z, kind: o.kind })
                .collect(),
            score: self.score,
            speed: self.speed,
            distance: self.score / self.config.distance_divisor.max(1),
            level: self.speed / 10,
            scroll_offset: self.scroll,
            crashed_into: self.crashed_into,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn steering(&self) -> SteeringIntent {
        self.steering
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn reset_run(&mut self) {
        self.vehicle = Vehicle::parked(&self.config);
        self.obstacles.clear();
        self.score = 0;
        self.speed = self.config.base_speed;
        self.scroll = 0.0;
        self.steering = SteeringIntent::None;
        self.crashed_into = None;
    }

    fn steer(&mut self) {
        let (min, max) = self.config.road_bounds();
        let v = &mut self.vehicle;
        v.target_x = (v.target_x + self.steering.sign() * self.config.steer_step).clamp(min, max);
        v.x += (v.target_x - v.x) * self.config.steer_smoothing;
        v.x = v.x.clamp(min, max);
    }

    fn speed_for(&self, score: u32) -> u32 {
        let stepped = self.config.base_speed.saturating_add(score / self.config.speed_divisor.max(1));
        stepped.min(self.config.speed_cap)
    }

    fn maybe_spawn(&mut self) {
        let lanes = self.config.lanes.len();
        if lanes == 0 {
            return;
        }
        let chance = self.config.spawn_base + self.speed as f32 * self.config.spawn_per_speed;
        if self.rng.unit() >= chance {
            return;
        }
        let lane = self.rng.pick(lanes);
        let kind = ObstacleKind::ALL[self.rng.pick(ObstacleKind::ALL.len())];
        if self.lane_blocked(lane) {
            debug!("spawn of {} in lane {} rejected, too close to traffic", kind.name(), lane);
            return;
        }
        let id = self.push_obstacle(lane, self.config.spawn_z, kind);
        debug!("spawned {} #{} in lane {}", kind.name(), id.0, lane);
    }

    /// Same or neighbouring lane already has something inside the window
    /// just past the spawn point.
    fn lane_blocked(&self, lane: usize) -> bool {
        let radius = self.config.spawn_lane_radius;
        let window_end = self.config.spawn_z + self.config.spawn_clearance;
        self.obstacles
            .iter()
            .any(|o| o.lane.abs_diff(lane) <= radius && o.z < window_end)
    }

    fn push_obstacle(&mut self, lane: usize, z: f32, kind: ObstacleKind) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.obstacles.push(Obstacle { id, lane, x: self.config.lanes[lane], z, kind });
        id
    }

    fn first_collision(&self) -> Option<&Obstacle> {
        let margin = self.config.collision_margin;
        let car = self.vehicle.footprint(&self.config).shrink(margin);
        self.obstacles
            .iter()
            .find(|o| car.intersects(&o.footprint(&self.config).shrink(margin)))
    }
}

/// Upper bound on live obstacles across all lanes, capped for configs that
/// never went through `validate`.
pub fn obstacle_capacity(config: &GameConfig) -> usize {
    config
        .lanes
        .len()
        .saturating_mul(config.per_lane_capacity().min(MAX_PER_LANE))
}
