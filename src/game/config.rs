use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::obstacle::ObstacleKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("at least one lane is required")]
    NoLanes,
    #[error("lanes must be listed left to right, found {0} after {1}")]
    UnsortedLanes(f32, f32),
    #[error("steer_smoothing must be in (0, 1], got {0}")]
    Smoothing(f32),
    #[error("speed_cap {cap} is below base_speed {base}")]
    SpeedCap { base: u32, cap: u32 },
    #[error("{0} must be non-zero")]
    ZeroDivisor(&'static str),
    #[error("spawn_z {spawn} must lie before despawn_z {despawn}")]
    SpawnWindow { spawn: f32, despawn: f32 },
    #[error("footprint for {0} must have positive width and depth")]
    Footprint(&'static str),
    #[error("spawn_clearance must be positive and leave few enough obstacles per lane, got {0}")]
    Clearance(f32),
}

/// Most obstacles a single lane may hold at once under the spawn spacing.
pub const MAX_PER_LANE: usize = 64;

/// Width (lateral) and depth (longitudinal) of a collision rectangle.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f32,
    pub depth: f32,
}

impl Size {
    pub const fn new(width: f32, depth: f32) -> Self {
        Size { width, depth }
    }

    fn is_positive(&self) -> bool {
        self.width > 0.0 && self.depth > 0.0
    }
}

/// Tuning for the whole run. Every field falls back to its default, so a
/// config file only needs to name what it changes.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct GameConfig {
    pub lanes: Vec<f32>,
    pub steer_step: f32,
    pub steer_smoothing: f32,

    pub base_speed: u32,
    pub speed_cap: u32,
    pub speed_divisor: u32,
    pub scroll_per_speed: f32,
    pub marking_spacing: f32,

    pub spawn_base: f32,
    pub spawn_per_speed: f32,
    pub spawn_z: f32,
    pub despawn_z: f32,
    pub spawn_clearance: f32,
    pub spawn_lane_radius: usize,

    pub vehicle_z: f32,
    pub vehicle_size: Size,
    pub car_size: Size,
    pub truck_size: Size,
    pub cone_size: Size,
    pub collision_margin: f32,

    pub tick_hz: u32,
    pub max_steps_per_frame: u32,
    pub distance_divisor: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            lanes: vec![-3.0, 0.0, 3.0],
            steer_step: 0.2,
            steer_smoothing: 0.15,
            base_speed: 60,
            speed_cap: 120,
            speed_divisor: 500,
            scroll_per_speed: 1.0 / 200.0,
            marking_spacing: 8.0,
            spawn_base: 0.02,
            spawn_per_speed: 1.0 / 10_000.0,
            spawn_z: -50.0,
            despawn_z: 20.0,
            spawn_clearance: 20.0,
            spawn_lane_radius: 1,
            vehicle_z: 5.0,
            vehicle_size: Size::new(1.5, 3.0),
            car_size: Size::new(1.4, 2.5),
            truck_size: Size::new(1.6, 4.0),
            cone_size: Size::new(0.6, 0.6),
            collision_margin: 0.1,
            tick_hz: 60,
            max_steps_per_frame: 5,
            distance_divisor: 10,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes.is_empty() {
            return Err(ConfigError::NoLanes);
        }
        for pair in self.lanes.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ConfigError::UnsortedLanes(pair[1], pair[0]));
            }
        }
        if !(self.steer_smoothing > 0.0 && self.steer_smoothing <= 1.0) {
            return Err(ConfigError::Smoothing(self.steer_smoothing));
        }
        if self.speed_cap < self.base_speed {
            return Err(ConfigError::SpeedCap { base: self.base_speed, cap: self.speed_cap });
        }
        if self.speed_divisor == 0 {
            return Err(ConfigError::ZeroDivisor("speed_divisor"));
        }
        if self.tick_hz == 0 {
            return Err(ConfigError::ZeroDivisor("tick_hz"));
        }
        if self.distance_divisor == 0 {
            return Err(ConfigError::ZeroDivisor("distance_divisor"));
        }
        if self.spawn_z >= self.despawn_z {
            return Err(ConfigError::SpawnWindow { spawn: self.spawn_z, despawn: self.despawn_z });
        }
        if !(self.spawn_clearance.is_finite() && self.spawn_clearance > 0.0)
            || self.per_lane_capacity() > MAX_PER_LANE
        {
            return Err(ConfigError::Clearance(self.spawn_clearance));
        }
        if !self.vehicle_size.is_positive() {
            return Err(ConfigError::Footprint("vehicle"));
        }
        for kind in ObstacleKind::ALL {
            if !self.obstacle_size(kind).is_positive() {
                return Err(ConfigError::Footprint(kind.name()));
            }
        }
        Ok(())
    }

    pub fn obstacle_size(&self, kind: ObstacleKind) -> Size {
        match kind {
            ObstacleKind::Car => self.car_size,
            ObstacleKind::Truck => self.truck_size,
            ObstacleKind::Cone => self.cone_size,
        }
    }

    /// Live obstacles one lane can hold: spawns are at least `spawn_clearance`
    /// apart across a field of `despawn_z - spawn_z`. Saturates on nonsense input.
    pub fn per_lane_capacity(&self) -> usize {
        let field = (self.despawn_z - self.spawn_z).max(0.0);
        if !(self.spawn_clearance > 0.0) {
            return usize::MAX;
        }
        // `as` saturates for out-of-range floats.
        ((field / self.spawn_clearance).floor() as usize).saturating_add(1)
    }

    /// Leftmost and rightmost lane centers; the vehicle never leaves this range.
    pub fn road_bounds(&self) -> (f32, f32) {
        if self.lanes.is_empty() {
            return (0.0, 0.0);
        }
        self.lanes
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &x| (min.min(x), max.max(x)))
    }

    pub fn center_x(&self) -> f32 {
        let (min, max) = self.road_bounds();
        (min + max) / 2.0
    }
}
