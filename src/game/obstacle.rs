use serde::Serialize;

use crate::game::collision::Footprint;
use crate::game::config::GameConfig;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Car,
    Truck,
    Cone,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Car, ObstacleKind::Truck, ObstacleKind::Cone];

    pub fn name(self) -> &'static str {
        match self {
            ObstacleKind::Car => "car",
            ObstacleKind::Truck => "truck",
            ObstacleKind::Cone => "cone",
        }
    }
}

/// Spawn-order token. Never reused within a `Simulation`, even across resets.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObstacleId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub lane: usize,
    pub x: f32,
    pub z: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn footprint(&self, config: &GameConfig) -> Footprint {
        Footprint::centered(self.x, self.z, config.obstacle_size(self.kind))
    }

    /// True once the obstacle has scrolled past the trailing edge of the field.
    pub fn is_past(&self, despawn_z: f32) -> bool {
        self.z > despawn_z
    }
}
