use serde::Serialize;

use crate::game::obstacle::{ObstacleId, ObstacleKind};

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Ended,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub lane: usize,
    pub x: f32,
    pub z: f32,
    pub kind: ObstacleKind,
}

/// Everything a renderer or HUD may read about the current run.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: Phase,
    pub vehicle_x: f32,
    pub vehicle_z: f32,
    pub obstacles: Vec<ObstacleView>,
    pub score: u32,
    pub speed: u32,
    pub distance: u32,
    pub level: u32,
    pub scroll_offset: f32,
    pub crashed_into: Option<ObstacleId>,
}
