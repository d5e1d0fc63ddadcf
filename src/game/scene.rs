use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

use crate::engine::renderer::{Placement, Renderer, Shape};
use crate::game::config::GameConfig;
use crate::game::obstacle::ObstacleKind;
use crate::game::snapshot::{ObstacleView, Phase, Snapshot};

const SKY: (f32, f32, f32) = (0.53, 0.81, 0.92);
const CRASH_SKY: (f32, f32, f32) = (0.75, 0.35, 0.35);
const ROAD: (f32, f32, f32) = (0.27, 0.27, 0.27);
const GRASS: (f32, f32, f32) = (0.13, 0.55, 0.13);
const MARKING: (f32, f32, f32) = (1.0, 1.0, 1.0);

const PLAYER_BODY: (f32, f32, f32) = (0.0, 0.4, 1.0);
const PLAYER_ROOF: (f32, f32, f32) = (0.0, 0.27, 0.6);
const WHEEL: (f32, f32, f32) = (0.13, 0.13, 0.13);
const HEADLIGHT: (f32, f32, f32) = (1.0, 1.0, 0.67);

const TRAFFIC_COLORS: [(f32, f32, f32); 4] = [
    (1.0, 0.0, 0.0),
    (0.0, 1.0, 0.0),
    (1.0, 1.0, 0.0),
    (1.0, 0.0, 1.0),
];
const TRUCK: (f32, f32, f32) = (0.55, 0.27, 0.07);
const CONE: (f32, f32, f32) = (1.0, 0.27, 0.0);

const ROAD_LENGTH: f32 = 200.0;
const SHOULDER_WIDTH: f32 = 30.0;
const MARKING_COUNT: usize = 20;
const MARKING_START_Z: f32 = 20.0;

const CRASH_SPIN_RATE: f32 = 0.12;
const CRASH_SPIN_MAX: f32 = std::f32::consts::PI * 1.5;

/// Draws snapshots. The crash spin is purely cosmetic and never reaches the
/// simulation.
pub struct Scene {
    renderer: Renderer,
    config: GameConfig,
    crash_spin: f32,
}

impl Scene {
    pub fn new(renderer: Renderer, config: GameConfig) -> Self {
        Scene { renderer, config, crash_spin: 0.0 }
    }

    pub fn render(&mut self, snapshot: &Snapshot) {
        self.crash_spin = next_spin(self.crash_spin, snapshot.phase);

        let Some(canvas) = self.renderer.canvas() else {
            return;
        };
        let (width, height) = (canvas.width(), canvas.height());
        if width == 0 || height == 0 {
            return;
        }
        self.renderer.resize(width as i32, height as i32);

        let aspect = width as f32 / height as f32;
        let projection = Perspective3::new(aspect, 60f32.to_radians(), 0.1, 1000.0).to_homogeneous();
        let eye = Point3::new(0.0, 25.0, 8.0);
        let target = Point3::new(0.0, 0.0, -10.0);
        let view = Matrix4::look_at_rh(&eye, &target, &Vector3::y());

        let sky = if snapshot.phase == Phase::Ended { CRASH_SKY } else { SKY };
        self.renderer.begin_frame(sky, 50.0, 200.0, &(projection * view));

        self.draw_road(snapshot.scroll_offset);
        for obstacle in &snapshot.obstacles {
            self.draw_obstacle(obstacle);
        }
        self.draw_player(snapshot.vehicle_x, snapshot.vehicle_z);
    }

    fn draw_road(&self, scroll: f32) {
        let (min, max) = self.config.road_bounds();
        let lane_gap = lane_gap(&self.config.lanes);
        let road_width = (max - min) + 2.0 * lane_gap;
        let mid = (min + max) / 2.0;
        let center_z = MARKING_START_Z - ROAD_LENGTH / 2.0;

        self.renderer.draw(Shape::Box, Placement::new(mid, -0.05, center_z, road_width, 0.1, ROAD_LENGTH), ROAD);
        let offset = road_width / 2.0 + SHOULDER_WIDTH / 2.0;
        for side in [-1.0, 1.0] {
            self.renderer.draw(
                Shape::Box,
                Placement::new(mid + side * offset, -0.06, center_z, SHOULDER_WIDTH, 0.1, ROAD_LENGTH),
                GRASS,
            );
        }

        let spacing = self.config.marking_spacing.max(1.0);
        for pair in self.config.lanes.windows(2) {
            let x = (pair[0] + pair[1]) / 2.0;
            for i in 0..MARKING_COUNT {
                let z = MARKING_START_Z + scroll - i as f32 * spacing;
                self.renderer.draw(Shape::Box, Placement::new(x, 0.01, z, 0.3, 0.02, 2.0), MARKING);
            }
        }
    }

    fn draw_player(&self, x: f32, z: f32) {
        let yaw = self.crash_spin;
        let part = |dx: f32, y: f32, dz: f32, w: f32, h: f32, d: f32| {
            let (ox, oz) = rotate(dx, dz, yaw);
            Placement::new(x + ox, y, z + oz, w, h, d).turned(yaw)
        };

        self.renderer.draw(Shape::Box, part(0.0, 0.3, 0.0, 1.5, 0.6, 3.0), PLAYER_BODY);
        self.renderer.draw(Shape::Box, part(0.0, 0.7, 0.2, 1.2, 0.4, 1.5), PLAYER_ROOF);
        for (dx, dz) in [(-0.8, 1.2), (0.8, 1.2), (-0.8, -1.2), (0.8, -1.2)] {
            self.renderer.draw(Shape::Box, part(dx, 0.3, dz, 0.2, 0.6, 0.6), WHEEL);
        }
        for dx in [-0.5, 0.5] {
            self.renderer.draw(Shape::Box, part(dx, 0.4, -1.55, 0.3, 0.2, 0.1), HEADLIGHT);
        }
    }

    fn draw_obstacle(&self, obstacle: &ObstacleView) {
        let size = self.config.obstacle_size(obstacle.kind);
        let (x, z) = (obstacle.x, obstacle.z);
        match obstacle.kind {
            ObstacleKind::Car => {
                let color = TRAFFIC_COLORS[(obstacle.id.0 % TRAFFIC_COLORS.len() as u64) as usize];
                self.renderer.draw(Shape::Box, Placement::new(x, 0.25, z, size.width, 0.5, size.depth), color);
                self.renderer.draw(
                    Shape::Box,
                    Placement::new(x, 0.65, z, size.width * 0.8, 0.3, size.depth * 0.5),
                    shade(color, 0.7),
                );
            }
            ObstacleKind::Truck => {
                self.renderer.draw(Shape::Box, Placement::new(x, 0.4, z, size.width, 0.8, size.depth), TRUCK);
                self.renderer.draw(
                    Shape::Box,
                    Placement::new(x, 1.0, z + size.depth * 0.3, size.width * 0.9, 0.4, size.depth * 0.3),
                    shade(TRUCK, 0.8),
                );
            }
            ObstacleKind::Cone => {
                self.renderer.draw(Shape::Pyramid, Placement::new(x, 0.5, z, size.width, 1.0, size.depth), CONE);
            }
        }
    }
}

fn next_spin(spin: f32, phase: Phase) -> f32 {
    match phase {
        Phase::Ended => (spin + CRASH_SPIN_RATE).min(CRASH_SPIN_MAX),
        Phase::Idle | Phase::Playing => 0.0,
    }
}

fn lane_gap(lanes: &[f32]) -> f32 {
    match lanes {
        [a, b, ..] => b - a,
        _ => 3.0,
    }
}

fn rotate(dx: f32, dz: f32, yaw: f32) -> (f32, f32) {
    let (sin, cos) = yaw.sin_cos();
    (dx * cos + dz * sin, -dx * sin + dz * cos)
}

fn shade(color: (f32, f32, f32), k: f32) -> (f32, f32, f32) {
    (color.0 * k, color.1 * k, color.2 * k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_grows_only_after_a_crash() {
        let mut spin = 0.0;
        for _ in 0..5 {
            spin = next_spin(spin, Phase::Playing);
        }
        assert_eq!(spin, 0.0);
        for _ in 0..1000 {
            spin = next_spin(spin, Phase::Ended);
        }
        assert_eq!(spin, CRASH_SPIN_MAX);
        assert_eq!(next_spin(spin, Phase::Playing), 0.0);
    }

    #[test]
    fn offsets_turn_with_the_car() {
        let (x, z) = rotate(1.0, 0.0, std::f32::consts::FRAC_PI_2);
        assert!(x.abs() < 1e-6);
        assert!((z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn lane_gap_falls_back_for_single_lane() {
        assert_eq!(lane_gap(&[-3.0, 0.0, 3.0]), 3.0);
        assert_eq!(lane_gap(&[0.0]), 3.0);
    }
}
