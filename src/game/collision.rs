use crate::game::config::Size;

/// Axis-aligned rectangle on the road plane. `x` is lateral, `z` longitudinal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub left: f32,
    pub right: f32,
    pub front: f32,
    pub back: f32,
}

impl Footprint {
    pub fn centered(x: f32, z: f32, size: Size) -> Self {
        let hw = size.width / 2.0;
        let hd = size.depth / 2.0;
        Footprint {
            left: x - hw,
            right: x + hw,
            front: z - hd,
            back: z + hd,
        }
    }

    /// Pulls every edge in by `margin`, never past the center.
    pub fn shrink(&self, margin: f32) -> Self {
        let mx = margin.clamp(0.0, (self.right - self.left) / 2.0);
        let mz = margin.clamp(0.0, (self.back - self.front) / 2.0);
        Footprint {
            left: self.left + mx,
            right: self.right - mx,
            front: self.front + mz,
            back: self.back - mz,
        }
    }

    /// Strict overlap on both axes; touching edges do not count.
    pub fn intersects(&self, other: &Footprint) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.front < other.back
            && self.back > other.front
    }
}
