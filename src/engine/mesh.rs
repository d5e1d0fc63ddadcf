/// Interleaved `x, y, z, shade` vertices plus triangle indices. Shade is a
/// per-face brightness that fakes a fixed light from above.
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

pub const FLOATS_PER_VERTEX: usize = 4;

impl Mesh {
    /// Unit box centered on the origin, resting nowhere in particular.
    pub fn unit_box() -> Self {
        let s = 0.5;
        let mut mesh = Mesh { vertices: Vec::new(), indices: Vec::new() };

        mesh.quad([[-s, -s, s], [s, -s, s], [s, s, s], [-s, s, s]], 0.9);
        mesh.quad([[s, -s, -s], [-s, -s, -s], [-s, s, -s], [s, s, -s]], 0.7);
        mesh.quad([[-s, s, s], [s, s, s], [s, s, -s], [-s, s, -s]], 1.1);
        mesh.quad([[-s, -s, -s], [s, -s, -s], [s, -s, s], [-s, -s, s]], 0.4);
        mesh.quad([[s, -s, s], [s, -s, -s], [s, s, -s], [s, s, s]], 0.8);
        mesh.quad([[-s, -s, -s], [-s, -s, s], [-s, s, s], [-s, s, -s]], 0.6);

        mesh
    }

    /// Square pyramid with its base at y = -0.5 and apex at y = 0.5.
    pub fn unit_pyramid() -> Self {
        let s = 0.5;
        let apex = [0.0, s, 0.0];
        let mut mesh = Mesh { vertices: Vec::new(), indices: Vec::new() };

        mesh.quad([[-s, -s, -s], [s, -s, -s], [s, -s, s], [-s, -s, s]], 0.4);
        mesh.triangle([[-s, -s, s], [s, -s, s], apex], 1.0);
        mesh.triangle([[s, -s, s], [s, -s, -s], apex], 0.85);
        mesh.triangle([[s, -s, -s], [-s, -s, -s], apex], 0.7);
        mesh.triangle([[-s, -s, -s], [-s, -s, s], apex], 0.85);

        mesh
    }

    pub fn index_count(&self) -> i32 {
        self.indices.len() as i32
    }

    fn base(&self) -> u16 {
        (self.vertices.len() / FLOATS_PER_VERTEX) as u16
    }

    fn push(&mut self, p: [f32; 3], shade: f32) {
        self.vertices.extend_from_slice(&[p[0], p[1], p[2], shade]);
    }

    fn quad(&mut self, corners: [[f32; 3]; 4], shade: f32) {
        let base = self.base();
        for c in corners {
            self.push(c, shade);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn triangle(&mut self, corners: [[f32; 3]; 3], shade: f32) {
        let base = self.base();
        for c in corners {
            self.push(c, shade);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_six_faces() {
        let mesh = Mesh::unit_box();
        assert_eq!(mesh.vertices.len(), 24 * FLOATS_PER_VERTEX);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn pyramid_indices_stay_in_bounds() {
        let mesh = Mesh::unit_pyramid();
        let verts = (mesh.vertices.len() / FLOATS_PER_VERTEX) as u16;
        assert_eq!(mesh.index_count(), 6 + 4 * 3);
        assert!(mesh.indices.iter().all(|&i| i < verts));
    }
}
