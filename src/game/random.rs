use rand::Rng;

/// Where the spawn policy gets its dice. Any `rand::Rng` works; tests can
/// script exact outcomes.
pub trait RandomSource {
    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.gen::<f32>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}
