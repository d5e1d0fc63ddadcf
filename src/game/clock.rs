/// Converts wall-clock frame time into a whole number of fixed simulation
/// steps. Leftover time carries into the next frame.
pub struct FixedStep {
    step_ms: f64,
    max_steps: u32,
    accumulated_ms: f64,
    last_frame_ms: Option<f64>,
}

impl FixedStep {
    pub fn new(tick_hz: u32, max_steps: u32) -> Self {
        FixedStep {
            step_ms: 1000.0 / tick_hz.max(1) as f64,
            max_steps: max_steps.max(1),
            accumulated_ms: 0.0,
            last_frame_ms: None,
        }
    }

    /// Feed the timestamp handed to the animation-frame callback. Returns how
    /// many steps to run before this frame is drawn.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let elapsed = match self.last_frame_ms.replace(now_ms) {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.advance(elapsed)
    }

    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if !elapsed_ms.is_finite() {
            return 0;
        }
        self.accumulated_ms += elapsed_ms.max(0.0);
        let mut steps = 0;
        while self.accumulated_ms >= self.step_ms && steps < self.max_steps {
            self.accumulated_ms -= self.step_ms;
            steps += 1;
        }
        // After a stall (background tab, breakpoint) drop the backlog rather
        // than fast-forwarding the run.
        if steps == self.max_steps {
            self.accumulated_ms = self.accumulated_ms.min(self.step_ms);
        }
        steps
    }

    /// Forget accumulated time, e.g. when a run (re)starts.
    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_frames_sometimes_run_zero_steps() {
        let mut clock = FixedStep::new(60, 5);
        assert_eq!(clock.frame(0.0), 0);
        assert_eq!(clock.frame(8.0), 0);
        assert_eq!(clock.frame(17.0), 1);
    }

    #[test]
    fn leftover_time_carries_over() {
        let mut clock = FixedStep::new(50, 5);
        assert_eq!(clock.advance(30.0), 1);
        assert_eq!(clock.advance(10.0), 1);
        assert_eq!(clock.advance(19.0), 0);
    }

    #[test]
    fn stalls_are_capped() {
        let mut clock = FixedStep::new(60, 5);
        assert_eq!(clock.advance(10_000.0), 5);
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn garbage_elapsed_time_is_ignored() {
        let mut clock = FixedStep::new(60, 5);
        assert_eq!(clock.advance(f64::NAN), 0);
        assert_eq!(clock.advance(-50.0), 0);
        assert!((clock.step_ms() - 1000.0 / 60.0).abs() < 1e-9);
    }
}
