pub mod clock;
pub mod collision;
pub mod config;
pub mod input;
pub mod obstacle;
pub mod random;
pub mod scene;
pub mod sim;
pub mod snapshot;

use log::debug;
use rand::rngs::SmallRng;

use crate::game::clock::FixedStep;
use crate::game::config::GameConfig;
use crate::game::input::{InputAction, InputState};
use crate::game::random::RandomSource;
use crate::game::sim::{Simulation, SteeringIntent};
use crate::game::snapshot::{Phase, Snapshot};

/// One browser session: the simulation plus the input and frame pacing
/// around it. Input events land here; the renderer only ever sees snapshots.
pub struct Game<R = SmallRng> {
    sim: Simulation<R>,
    input: InputState,
    touch: SteeringIntent,
    clock: FixedStep,
}

impl Game<SmallRng> {
    pub fn new(config: GameConfig) -> Self {
        Game::with_simulation(Simulation::new(config))
    }
}

impl<R: RandomSource> Game<R> {
    pub fn with_simulation(sim: Simulation<R>) -> Self {
        let config = sim.config();
        let clock = FixedStep::new(config.tick_hz, config.max_steps_per_frame);
        Game {
            sim,
            input: InputState::default(),
            touch: SteeringIntent::None,
            clock,
        }
    }

    /// Routes a raw key event. Returns whether the key belongs to the game.
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        match InputAction::from_code(code) {
            Some(action) => {
                self.apply(action, pressed);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, action: InputAction, pressed: bool) {
        self.input.set(action, pressed);
        if !pressed {
            return;
        }
        match action {
            InputAction::Start => self.start(),
            InputAction::Restart => self.restart(),
            InputAction::SteerLeft | InputAction::SteerRight => {}
        }
    }

    /// Only meaningful from the menu.
    pub fn start(&mut self) {
        if self.sim.phase() != Phase::Idle {
            debug!("start requested outside the menu, ignoring");
            return;
        }
        self.clock.reset();
        self.sim.start();
    }

    /// Only meaningful once the run has ended.
    pub fn restart(&mut self) {
        if self.sim.phase() != Phase::Ended {
            debug!("restart requested while {:?}, ignoring", self.sim.phase());
            return;
        }
        self.clock.reset();
        self.sim.reset();
    }

    /// Steering from a non-keyboard source; keyboard wins when both are active.
    pub fn steer(&mut self, intent: SteeringIntent) {
        self.touch = intent;
    }

    /// Runs however many fixed ticks the elapsed time allows. Rendering should
    /// read `snapshot()` only after this returns.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let steps = self.clock.frame(now_ms);
        let intent = match self.input.intent() {
            SteeringIntent::None => self.touch,
            held => held,
        };
        self.sim.set_steering_intent(intent);
        for _ in 0..steps {
            self.sim.tick();
        }
        steps
    }

    pub fn snapshot(&self) -> Snapshot {
        self.sim.snapshot()
    }

    pub fn simulation(&self) -> &Simulation<R> {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation<R> {
        &mut self.sim
    }
}
