use crate::game::sim::SteeringIntent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    SteerLeft,
    SteerRight,
    Restart,
    Start,
}

impl InputAction {
    /// Maps a `KeyboardEvent.code` to an action.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(InputAction::SteerLeft),
            "ArrowRight" | "KeyD" => Some(InputAction::SteerRight),
            "KeyR" => Some(InputAction::Restart),
            "Enter" | "Space" => Some(InputAction::Start),
            _ => None,
        }
    }
}

/// Which steering keys are currently held.
#[derive(Default, Clone, Copy, Debug)]
pub struct InputState {
    left: bool,
    right: bool,
}

impl InputState {
    pub fn set(&mut self, action: InputAction, pressed: bool) {
        match action {
            InputAction::SteerLeft => self.left = pressed,
            InputAction::SteerRight => self.right = pressed,
            InputAction::Restart | InputAction::Start => {}
        }
    }

    pub fn clear(&mut self) {
        *self = InputState::default();
    }

    /// Holding both directions cancels out.
    pub fn intent(&self) -> SteeringIntent {
        match (self.left, self.right) {
            (true, false) => SteeringIntent::Left,
            (false, true) => SteeringIntent::Right,
            _ => SteeringIntent::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_both_steer() {
        assert_eq!(InputAction::from_code("ArrowLeft"), Some(InputAction::SteerLeft));
        assert_eq!(InputAction::from_code("KeyD"), Some(InputAction::SteerRight));
        assert_eq!(InputAction::from_code("KeyR"), Some(InputAction::Restart));
        assert_eq!(InputAction::from_code("KeyQ"), None);
    }

    #[test]
    fn held_keys_resolve_to_intent() {
        let mut input = InputState::default();
        assert_eq!(input.intent(), SteeringIntent::None);
        input.set(InputAction::SteerLeft, true);
        assert_eq!(input.intent(), SteeringIntent::Left);
        input.set(InputAction::SteerRight, true);
        assert_eq!(input.intent(), SteeringIntent::None);
        input.set(InputAction::SteerLeft, false);
        assert_eq!(input.intent(), SteeringIntent::Right);
        input.clear();
        assert_eq!(input.intent(), SteeringIntent::None);
    }
}
