//! Directional input merging
//!
//! Arrow keys, WASD and the virtual joystick each report four held flags.
//! They are OR-ed together and turned into one movement vector.

use glam::Vec2;

/// Held state of one directional source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionFlags {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DirectionFlags {
    fn merge(self, other: DirectionFlags) -> DirectionFlags {
        DirectionFlags {
            left: self.left || other.left,
            right: self.right || other.right,
            up: self.up || other.up,
            down: self.down || other.down,
        }
    }
}

/// All three movement sources
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub arrows: DirectionFlags,
    pub wasd: DirectionFlags,
    pub joystick: DirectionFlags,
}

impl InputState {
    /// Update keyboard flags from a `KeyboardEvent.key` value.
    ///
    /// Returns `false` for keys that aren't movement keys.
    pub fn set_key(&mut self, key: &str, held: bool) -> bool {
        let flag = match key {
            "ArrowLeft" => &mut self.arrows.left,
            "ArrowRight" => &mut self.arrows.right,
            "ArrowUp" => &mut self.arrows.up,
            "ArrowDown" => &mut self.arrows.down,
            "a" | "A" => &mut self.wasd.left,
            "d" | "D" => &mut self.wasd.right,
            "w" | "W" => &mut self.wasd.up,
            "s" | "S" => &mut self.wasd.down,
            _ => return false,
        };
        *flag = held;
        true
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Unit movement vector, or zero when idle.
    ///
    /// Left wins over right and up wins over down. Screen y grows downward.
    pub fn direction(&self) -> Vec2 {
        let held = self.arrows.merge(self.wasd).merge(self.joystick);

        let x = if held.left {
            -1.0
        } else if held.right {
            1.0
        } else {
            0.0
        };
        let y = if held.up {
            -1.0
        } else if held.down {
            1.0
        } else {
            0.0
        };

        Vec2::new(x, y).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_zero() {
        assert_eq!(InputState::default().direction(), Vec2::ZERO);
    }

    #[test]
    fn test_sources_merge() {
        let mut input = InputState::default();
        input.set_key("ArrowLeft", true);
        input.joystick.down = true;
        let dir = input.direction();
        assert!((dir - Vec2::new(-1.0, 1.0).normalize()).length() < 0.0001);
    }

    #[test]
    fn test_left_and_up_take_precedence() {
        let mut input = InputState::default();
        input.set_key("d", true);
        input.set_key("a", true);
        input.set_key("s", true);
        input.set_key("ArrowUp", true);
        let dir = input.direction();
        assert!((dir - Vec2::new(-1.0, -1.0).normalize()).length() < 0.0001);
    }

    #[test]
    fn test_release_and_unknown_keys() {
        let mut input = InputState::default();
        assert!(input.set_key("W", true));
        assert!(input.set_key("W", false));
        assert!(!input.set_key("Escape", true));
        assert_eq!(input.direction(), Vec2::ZERO);
    }
}
