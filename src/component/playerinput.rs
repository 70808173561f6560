/// Tags an entity as receiving input from the local player
#[derive(Clone, Copy)]
pub struct PlayerInput {
}

/// The logical keys the character understands. Mapping physical keys to these is up to the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalKey {
    Left,
    Right,
    Jump,
}

/// Latest input written by the host's event handlers & polled once per tick.
/// Writes are last-write-wins, nothing is queued
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputIntent {
    pub move_left: bool,
    pub move_right: bool,
    /// latched on a jump key-down edge, consumed by the next tick
    pub jump_requested: bool,
    /// latched on auto-repeat key-downs while the key is held
    pub jump_repeated: bool,
    pub jump_held: bool,
}

impl InputIntent {
    pub fn default() -> InputIntent {
        InputIntent {
            move_left: false,
            move_right: false,
            jump_requested: false,
            jump_repeated: false,
            jump_held: false,
        }
    }

    pub fn key_down(self: &mut Self, key: LogicalKey) {
        match key {
            LogicalKey::Left => self.move_left = true,
            LogicalKey::Right => self.move_right = true,
            LogicalKey::Jump => {
                if self.jump_held {
                    self.jump_repeated = true;
                }
                else {
                    self.jump_requested = true;
                }
                self.jump_held = true;
            }
        }
    }

    pub fn key_up(self: &mut Self, key: LogicalKey) {
        match key {
            LogicalKey::Left => self.move_left = false,
            LogicalKey::Right => self.move_right = false,
            LogicalKey::Jump => self.jump_held = false,
        }
    }

    pub fn wants_move(self: &Self) -> bool {
        self.move_left || self.move_right
    }

    /// Returns whether a jump edge was latched since the last call
    pub fn take_jump_request(self: &mut Self) -> bool {
        let requested = self.jump_requested;
        self.jump_requested = false;
        requested
    }

    /// Returns whether an auto-repeat was latched since the last call
    pub fn take_jump_repeat(self: &mut Self) -> bool {
        let repeated = self.jump_repeated;
        self.jump_repeated = false;
        repeated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_between_ticks_still_latches_request() {
        let mut intent = InputIntent::default();
        intent.key_down(LogicalKey::Jump);
        intent.key_up(LogicalKey::Jump);

        assert!(!intent.jump_held);
        assert!(intent.take_jump_request());
        assert!(!intent.take_jump_request());
    }

    #[test]
    fn auto_repeat_is_not_a_fresh_press() {
        let mut intent = InputIntent::default();
        for _ in 0..10 {
            intent.key_down(LogicalKey::Jump);
        }
        assert!(intent.take_jump_request());
        assert!(!intent.take_jump_request());
        assert!(intent.take_jump_repeat());
        assert!(!intent.take_jump_repeat());

        intent.key_up(LogicalKey::Jump);
        intent.key_down(LogicalKey::Jump);
        assert!(intent.take_jump_request());
        assert!(!intent.take_jump_repeat());
    }

    #[test]
    fn movement_is_last_write_wins() {
        let mut intent = InputIntent::default();
        intent.key_down(LogicalKey::Left);
        intent.key_up(LogicalKey::Left);
        intent.key_down(LogicalKey::Right);
        assert!(!intent.move_left);
        assert!(intent.move_right);
        assert!(intent.wants_move());
    }
}
