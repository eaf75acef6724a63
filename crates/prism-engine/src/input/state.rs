use super::{InputEvent, KeyCode, KeyState};

/// Number of addressable key codes.
pub const KEY_COUNT: usize = 256;

/// Held-key table for a single window.
///
/// Every code a `u8` can express has a slot, so lookups never fail.
#[derive(Debug, Clone)]
pub struct Input {
    keys: [bool; KEY_COUNT],
}

impl Input {
    /// All keys start released.
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn key_down(&mut self, key: KeyCode) {
        self.keys[key.index()] = true;
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.keys[key.index()] = false;
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys[key.index()]
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Applies a platform-agnostic input event.
    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Key { code, state } => match state {
                KeyState::Pressed => self.key_down(code),
                KeyState::Released => self.key_up(code),
            },

            // On focus loss the matching releases never arrive.
            InputEvent::Focused(false) => self.clear(),
            InputEvent::Focused(true) => {}
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}
