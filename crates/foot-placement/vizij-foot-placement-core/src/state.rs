//! Character flags owned by the host's locomotion code.

use serde::{Deserialize, Serialize};

/// Flags written by the movement logic every frame and read by the core.
///
/// The core writes back exactly one thing: `jumped` is cleared on the frame
/// the character lands, so callers must not clear it themselves that frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterState {
    pub is_grounded: bool,
    pub is_moving: bool,
    pub jumped: bool,
    pub is_active: bool,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self {
            is_grounded: true,
            is_moving: true,
            jumped: false,
            is_active: true,
        }
    }
}

impl CharacterState {
    /// Grounded and standing still.
    pub fn standing() -> Self {
        Self {
            is_moving: false,
            ..Self::default()
        }
    }

    /// Grounded and walking.
    pub fn walking() -> Self {
        Self::default()
    }

    /// In the air after a jump.
    pub fn jumping() -> Self {
        Self {
            is_grounded: false,
            jumped: true,
            ..Self::default()
        }
    }

    /// Clears `jumped` when the character is back on the ground. Returns true
    /// on the landing frame.
    pub(crate) fn land(&mut self) -> bool {
        if self.jumped && self.is_grounded {
            self.jumped = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_clears_jumped_once() {
        let mut s = CharacterState::jumping();
        assert!(!s.land());
        s.is_grounded = true;
        assert!(s.land());
        assert!(!s.jumped);
        assert!(!s.land());
    }
}
