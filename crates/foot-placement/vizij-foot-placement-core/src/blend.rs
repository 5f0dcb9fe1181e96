//! Lerp-speed: bounds how long the stationary to walking blend may last.

use serde::{Deserialize, Serialize};

use crate::config::FootPlacementConfig;
use crate::follow::smooth;
use crate::sweep::AdjustmentSweep;

/// Below this the blend window is considered closed.
pub const LERP_SPEED_EPSILON: f32 = 0.001;

/// A [0, 1] scalar: 1 while standing, decaying toward 0 once the character
/// walks or jumps. 0 means "no blend window, use the animated pose".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendSpeed {
    lerp_speed: f32,
}

impl Default for BlendSpeed {
    fn default() -> Self {
        Self { lerp_speed: 1.0 }
    }
}

impl BlendSpeed {
    pub fn lerp_speed(&self) -> f32 {
        self.lerp_speed
    }

    pub fn reset(&mut self) {
        self.lerp_speed = 1.0;
    }

    /// Advance one frame. Walking decays with `stationary_to_walk_smoothing / 2`,
    /// jumping with a quarter of it; any other moving or airborne frame (or a
    /// disabled smoothing) closes the window at once.
    pub fn update(
        &mut self,
        cfg: &FootPlacementConfig,
        is_moving: bool,
        is_grounded: bool,
        jumped: bool,
        sweep: &mut AdjustmentSweep,
        dt: f32,
    ) {
        if !is_moving && is_grounded {
            self.lerp_speed = 1.0;
            return;
        }

        if sweep.cancel() {
            self.lerp_speed = 1.0;
        }

        let walk = cfg.stationary_to_walk_smoothing;
        let open = walk > 0.0 && self.lerp_speed > LERP_SPEED_EPSILON;
        self.lerp_speed = if open && is_grounded && !jumped {
            smooth(self.lerp_speed, 0.0, dt, walk / 2.0)
        } else if open && !is_grounded && jumped {
            smooth(self.lerp_speed, 0.0, dt, walk / 4.0)
        } else {
            0.0
        };
    }
}
