//! Stationary-turn sweep: replant the feet one at a time when the character
//! turns in place past a deadband.

use serde::{Deserialize, Serialize};

use crate::config::FootPlacementConfig;

/// Order in which legs are replanted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepDirection {
    /// No turn observed yet.
    #[default]
    None,
    /// Last leg to first.
    Left,
    /// First leg to last.
    Right,
    /// Every leg at once (turning continued mid-sweep, or during a walk blend).
    Both,
}

/// Signed shortest difference `to - from` in degrees, in (-180, 180].
pub fn delta_angle(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Sweep state for one character.
///
/// `adjust_feet` is a single flag shared by all legs: the engine clears it
/// whenever an adjusting leg is still travelling, and `advance` only moves the
/// sweep front on frames where it survived. Under `Both` this means the sweep
/// ends on the first frame no leg is in flight rather than tracking each leg.
// TODO: track completion per leg so a `Both` sweep cannot end while a slow leg is still replanting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentSweep {
    adjust_feet: bool,
    direction: SweepDirection,
    adjusting: Vec<bool>,
    /// Yaw at the last sweep trigger (deadband centre).
    last_yaw: f32,
    /// Yaw observed on the previous frame.
    previous_yaw: f32,
}

impl AdjustmentSweep {
    pub fn new(leg_count: usize) -> Self {
        Self {
            adjust_feet: false,
            direction: SweepDirection::None,
            adjusting: vec![false; leg_count],
            last_yaw: 0.0,
            previous_yaw: 0.0,
        }
    }

    pub fn adjust_feet(&self) -> bool {
        self.adjust_feet
    }

    pub fn direction(&self) -> SweepDirection {
        self.direction
    }

    pub fn is_adjusting(&self, leg: usize) -> bool {
        self.adjusting.get(leg).copied().unwrap_or(false)
    }

    pub fn adjusting(&self) -> &[bool] {
        &self.adjusting
    }

    pub fn last_yaw(&self) -> f32 {
        self.last_yaw
    }

    /// Legs in processing order for this frame: reversed while sweeping Left.
    pub fn processing_order(&self) -> impl Iterator<Item = usize> {
        let n = self.adjusting.len();
        let reverse = self.direction == SweepDirection::Left;
        (0..n).map(move |i| if reverse { n - 1 - i } else { i })
    }

    /// Feed this frame's root yaw (degrees) and decide whether a sweep starts.
    pub fn observe(
        &mut self,
        cfg: &FootPlacementConfig,
        yaw: f32,
        is_moving: bool,
        is_grounded: bool,
        lerp_speed: f32,
    ) {
        let n = self.adjusting.len();
        let threshold = cfg.max_stationary_rotation_angle;
        let drift = delta_angle(self.last_yaw, yaw).abs();

        if !cfg.rotation_adjustment_enabled(n) {
            self.last_yaw = yaw;
        } else if !is_moving && is_grounded {
            if !self.adjust_feet {
                // Flags left over from a walk blend or a cancelled sweep keep
                // their direction until they drain.
                let pending = self.adjusting.iter().any(|a| *a);
                let turn = delta_angle(self.previous_yaw, yaw);
                // Y-up, right-handed: a negative yaw step is clockwise from above.
                if !pending && turn != 0.0 {
                    let clockwise = turn < 0.0;
                    self.direction = if clockwise != cfg.invert_adjustment_direction {
                        SweepDirection::Right
                    } else {
                        SweepDirection::Left
                    };
                }
                if drift > threshold / 2.0 {
                    self.last_yaw = yaw;
                    if pending {
                        self.all_legs();
                        self.adjust_feet = true;
                    } else {
                        self.start();
                    }
                }
            } else if drift > threshold / 2.0 {
                self.last_yaw = yaw;
                self.all_legs();
                self.adjust_feet = true;
            }
        } else if is_moving && is_grounded && lerp_speed > 0.0 {
            if drift > threshold / 4.0 {
                self.last_yaw = yaw;
                self.all_legs();
            }
        } else {
            self.last_yaw = yaw;
        }

        self.previous_yaw = yaw;
    }

    fn start(&mut self) {
        let first = match self.direction {
            SweepDirection::Right => 0,
            _ => self.adjusting.len() - 1,
        };
        self.adjusting[first] = true;
        self.adjust_feet = true;
        log::trace!("foot sweep started {:?} at leg {first}", self.direction);
    }

    fn all_legs(&mut self) {
        self.adjusting.iter_mut().for_each(|a| *a = true);
        self.direction = SweepDirection::Both;
    }

    /// An adjusting leg is still travelling this frame; hold the sweep front.
    pub fn mark_in_flight(&mut self) {
        self.adjust_feet = false;
    }

    /// Entering a walk or a jump cancels the active sweep. Returns true when
    /// one was active. Per-leg flags are kept and resume once stationary.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.adjust_feet, false)
    }

    /// Advance the sweep front after all legs were processed.
    pub fn advance(&mut self, is_moving: bool) {
        if is_moving {
            return;
        }
        if !self.adjust_feet {
            if self.adjusting.iter().any(|a| *a) {
                self.adjust_feet = true;
            }
            return;
        }

        let n = self.adjusting.len();
        match self.direction {
            SweepDirection::Left => {
                for i in (0..n).rev() {
                    if self.adjusting[i] {
                        self.adjusting[i] = false;
                        if i > 0 {
                            self.adjusting[i - 1] = true;
                            break;
                        }
                        self.finish();
                    }
                }
            }
            SweepDirection::Right => {
                for i in 0..n {
                    if self.adjusting[i] {
                        self.adjusting[i] = false;
                        if i + 1 < n {
                            self.adjusting[i + 1] = true;
                            break;
                        }
                        self.finish();
                    }
                }
            }
            SweepDirection::Both | SweepDirection::None => {
                self.adjusting.iter_mut().for_each(|a| *a = false);
                self.finish();
            }
        }
    }

    fn finish(&mut self) {
        self.adjust_feet = false;
        log::trace!("foot sweep finished");
    }
}
