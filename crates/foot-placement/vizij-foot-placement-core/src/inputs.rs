//! Per-frame input contracts.
//!
//! Adapters sample the animated pose after animation evaluation and before the
//! pose is finalized, then pass it into `FootPlacement::step`. All positions
//! and rotations are world space.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The character root (the object the locomotion code moves and turns).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RootPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for RootPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Animated pose of one leg's IK target and hint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegPose {
    pub target_position: Vec3,
    pub target_rotation: Quat,
    pub hint_position: Vec3,
}

impl LegPose {
    pub fn new(target_position: Vec3, hint_position: Vec3) -> Self {
        Self {
            target_position,
            target_rotation: Quat::IDENTITY,
            hint_position,
        }
    }
}

/// Animated hip pose. `parent_rotation` is the world rotation of the hips'
/// parent, used to split the hip rotation into local yaw/pitch/roll.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HipPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub parent_rotation: Quat,
}

impl HipPose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            parent_rotation: Quat::IDENTITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameInputs {
    /// Seconds since the previous frame.
    pub dt: f32,
    pub root: RootPose,
    /// One entry per bound leg, in rig order.
    pub legs: Vec<LegPose>,
    pub hips: HipPose,
}
