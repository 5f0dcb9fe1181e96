//! Output contracts from the core.
//!
//! Outputs carry the corrected world poses for every handle plus optional
//! debug lines. Adapters write the poses back to their hosts; the external IK
//! solver then consumes the targets and hints.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::debug::DebugLine;
use crate::inputs::{HipPose, LegPose};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegOutput {
    pub target_position: Vec3,
    pub target_rotation: Quat,
    pub hint_position: Vec3,
}

impl From<&LegPose> for LegOutput {
    fn from(pose: &LegPose) -> Self {
        Self {
            target_position: pose.target_position,
            target_rotation: pose.target_rotation,
            hint_position: pose.hint_position,
        }
    }
}

/// Corrected hip pose. Rotation only ever differs from the input in pitch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HipOutput {
    pub position: Vec3,
    pub rotation: Quat,
}

impl From<&HipPose> for HipOutput {
    fn from(pose: &HipPose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
        }
    }
}

/// Outputs returned by `FootPlacement::step`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameOutputs {
    /// Always one entry per bound leg.
    pub legs: Vec<LegOutput>,
    pub hips: HipOutput,
    #[serde(default)]
    pub debug: Vec<DebugLine>,
}
