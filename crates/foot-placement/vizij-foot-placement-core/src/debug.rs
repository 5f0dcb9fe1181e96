//! Diagnostic line segments (probe rays, deadband cone).

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::ground::GroundSample;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugColor {
    Red,
    Blue,
    White,
    Yellow,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: DebugColor,
}

impl DebugLine {
    pub fn new(start: Vec3, end: Vec3, color: DebugColor) -> Self {
        Self { start, end, color }
    }
}

/// Origin to hit in `color`, then the unused rest of the probe in white.
pub(crate) fn push_probe(out: &mut Vec<DebugLine>, sample: &GroundSample, length: f32, color: DebugColor) {
    if !sample.has_hit {
        return;
    }
    let travelled = sample.origin.distance(sample.point);
    out.push(DebugLine::new(sample.origin, sample.point, color));
    out.push(DebugLine::new(
        sample.point,
        sample.point + Vec3::NEG_Y * (length - travelled).max(0.0),
        DebugColor::White,
    ));
}

/// Current facing in yellow and both edges of the stationary cone in red.
pub(crate) fn push_deadband(
    out: &mut Vec<DebugLine>,
    root: Vec3,
    rotation: Quat,
    last_yaw_degrees: f32,
    angle_degrees: f32,
) {
    let half = angle_degrees / 2.0;
    out.push(DebugLine::new(root, root + rotation * Vec3::NEG_Z, DebugColor::Yellow));
    for edge in [last_yaw_degrees + half, last_yaw_degrees - half] {
        let dir = Quat::from_rotation_y(edge.to_radians()) * Vec3::NEG_Z;
        out.push(DebugLine::new(root, root + dir, DebugColor::Red));
    }
}
