//! Session configuration for foot placement.

use serde::{Deserialize, Serialize};

use crate::error::{SetupError, SetupResult};

/// Upper bound accepted for every smoothing time constant, in seconds.
pub const MAX_SMOOTHING: f32 = 5.0;
/// Upper bound of the stationary rotation deadband, in degrees.
pub const MAX_STATIONARY_ROTATION_ANGLE: f32 = 360.0;

/// Tuning for one character. Treated as immutable for the lifetime of a
/// `FootPlacement`; the controller keeps a sanitized copy.
///
/// Every smoothing value is a first-order time constant in seconds. A value
/// of zero (or less) makes the corresponding follower snap instantly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootPlacementConfig {
    /// Height above the root from which probes are cast downwards.
    pub raycast_height: f32,
    /// Length of every probe.
    pub raycast_length: f32,

    pub feet_position_offset_weight: f32,
    pub feet_rotation_offset_weight: f32,
    pub feet_position_offset_smoothing: f32,
    pub feet_rotation_offset_smoothing: f32,

    pub body_position_offset_weight: f32,
    /// Tilts the hips with the ground under the body. Meant for quadrupeds.
    pub body_rotation_offset_weight: f32,
    pub body_position_offset_smoothing: f32,
    /// Kept for authored presets; hip tilt follows `feet_rotation_offset_smoothing`.
    pub body_rotation_offset_smoothing: f32,
    /// Moves the hips up instead of down when the feet drop.
    pub invert_body_position_offset: bool,
    pub invert_body_rotation_offset: bool,

    /// Bounds the stationary to walking blend.
    pub stationary_to_walk_smoothing: f32,
    /// Speed of the one-leg-at-a-time replant while turning in place.
    pub stationary_to_rotate_smoothing: f32,
    /// Deadband cone, in degrees, inside which planted feet stay planted.
    pub max_stationary_rotation_angle: f32,
    /// Start clockwise sweeps from the last leg instead of the first.
    pub invert_adjustment_direction: bool,

    /// Emit debug lines alongside the frame outputs. Never affects numbers.
    pub draw_debug_ray: bool,
}

impl Default for FootPlacementConfig {
    fn default() -> Self {
        Self {
            raycast_height: 0.5,
            raycast_length: 1.0,
            feet_position_offset_weight: 1.0,
            feet_rotation_offset_weight: 1.0,
            feet_position_offset_smoothing: 0.035,
            feet_rotation_offset_smoothing: 0.1,
            body_position_offset_weight: 1.0,
            body_rotation_offset_weight: 0.0,
            body_position_offset_smoothing: 0.035,
            body_rotation_offset_smoothing: 0.2,
            invert_body_position_offset: false,
            invert_body_rotation_offset: false,
            stationary_to_walk_smoothing: 0.2,
            stationary_to_rotate_smoothing: 0.06,
            max_stationary_rotation_angle: 60.0,
            invert_adjustment_direction: false,
            draw_debug_ray: true,
        }
    }
}

impl FootPlacementConfig {
    /// Defaults tuned for two-legged characters: no hip tilt.
    pub fn biped() -> Self {
        Self::default()
    }

    /// Four-legged characters follow the slope under the body with the hips.
    pub fn quadruped() -> Self {
        Self {
            body_rotation_offset_weight: 1.0,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON document; missing fields take defaults.
    pub fn from_json(text: &str) -> SetupResult<Self> {
        serde_json::from_str(text).map_err(|err| SetupError::InvalidConfig(err.to_string()))
    }

    /// Clamp every field into its accepted range.
    pub fn sanitized(&self) -> Self {
        let weight = |v: f32| v.clamp(0.0, 1.0);
        let smoothing = |v: f32| v.clamp(0.0, MAX_SMOOTHING);
        Self {
            raycast_height: self.raycast_height,
            raycast_length: self.raycast_length.max(0.0),
            feet_position_offset_weight: weight(self.feet_position_offset_weight),
            feet_rotation_offset_weight: weight(self.feet_rotation_offset_weight),
            feet_position_offset_smoothing: smoothing(self.feet_position_offset_smoothing),
            feet_rotation_offset_smoothing: smoothing(self.feet_rotation_offset_smoothing),
            body_position_offset_weight: weight(self.body_position_offset_weight),
            body_rotation_offset_weight: weight(self.body_rotation_offset_weight),
            body_position_offset_smoothing: smoothing(self.body_position_offset_smoothing),
            body_rotation_offset_smoothing: smoothing(self.body_rotation_offset_smoothing),
            invert_body_position_offset: self.invert_body_position_offset,
            invert_body_rotation_offset: self.invert_body_rotation_offset,
            stationary_to_walk_smoothing: smoothing(self.stationary_to_walk_smoothing),
            stationary_to_rotate_smoothing: smoothing(self.stationary_to_rotate_smoothing),
            max_stationary_rotation_angle: self
                .max_stationary_rotation_angle
                .clamp(0.0, MAX_STATIONARY_ROTATION_ANGLE),
            invert_adjustment_direction: self.invert_adjustment_direction,
            draw_debug_ray: self.draw_debug_ray,
        }
    }

    /// Whether turning in place replants the feet. When false the feet simply
    /// follow the animation (and slide) while the character turns.
    pub fn rotation_adjustment_enabled(&self, leg_count: usize) -> bool {
        self.stationary_to_rotate_smoothing > 0.0
            && self.max_stationary_rotation_angle != 0.0
            && self.max_stationary_rotation_angle != MAX_STATIONARY_ROTATION_ANGLE
            && leg_count > 0
    }

    pub(crate) fn probes_body(&self) -> bool {
        self.body_position_offset_weight > 0.0 || self.body_rotation_offset_weight > 0.0
    }

    pub(crate) fn probes_legs(&self) -> bool {
        self.feet_position_offset_weight > 0.0
            || self.feet_rotation_offset_weight > 0.0
            || self.body_position_offset_weight > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = FootPlacementConfig::from_json(r#"{ "raycast_length": 2.5 }"#).unwrap();
        assert_eq!(cfg.raycast_length, 2.5);
        assert_eq!(cfg.max_stationary_rotation_angle, 60.0);
        assert!(cfg.draw_debug_ray);
    }

    #[test]
    fn malformed_json_is_a_setup_error() {
        let err = FootPlacementConfig::from_json("{ raycast_length: }").unwrap_err();
        assert!(matches!(err, SetupError::InvalidConfig(_)));
    }

    #[test]
    fn sanitized_clamps_to_accepted_ranges() {
        let cfg = FootPlacementConfig {
            feet_position_offset_weight: 3.0,
            body_rotation_offset_weight: -1.0,
            feet_rotation_offset_smoothing: 12.0,
            max_stationary_rotation_angle: 400.0,
            raycast_length: -1.0,
            ..FootPlacementConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.feet_position_offset_weight, 1.0);
        assert_eq!(cfg.body_rotation_offset_weight, 0.0);
        assert_eq!(cfg.feet_rotation_offset_smoothing, MAX_SMOOTHING);
        assert_eq!(cfg.max_stationary_rotation_angle, 360.0);
        assert_eq!(cfg.raycast_length, 0.0);
    }

    #[test]
    fn rotation_adjustment_gate() {
        let cfg = FootPlacementConfig::default();
        assert!(cfg.rotation_adjustment_enabled(2));
        assert!(!cfg.rotation_adjustment_enabled(0));

        for angle in [0.0, 360.0] {
            let c = FootPlacementConfig {
                max_stationary_rotation_angle: angle,
                ..FootPlacementConfig::default()
            };
            assert!(!c.rotation_adjustment_enabled(2));
        }

        let c = FootPlacementConfig {
            stationary_to_rotate_smoothing: 0.0,
            ..FootPlacementConfig::default()
        };
        assert!(!c.rotation_adjustment_enabled(2));
    }
}
