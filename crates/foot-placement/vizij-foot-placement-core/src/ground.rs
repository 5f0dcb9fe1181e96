//! Ground sampling: one vertical probe per leg plus one under the body.
//!
//! The scene query is a collaborator behind `GroundQuery`; a miss is the
//! normal "no ground here" signal and never an error.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::FootPlacementConfig;
use crate::debug::{self, DebugColor, DebugLine};
use crate::state::CharacterState;

/// Nearest intersection reported by a scene query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Synchronous ray query against the host scene.
pub trait GroundQuery {
    /// Nearest hit along `direction` (unit length) within `max_distance`.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

impl<F> GroundQuery for F
where
    F: Fn(Vec3, Vec3, f32) -> Option<RayHit>,
{
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self(origin, direction, max_distance)
    }
}

/// A scene with nothing to stand on.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGround;

impl GroundQuery for NoGround {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<RayHit> {
        None
    }
}

/// Infinite plane through `point` with unit `normal`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneGround {
    pub point: Vec3,
    pub normal: Vec3,
}

impl PlaneGround {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Horizontal floor at `height`.
    pub fn flat(height: f32) -> Self {
        Self::new(Vec3::new(0.0, height, 0.0), Vec3::Y)
    }
}

impl GroundQuery for PlaneGround {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let denom = self.normal.dot(direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.point - origin).dot(self.normal) / denom;
        if !(0.0..=max_distance).contains(&t) {
            return None;
        }
        // Report the face the ray hit.
        let normal = if denom > 0.0 { -self.normal } else { self.normal };
        Some(RayHit {
            point: origin + direction * t,
            normal,
        })
    }
}

/// One probe's result. `has_hit == false` means "no ground" and the other
/// fields are zero; a hit at the world origin stays distinguishable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundSample {
    pub origin: Vec3,
    pub point: Vec3,
    pub normal: Vec3,
    pub has_hit: bool,
}

impl GroundSample {
    pub const MISS: GroundSample = GroundSample {
        origin: Vec3::ZERO,
        point: Vec3::ZERO,
        normal: Vec3::ZERO,
        has_hit: false,
    };

    pub fn hit(origin: Vec3, hit: RayHit) -> Self {
        Self {
            origin,
            point: hit.point,
            normal: hit.normal,
            has_hit: true,
        }
    }
}

/// Casts probes from `raycast_height` above the root, straight down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSampler {
    pub height: f32,
    pub length: f32,
}

impl GroundSampler {
    pub fn from_config(cfg: &FootPlacementConfig) -> Self {
        Self {
            height: cfg.raycast_height,
            length: cfg.raycast_length,
        }
    }

    /// Probe origin above `at`, at a fixed height relative to the root.
    pub fn origin(&self, root_y: f32, at: Vec3) -> Vec3 {
        Vec3::new(at.x, root_y + self.height, at.z)
    }

    /// Cast one probe (or skip it when `enabled` is false).
    pub fn probe(&self, ground: &dyn GroundQuery, origin: Vec3, enabled: bool) -> GroundSample {
        if !enabled {
            return GroundSample::MISS;
        }
        ground
            .cast_ray(origin, Vec3::NEG_Y, self.length)
            .map_or(GroundSample::MISS, |hit| GroundSample::hit(origin, hit))
    }

    /// Sample the body and every leg for this frame.
    ///
    /// Nothing is cast while airborne or on the frame of a jump; every sample
    /// is then a miss. Body and leg probes are also skipped when no weight
    /// that would consume them is positive.
    #[allow(clippy::too_many_arguments)]
    pub fn sample_frame(
        &self,
        cfg: &FootPlacementConfig,
        state: &CharacterState,
        root_y: f32,
        body_at: Vec3,
        legs_at: &[Vec3],
        ground: &dyn GroundQuery,
        body: &mut GroundSample,
        legs: &mut [GroundSample],
        mut debug: Option<&mut Vec<DebugLine>>,
    ) {
        let casting = state.is_grounded && !state.jumped;

        *body = self.probe(ground, self.origin(root_y, body_at), casting && cfg.probes_body());
        if let Some(out) = debug.as_deref_mut() {
            debug::push_probe(out, body, self.length, DebugColor::Blue);
        }

        let leg_casting = casting && cfg.probes_legs();
        for (sample, at) in legs.iter_mut().zip(legs_at) {
            *sample = self.probe(ground, self.origin(root_y, *at), leg_casting);
            if let Some(out) = debug.as_deref_mut() {
                debug::push_probe(out, sample, self.length, DebugColor::Red);
            }
        }
    }
}
