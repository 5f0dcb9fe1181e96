//! OffsetEngine: smoothed per-leg and per-body offsets.
//!
//! Each leg keeps a smoothed copy of its animated target pose and hint
//! position (see `follow`), plus smoothed ground offsets. The hips track the
//! lowest foot hit of the frame and, optionally, the slope under the body.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::FootPlacementConfig;
use crate::follow::{follow, smooth, FollowRates, Phase};
use crate::ground::GroundSample;
use crate::inputs::{HipPose, LegPose};
use crate::outputs::LegOutput;
use crate::sweep::AdjustmentSweep;

/// A sweeping leg counts as replanted once this close to its animated pose.
pub const CONVERGENCE_DISTANCE: f32 = 0.025;
/// Ground offsets smaller than this are ignored.
pub const OFFSET_DEAD_ZONE: f32 = 0.001;

/// Smoothed state of one leg.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegChannel {
    /// Smoothed target position, without the ground offset.
    pub target_position: Vec3,
    pub target_rotation: Quat,
    pub hint_position: Vec3,
    /// Smoothed vertical ground offset added to the target.
    pub position_offset: f32,
    /// Smoothed ground-normal rotation composed onto the target.
    pub rotation_offset: Quat,
    pub sample: GroundSample,
}

impl Default for LegChannel {
    fn default() -> Self {
        Self {
            target_position: Vec3::ZERO,
            target_rotation: Quat::IDENTITY,
            hint_position: Vec3::ZERO,
            position_offset: 0.0,
            rotation_offset: Quat::IDENTITY,
            sample: GroundSample::MISS,
        }
    }
}

impl LegChannel {
    fn output(&self) -> LegOutput {
        LegOutput {
            target_position: self.target_position + Vec3::Y * self.position_offset,
            target_rotation: self.rotation_offset * self.target_rotation,
            hint_position: self.hint_position,
        }
    }
}

/// Smoothed state of the hips.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyChannel {
    pub root_position: Vec3,
    /// Smoothed distance the hips are lowered by (before weighting).
    pub position_offset: f32,
    pub rotation_offset: Quat,
    pub sample: GroundSample,
}

impl Default for BodyChannel {
    fn default() -> Self {
        Self {
            root_position: Vec3::ZERO,
            position_offset: 0.0,
            rotation_offset: Quat::IDENTITY,
            sample: GroundSample::MISS,
        }
    }
}

/// Everything the engine needs to know about the current frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    pub dt: f32,
    pub is_moving: bool,
    pub is_grounded: bool,
    pub is_active: bool,
    pub startup: bool,
    pub lerp_speed: f32,
}

impl FrameContext {
    fn phase(&self, adjusting: bool) -> Phase {
        if self.startup {
            Phase::Startup
        } else if self.is_moving || !self.is_grounded {
            Phase::Blending
        } else if adjusting {
            Phase::Sweeping
        } else {
            Phase::Idle
        }
    }

    fn rates(&self, cfg: &FootPlacementConfig) -> FollowRates {
        FollowRates {
            dt: self.dt,
            walk_smoothing: cfg.stationary_to_walk_smoothing,
            rotate_smoothing: cfg.stationary_to_rotate_smoothing,
            lerp_speed: self.lerp_speed,
        }
    }
}

/// Shortest rotation taking world up onto `normal`; identity for a zero normal.
pub fn up_to_normal(normal: Vec3) -> Quat {
    let n = normal.normalize_or_zero();
    if n == Vec3::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_rotation_arc(Vec3::Y, n)
    }
}

/// Replace the pitch of `rotation` with that of `tilted`, both given in world
/// space under a parent rotated by `parent`. Yaw and roll of `rotation` survive.
pub fn keep_pitch(rotation: Quat, tilted: Quat, parent: Quat) -> Quat {
    let to_local = parent.inverse();
    let (yaw, _, roll) = (to_local * rotation).to_euler(EulerRot::YXZ);
    let (_, pitch, _) = (to_local * tilted).to_euler(EulerRot::YXZ);
    parent * Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OffsetEngine {
    legs: Vec<LegChannel>,
    body: BodyChannel,
    /// Lowest valid leg hit this frame, seeded with the root height.
    lowest_hit: f32,
}

impl OffsetEngine {
    pub fn new(leg_count: usize) -> Self {
        Self {
            legs: vec![LegChannel::default(); leg_count],
            body: BodyChannel::default(),
            lowest_hit: 0.0,
        }
    }

    pub fn legs(&self) -> &[LegChannel] {
        &self.legs
    }

    pub fn body(&self) -> &BodyChannel {
        &self.body
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    pub fn set_leg_sample(&mut self, leg: usize, sample: GroundSample) {
        if let Some(ch) = self.legs.get_mut(leg) {
            ch.sample = sample;
        }
    }

    pub fn set_body_sample(&mut self, sample: GroundSample) {
        self.body.sample = sample;
    }

    /// Last pose written for `leg`, offsets included.
    pub fn leg_output(&self, leg: usize) -> Option<LegOutput> {
        self.legs.get(leg).map(LegChannel::output)
    }

    /// Start a frame: remember the root and reset the lowest-hit tracker.
    pub fn begin_frame(&mut self, root_position: Vec3) {
        self.body.root_position = root_position;
        self.lowest_hit = root_position.y;
    }

    /// Lowest valid leg hit recorded so far this frame.
    pub fn lowest_hit(&self) -> f32 {
        self.lowest_hit
    }

    /// Zero the body offsets and every sample. Smoothed poses are re-seeded
    /// by the next startup frame.
    pub fn reset(&mut self) {
        for ch in &mut self.legs {
            ch.sample = GroundSample::MISS;
        }
        self.body = BodyChannel::default();
    }

    /// Target position, target rotation and hint for one leg.
    pub fn process_leg(
        &mut self,
        cfg: &FootPlacementConfig,
        ctx: &FrameContext,
        leg: usize,
        animated: &LegPose,
        sweep: &mut AdjustmentSweep,
    ) -> LegOutput {
        self.leg_position(cfg, ctx, leg, animated.target_position, sweep);
        self.leg_rotation(cfg, ctx, leg, animated.target_rotation, sweep);
        self.hint_position(cfg, ctx, leg, animated.hint_position, sweep);
        self.legs[leg].output()
    }

    fn leg_position(
        &mut self,
        cfg: &FootPlacementConfig,
        ctx: &FrameContext,
        leg: usize,
        animated: Vec3,
        sweep: &mut AdjustmentSweep,
    ) {
        let phase = ctx.phase(sweep.is_adjusting(leg));
        let rates = ctx.rates(cfg);
        let ch = &mut self.legs[leg];

        // Height always comes straight from the animation.
        let mut current = ch.target_position;
        current.y = animated.y;
        let travelling = current.distance(animated) > CONVERGENCE_DISTANCE;
        if phase == Phase::Sweeping && travelling {
            sweep.mark_in_flight();
        }
        ch.target_position = follow(current, animated, phase, travelling, &rates);

        let weight = cfg.feet_position_offset_weight;
        if weight <= 0.0 {
            ch.position_offset = 0.0;
            if ch.sample.has_hit {
                self.lowest_hit = self.lowest_hit.min(ch.sample.point.y);
            }
            return;
        }

        let mut offset = 0.0;
        if ctx.is_grounded && ch.sample.has_hit {
            self.lowest_hit = self.lowest_hit.min(ch.sample.point.y);
            offset = ground_offset(&ch.sample, ch.target_position, self.body.root_position.y);
        }
        offset *= weight;
        ch.position_offset = smooth(
            ch.position_offset,
            offset,
            ctx.dt,
            cfg.feet_position_offset_smoothing,
        );
    }

    fn leg_rotation(
        &mut self,
        cfg: &FootPlacementConfig,
        ctx: &FrameContext,
        leg: usize,
        animated: Quat,
        sweep: &AdjustmentSweep,
    ) {
        let phase = ctx.phase(sweep.is_adjusting(leg));
        let rates = ctx.rates(cfg);
        let ch = &mut self.legs[leg];

        ch.target_rotation = follow(
            ch.target_rotation,
            animated,
            phase,
            !sweep.adjust_feet(),
            &rates,
        );

        let weight = cfg.feet_rotation_offset_weight;
        if weight <= 0.0 {
            ch.rotation_offset = Quat::IDENTITY;
            return;
        }
        let mut target = if ch.sample.has_hit {
            up_to_normal(ch.sample.normal)
        } else {
            Quat::IDENTITY
        };
        if weight != 1.0 {
            target = Quat::IDENTITY.slerp(target, weight);
        }
        ch.rotation_offset = if ctx.startup {
            target
        } else {
            smooth(
                ch.rotation_offset,
                target,
                ctx.dt,
                cfg.feet_rotation_offset_smoothing,
            )
        };
    }

    /// Hints carry no ground term; smoothing them keeps the knee bend plane
    /// steady while the target is held.
    fn hint_position(
        &mut self,
        cfg: &FootPlacementConfig,
        ctx: &FrameContext,
        leg: usize,
        animated: Vec3,
        sweep: &AdjustmentSweep,
    ) {
        let phase = ctx.phase(sweep.is_adjusting(leg));
        let rates = ctx.rates(cfg);
        let ch = &mut self.legs[leg];

        let mut hint = follow(
            ch.hint_position,
            animated,
            phase,
            !sweep.adjust_feet(),
            &rates,
        );
        hint.y = animated.y;
        ch.hint_position = hint;
    }

    /// Body position offset target for this frame, before smoothing.
    pub fn body_position_target(&self, cfg: &FootPlacementConfig, ctx: &FrameContext) -> f32 {
        if !ctx.is_grounded {
            return 0.0;
        }
        let drop = self.body.root_position.y - self.lowest_hit;
        if cfg.invert_body_position_offset {
            -drop
        } else {
            drop
        }
    }

    /// Lower (or raise) the hips toward the lowest foot. While inactive the
    /// offset fades back to zero over the same smoothing window.
    pub fn hip_position(&mut self, cfg: &FootPlacementConfig, ctx: &FrameContext, hips: Vec3) -> Vec3 {
        let tau = cfg.body_position_offset_smoothing;
        if ctx.is_active {
            let target = self.body_position_target(cfg, ctx);
            self.body.position_offset = smooth(self.body.position_offset, target, ctx.dt, tau);
        } else if tau > 0.0 && self.body.position_offset != 0.0 {
            self.body.position_offset = smooth(self.body.position_offset, 0.0, ctx.dt, tau);
        } else {
            self.body.position_offset = 0.0;
        }
        hips - Vec3::Y * (self.body.position_offset * cfg.body_position_offset_weight)
    }

    /// Tilt the hips with the ground under the body, keeping only pitch.
    pub fn hip_rotation(&mut self, cfg: &FootPlacementConfig, ctx: &FrameContext, hips: &HipPose) -> Quat {
        if ctx.startup {
            self.body.rotation_offset = Quat::IDENTITY;
        }

        let mut target = if self.body.sample.has_hit {
            up_to_normal(self.body.sample.normal)
        } else {
            Quat::IDENTITY
        };
        if cfg.invert_body_rotation_offset {
            target = target.inverse();
        }

        // Hip tilt shares the feet's rotation smoothing.
        self.body.rotation_offset = smooth(
            self.body.rotation_offset,
            target,
            ctx.dt,
            cfg.feet_rotation_offset_smoothing,
        );

        let mut tilted = self.body.rotation_offset * hips.rotation;
        let weight = cfg.body_rotation_offset_weight;
        if weight != 1.0 {
            tilted = hips.rotation.slerp(tilted, weight);
        }
        keep_pitch(hips.rotation, tilted, hips.parent_rotation)
    }
}

/// Vertical correction that puts the foot at its animated height above the
/// ground under it, measured relative to the root.
///
/// The probe is reprojected to the foot's XZ; the offset is the difference
/// between origin-to-foot (root relative) and origin-to-hit distances.
pub fn ground_offset(sample: &GroundSample, foot: Vec3, root_y: f32) -> f32 {
    let origin = Vec3::new(foot.x, sample.origin.y, foot.z);
    let hit = Vec3::new(foot.x, sample.point.y, foot.z);

    let to_foot = origin.distance(foot) + (foot.y - root_y);
    let to_hit = origin.distance(hit);
    if (to_hit - to_foot).abs() > OFFSET_DEAD_ZONE {
        to_foot - to_hit
    } else {
        0.0
    }
}
