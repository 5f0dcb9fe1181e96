//! FootPlacement: per-frame orchestration.
//!
//! Order within `step`:
//! landing check -> parameter gate -> yaw observation (sweep) -> ground
//! sampling -> blend speed -> legs (in sweep order) -> sweep advance ->
//! hip rotation -> hip position.

use glam::{EulerRot, Quat, Vec3};

use crate::blend::BlendSpeed;
use crate::config::FootPlacementConfig;
use crate::debug::{self, DebugLine};
use crate::engine::{FrameContext, OffsetEngine};
use crate::error::{SetupError, SetupResult};
use crate::ground::{GroundQuery, GroundSample, GroundSampler};
use crate::inputs::FrameInputs;
use crate::outputs::{FrameOutputs, HipOutput, LegOutput};
use crate::rig::{BoundRig, RigBinding};
use crate::state::CharacterState;
use crate::sweep::AdjustmentSweep;

/// Yaw of `rotation` about world up, in degrees.
pub fn yaw_degrees(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    yaw.to_degrees()
}

/// Foot placement state for one character.
///
/// Owns every smoother and flag; independent characters share nothing and
/// can be stepped in parallel.
#[derive(Clone, Debug)]
pub struct FootPlacement {
    config: FootPlacementConfig,
    sampler: GroundSampler,
    sweep: AdjustmentSweep,
    blend: BlendSpeed,
    engine: OffsetEngine,
    startup: bool,
    // Per-frame scratch, sized once in `new`.
    frame_samples: Vec<GroundSample>,
    probe_points: Vec<Vec3>,
}

impl FootPlacement {
    /// Allocate channels for `leg_count` legs. The count is fixed for the
    /// lifetime of the value.
    pub fn new(config: FootPlacementConfig, leg_count: usize) -> SetupResult<Self> {
        if leg_count == 0 {
            return Err(SetupError::NoLegs);
        }
        let config = config.sanitized();
        Ok(Self {
            sampler: GroundSampler::from_config(&config),
            config,
            sweep: AdjustmentSweep::new(leg_count),
            blend: BlendSpeed::default(),
            engine: OffsetEngine::new(leg_count),
            startup: true,
            frame_samples: vec![GroundSample::MISS; leg_count],
            probe_points: vec![Vec3::ZERO; leg_count],
        })
    }

    /// Validate a rig and build its controller. Failure is logged once and
    /// nothing is allocated.
    pub fn setup<H>(config: FootPlacementConfig, rig: RigBinding<H>) -> SetupResult<(Self, BoundRig<H>)> {
        let built = rig
            .bind()
            .and_then(|bound| Self::new(config, bound.leg_count()).map(|fp| (fp, bound)));
        match built {
            Ok((fp, bound)) => {
                log::debug!("foot placement ready with {} legs", bound.leg_count());
                Ok((fp, bound))
            }
            Err(err) => {
                log::error!("foot placement disabled: {err}");
                Err(err)
            }
        }
    }

    pub fn config(&self) -> &FootPlacementConfig {
        &self.config
    }

    pub fn leg_count(&self) -> usize {
        self.engine.leg_count()
    }

    pub fn lerp_speed(&self) -> f32 {
        self.blend.lerp_speed()
    }

    pub fn sweep(&self) -> &AdjustmentSweep {
        &self.sweep
    }

    pub fn is_startup(&self) -> bool {
        self.startup
    }

    pub fn body_position_offset(&self) -> f32 {
        self.engine.body().position_offset
    }

    pub fn leg_position_offset(&self, leg: usize) -> Option<f32> {
        self.engine.legs().get(leg).map(|ch| ch.position_offset)
    }

    /// This frame's samples: body first, then one per leg.
    pub fn samples(&self) -> impl Iterator<Item = &GroundSample> {
        std::iter::once(&self.engine.body().sample).chain(self.engine.legs().iter().map(|ch| &ch.sample))
    }

    /// Zero samples and body offsets, reopen the blend window and snap to the
    /// animation again on the next frame.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.blend.reset();
        self.startup = true;
        log::debug!("foot placement reset");
    }

    /// Run one frame.
    ///
    /// `state.jumped` is cleared on the landing frame. Legs beyond
    /// `inputs.legs.len()` keep their previous pose; the channel array never
    /// changes size.
    pub fn step(
        &mut self,
        state: &mut CharacterState,
        inputs: &FrameInputs,
        ground: &dyn GroundQuery,
    ) -> FrameOutputs {
        if state.land() {
            log::trace!("landed; jump flag cleared");
        }

        let leg_count = self.leg_count();
        let cfg = &self.config;
        let mut debug_lines: Option<Vec<DebugLine>> = cfg.draw_debug_ray.then(Vec::new);

        // Without rotation adjustment the feet follow the animation outright.
        let mut is_moving = state.is_moving || !cfg.rotation_adjustment_enabled(leg_count);

        let yaw = yaw_degrees(inputs.root.rotation);
        self.sweep
            .observe(cfg, yaw, is_moving, state.is_grounded, self.blend.lerp_speed());

        if state.is_active {
            self.sample_ground(state, inputs, ground, debug_lines.as_mut());
        } else {
            self.engine.set_body_sample(GroundSample::MISS);
            for leg in 0..leg_count {
                self.engine.set_leg_sample(leg, GroundSample::MISS);
            }
        }

        if self.startup {
            is_moving = true;
        }
        let cfg = &self.config;
        self.blend.update(
            cfg,
            is_moving,
            state.is_grounded,
            state.jumped,
            &mut self.sweep,
            inputs.dt,
        );

        self.engine.begin_frame(inputs.root.position);
        let ctx = FrameContext {
            dt: inputs.dt,
            is_moving,
            is_grounded: state.is_grounded,
            is_active: state.is_active,
            startup: self.startup,
            lerp_speed: self.blend.lerp_speed(),
        };

        let mut legs: Vec<LegOutput> = (0..leg_count)
            .map(|leg| match inputs.legs.get(leg) {
                Some(pose) => LegOutput::from(pose),
                None => self.engine.leg_output(leg).unwrap_or(LegOutput {
                    target_position: Vec3::ZERO,
                    target_rotation: Quat::IDENTITY,
                    hint_position: Vec3::ZERO,
                }),
            })
            .collect();
        let mut hips = HipOutput::from(&inputs.hips);

        if state.is_active {
            for leg in self.sweep.processing_order() {
                if let Some(pose) = inputs.legs.get(leg) {
                    legs[leg] = self.engine.process_leg(cfg, &ctx, leg, pose, &mut self.sweep);
                }
            }
            self.sweep.advance(is_moving);

            if cfg.body_rotation_offset_weight > 0.0 {
                hips.rotation = self.engine.hip_rotation(cfg, &ctx, &inputs.hips);
            }
            self.startup = false;
        } else {
            if !self.startup {
                log::debug!("foot placement inactive; offsets fading out");
            }
            self.startup = true;
        }

        if cfg.body_position_offset_weight > 0.0 {
            hips.position = self.engine.hip_position(cfg, &ctx, inputs.hips.position);
        }

        if let Some(lines) = debug_lines.as_mut() {
            if cfg.rotation_adjustment_enabled(leg_count) {
                debug::push_deadband(
                    lines,
                    inputs.root.position,
                    inputs.root.rotation,
                    self.sweep.last_yaw(),
                    cfg.max_stationary_rotation_angle,
                );
            }
        }

        FrameOutputs {
            legs,
            hips,
            debug: debug_lines.unwrap_or_default(),
        }
    }

    /// Probe under the hips and under each foot where it was last placed
    /// (its animated position on a startup frame).
    fn sample_ground(
        &mut self,
        state: &CharacterState,
        inputs: &FrameInputs,
        ground: &dyn GroundQuery,
        debug_lines: Option<&mut Vec<DebugLine>>,
    ) {
        let startup = self.startup;
        for ((at, ch), leg) in self.probe_points.iter_mut().zip(self.engine.legs()).zip(0..) {
            *at = match inputs.legs.get(leg) {
                Some(pose) if startup => pose.target_position,
                _ => ch.target_position,
            };
        }

        let mut body = GroundSample::MISS;
        self.sampler.sample_frame(
            &self.config,
            state,
            inputs.root.position.y,
            inputs.hips.position,
            &self.probe_points,
            ground,
            &mut body,
            &mut self.frame_samples,
            debug_lines,
        );
        self.engine.set_body_sample(body);
        for (leg, sample) in self.frame_samples.iter().enumerate() {
            self.engine.set_leg_sample(leg, *sample);
        }
    }
}
