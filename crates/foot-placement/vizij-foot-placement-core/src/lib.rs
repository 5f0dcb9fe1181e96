//! Vizij Foot Placement Core (engine-agnostic)
//!
//! Per-frame procedural correction of a legged character's IK targets, IK hints
//! and hips so that baked locomotion conforms to uneven ground. The crate owns
//! the numeric state (smoothers, sweep flags, blend speed) and exposes a single
//! `FootPlacement::step` call per frame; adapters (Bevy, tests) supply the
//! animated pose, the character flags and a ground ray query, and apply the
//! returned poses to their hosts.
//!
//! The two-bone IK solve itself, terrain intersection and locomotion state are
//! external collaborators.

pub mod blend;
pub mod config;
pub mod controller;
pub mod debug;
pub mod engine;
pub mod error;
pub mod follow;
pub mod ground;
pub mod inputs;
pub mod outputs;
pub mod rig;
pub mod state;
pub mod sweep;

// Re-exports for consumers (adapters)
pub use blend::BlendSpeed;
pub use config::FootPlacementConfig;
pub use controller::FootPlacement;
pub use debug::{DebugColor, DebugLine};
pub use engine::{BodyChannel, LegChannel, OffsetEngine};
pub use error::{SetupError, SetupResult};
pub use ground::{GroundQuery, GroundSample, GroundSampler, NoGround, PlaneGround, RayHit};
pub use inputs::{FrameInputs, HipPose, LegPose, RootPose};
pub use outputs::{FrameOutputs, HipOutput, LegOutput};
pub use rig::{BoundLeg, BoundRig, LegBinding, RigBinding};
pub use state::CharacterState;
pub use sweep::{AdjustmentSweep, SweepDirection};

pub use glam::{EulerRot, Quat, Vec3};
