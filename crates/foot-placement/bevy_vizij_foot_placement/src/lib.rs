//! Bevy adapter for the Vizij foot placement core.
//!
//! Runs in `PostUpdate` after transform propagation, so it sees the animated
//! pose of every bound entity. Corrected poses are written to both `Transform`
//! and `GlobalTransform`; an IK solver scheduled after `FootPlacementSet::Step`
//! reads the final targets and hints.

use bevy::gizmos::config::GizmoConfigStore;
use bevy::prelude::*;
use bevy::transform::TransformSystem;

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{
    FootPlacementDebug, FootPlacementDisabled, FootPlacementRig, FootPlacementState, Locomotion,
};
pub use resources::{FootPlacementDt, GroundProbe};
pub use vizij_foot_placement_core;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootPlacementSet {
    Setup,
    Step,
    Draw,
}

pub struct VizijFootPlacementPlugin;

impl Plugin for VizijFootPlacementPlugin {
    fn build(&self, app: &mut App) {
        // init_resource keeps a probe the app inserted beforehand
        app.init_resource::<GroundProbe>()
            .init_resource::<FootPlacementDt>()
            .configure_sets(
                PostUpdate,
                (
                    FootPlacementSet::Setup,
                    FootPlacementSet::Step,
                    FootPlacementSet::Draw,
                )
                    .chain()
                    .after(TransformSystem::TransformPropagate),
            )
            .add_systems(
                PostUpdate,
                (
                    systems::setup_rigs.in_set(FootPlacementSet::Setup),
                    systems::step_rigs.in_set(FootPlacementSet::Step),
                    systems::draw_debug_rays
                        .in_set(FootPlacementSet::Draw)
                        .run_if(resource_exists::<GizmoConfigStore>),
                ),
            );
    }
}
