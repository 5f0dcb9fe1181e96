use bevy::prelude::*;
use vizij_foot_placement_core::{BoundRig, CharacterState, DebugLine, FootPlacement, FootPlacementConfig, RigBinding};

/// Authored rig on a character root: tuning plus the hip, target and hint
/// entities. The root's own transform supplies position and facing.
///
/// Changing this component rebuilds the controller.
#[derive(Component, Debug, Clone)]
pub struct FootPlacementRig {
    pub config: FootPlacementConfig,
    pub binding: RigBinding<Entity>,
}

impl FootPlacementRig {
    pub fn new(config: FootPlacementConfig, binding: RigBinding<Entity>) -> Self {
        Self { config, binding }
    }
}

/// Character flags written by the app's movement code. Rigs without it are
/// treated as grounded, moving and active.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Locomotion(pub CharacterState);

/// Marker: the rig failed validation or was switched off by the app.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FootPlacementDisabled;

/// Debug lines produced by the last step (empty unless `draw_debug_ray`).
#[derive(Component, Debug, Clone, Default)]
pub struct FootPlacementDebug {
    pub lines: Vec<DebugLine>,
}

/// Live controller and validated bindings, inserted by the setup system.
#[derive(Component, Debug)]
pub struct FootPlacementState {
    pub controller: FootPlacement,
    pub rig: BoundRig<Entity>,
}
