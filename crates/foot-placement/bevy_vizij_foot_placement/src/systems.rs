use bevy::prelude::*;

use crate::components::{
    FootPlacementDebug, FootPlacementDisabled, FootPlacementRig, FootPlacementState, Locomotion,
};
use crate::resources::{FootPlacementDt, GroundProbe};
use vizij_foot_placement_core::{
    CharacterState, DebugColor, FootPlacement, FrameInputs, HipPose, LegPose, RootPose,
};

type Poses<'w, 's> = Query<'w, 's, (&'static mut Transform, &'static mut GlobalTransform)>;

/// World position and rotation of `entity`, if it has a transform.
fn world_pose(poses: &Poses, entity: Entity) -> Option<(Vec3, Quat)> {
    poses.get(entity).ok().map(|(_, global)| {
        let (_, rotation, translation) = global.to_scale_rotation_translation();
        (translation, rotation)
    })
}

/// Overwrite the world pose of `entity` and keep its local transform in step
/// with its parent, so later readers this frame see the corrected pose.
fn write_world_pose(
    poses: &mut Poses,
    parents: &Query<&Parent>,
    entity: Entity,
    position: Vec3,
    rotation: Quat,
) {
    let parent_global = parents
        .get(entity)
        .ok()
        .and_then(|parent| poses.get(parent.get()).ok().map(|(_, global)| *global));
    let Ok((mut local, mut global)) = poses.get_mut(entity) else {
        return;
    };
    let world = Transform {
        translation: position,
        rotation,
        scale: global.compute_transform().scale,
    };
    *global = GlobalTransform::from(world);
    *local = match parent_global {
        Some(parent) => global.reparented_to(&parent),
        None => world,
    };
}

/// Builds (or rebuilds) controllers for new and changed rigs. Bindings to
/// despawned entities count as missing.
pub fn setup_rigs(
    mut commands: Commands,
    rigs: Query<(Entity, &FootPlacementRig), Changed<FootPlacementRig>>,
    entities: Query<Entity>,
) {
    for (entity, rig) in &rigs {
        let binding = rig
            .binding
            .clone()
            .retain_handles(|handle| entities.contains(*handle));
        match FootPlacement::setup(rig.config.clone(), binding) {
            Ok((controller, bound)) => {
                debug!("foot placement enabled on {entity:?}");
                commands
                    .entity(entity)
                    .insert((FootPlacementState { controller, rig: bound }, FootPlacementDebug::default()))
                    .remove::<FootPlacementDisabled>();
            }
            Err(_) => {
                // the core already reported the failure
                commands
                    .entity(entity)
                    .insert(FootPlacementDisabled)
                    .remove::<FootPlacementState>();
            }
        }
    }
}

/// Samples the animated pose after transform propagation, runs one frame of
/// the controller and writes hips, targets and hints back.
#[allow(clippy::type_complexity)]
pub fn step_rigs(
    mut commands: Commands,
    time: Res<Time>,
    fixed_dt: Res<FootPlacementDt>,
    ground: Res<GroundProbe>,
    mut rigs: Query<
        (
            Entity,
            &mut FootPlacementState,
            Option<&mut Locomotion>,
            Option<&mut FootPlacementDebug>,
        ),
        Without<FootPlacementDisabled>,
    >,
    mut poses: Poses,
    parents: Query<&Parent>,
) {
    let dt = fixed_dt.0.unwrap_or_else(|| time.delta_seconds());

    for (entity, mut state, locomotion, debug) in &mut rigs {
        let Some((root_position, root_rotation)) = world_pose(&poses, entity) else {
            continue;
        };
        let hips_entity = state.rig.hips;
        let Some((hips_position, hips_rotation)) = world_pose(&poses, hips_entity) else {
            warn!("foot placement on {entity:?} lost its hips; disabling");
            commands.entity(entity).insert(FootPlacementDisabled);
            continue;
        };
        let parent_rotation = parents
            .get(hips_entity)
            .ok()
            .and_then(|parent| world_pose(&poses, parent.get()))
            .map_or(Quat::IDENTITY, |(_, rotation)| rotation);

        let legs: Option<Vec<LegPose>> = state
            .rig
            .legs
            .iter()
            .map(|leg| {
                let (target_position, target_rotation) = world_pose(&poses, leg.target)?;
                let (hint_position, _) = world_pose(&poses, leg.hint)?;
                Some(LegPose {
                    target_position,
                    target_rotation,
                    hint_position,
                })
            })
            .collect();
        let Some(legs) = legs else {
            warn!("foot placement on {entity:?} lost a leg handle; disabling");
            commands.entity(entity).insert(FootPlacementDisabled);
            continue;
        };

        let inputs = FrameInputs {
            dt,
            root: RootPose {
                position: root_position,
                rotation: root_rotation,
            },
            legs,
            hips: HipPose {
                position: hips_position,
                rotation: hips_rotation,
                parent_rotation,
            },
        };

        let mut fallback = CharacterState::default();
        let flags = match locomotion {
            Some(locomotion) => &mut locomotion.into_inner().0,
            None => &mut fallback,
        };
        let out = state.controller.step(flags, &inputs, &*ground);

        // Hips first: targets and hints may be parented under them.
        write_world_pose(&mut poses, &parents, hips_entity, out.hips.position, out.hips.rotation);
        for (leg, pose) in state.rig.legs.iter().zip(&out.legs) {
            write_world_pose(&mut poses, &parents, leg.target, pose.target_position, pose.target_rotation);
            let hint_rotation = world_pose(&poses, leg.hint).map_or(Quat::IDENTITY, |(_, r)| r);
            write_world_pose(&mut poses, &parents, leg.hint, pose.hint_position, hint_rotation);
        }

        if let Some(mut debug) = debug {
            debug.lines = out.debug;
        }
    }
}

fn gizmo_color(color: DebugColor) -> Color {
    match color {
        DebugColor::Red => Color::srgb(1.0, 0.0, 0.0),
        DebugColor::Blue => Color::srgb(0.0, 0.0, 1.0),
        DebugColor::White => Color::WHITE,
        DebugColor::Yellow => Color::srgb(1.0, 1.0, 0.0),
    }
}

/// Renders the last frame's probe rays and deadband cone.
pub fn draw_debug_rays(mut gizmos: Gizmos, rigs: Query<&FootPlacementDebug, Without<FootPlacementDisabled>>) {
    for debug in &rigs {
        for line in &debug.lines {
            gizmos.line(line.start, line.end, gizmo_color(line.color));
        }
    }
}
