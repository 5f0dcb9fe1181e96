use approx::assert_abs_diff_eq;
use bevy::prelude::*;
use bevy_vizij_foot_placement::vizij_foot_placement_core::{
    CharacterState, FootPlacementConfig, PlaneGround, RigBinding,
};
use bevy_vizij_foot_placement::{
    FootPlacementDebug, FootPlacementDt, FootPlacementRig, FootPlacementState, GroundProbe,
    Locomotion, VizijFootPlacementPlugin,
};

/// Local pose the "animation" writes every frame.
#[derive(Component, Clone, Copy)]
struct RestPose(Transform);

fn animate(mut bones: Query<(&RestPose, &mut Transform)>) {
    for (rest, mut tf) in &mut bones {
        *tf = rest.0;
    }
}

struct Rig {
    root: Entity,
    hips: Entity,
    targets: [Entity; 2],
    hints: [Entity; 2],
}

fn spawn_bone(world: &mut World, parent: Entity, local: Transform) -> Entity {
    let bone = world
        .spawn((TransformBundle::from_transform(local), RestPose(local)))
        .id();
    world.entity_mut(parent).add_child(bone);
    bone
}

fn setup(config: FootPlacementConfig, state: CharacterState, ground_height: f32) -> (App, Rig) {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins((TransformPlugin, HierarchyPlugin))
        .insert_resource(GroundProbe::new(PlaneGround::flat(ground_height)))
        .insert_resource(FootPlacementDt(Some(1.0 / 60.0)))
        .add_plugins(VizijFootPlacementPlugin)
        .add_systems(Update, animate);

    let world = app.world_mut();
    let root = world.spawn(TransformBundle::default()).id();
    let hips = spawn_bone(world, root, Transform::from_xyz(0.0, 1.0, 0.0));
    let targets = [
        spawn_bone(world, root, Transform::from_xyz(-0.2, 0.0, 0.0)),
        spawn_bone(world, root, Transform::from_xyz(0.2, 0.0, 0.0)),
    ];
    let hints = [
        spawn_bone(world, hips, Transform::from_xyz(-0.2, -0.5, 0.3)),
        spawn_bone(world, hips, Transform::from_xyz(0.2, -0.5, 0.3)),
    ];

    let binding = RigBinding::new(hips)
        .with_leg(targets[0], hints[0])
        .with_leg(targets[1], hints[1]);
    world.entity_mut(root).insert((
        FootPlacementRig::new(config, binding),
        Locomotion(state),
    ));

    (
        app,
        Rig {
            root,
            hips,
            targets,
            hints,
        },
    )
}

fn snappy() -> FootPlacementConfig {
    vizij_test_fixtures::configs::load("snappy").unwrap()
}

fn world_y(app: &App, entity: Entity) -> f32 {
    app.world().get::<GlobalTransform>(entity).unwrap().translation().y
}

#[test]
fn rig_settles_on_lower_ground() {
    let (mut app, rig) = setup(snappy(), CharacterState::standing(), -0.2);

    app.update();
    assert!(app.world().get::<FootPlacementState>(rig.root).is_some());

    for _ in 0..3 {
        app.update();
        assert_abs_diff_eq!(world_y(&app, rig.hips), 0.8, epsilon = 1e-4);
        for target in rig.targets {
            assert_abs_diff_eq!(world_y(&app, target), -0.2, epsilon = 1e-4);
        }
        // hints keep their animated height even though the hips dropped
        for hint in rig.hints {
            assert_abs_diff_eq!(world_y(&app, hint), 0.5, epsilon = 1e-4);
        }
    }

    // local transforms agree with the written world poses
    let hint_local = app.world().get::<Transform>(rig.hints[0]).unwrap();
    assert_abs_diff_eq!(hint_local.translation.y, -0.3, epsilon = 1e-4);
}

#[test]
fn landing_is_written_back_to_locomotion() {
    let (mut app, rig) = setup(snappy(), CharacterState::jumping(), -0.2);
    app.update();
    assert!(app.world().get::<Locomotion>(rig.root).unwrap().0.jumped);
    // airborne: nothing to stand on yet
    assert_abs_diff_eq!(world_y(&app, rig.hips), 1.0, epsilon = 1e-4);

    app.world_mut()
        .get_mut::<Locomotion>(rig.root)
        .unwrap()
        .0
        .is_grounded = true;
    app.update();
    assert!(!app.world().get::<Locomotion>(rig.root).unwrap().0.jumped);
}

#[test]
fn debug_lines_are_published_per_rig() {
    let (mut app, rig) = setup(FootPlacementConfig::default(), CharacterState::standing(), -0.2);
    app.update();
    app.update();
    let debug = app.world().get::<FootPlacementDebug>(rig.root).unwrap();
    assert!(!debug.lines.is_empty());
}

#[test]
fn editing_the_rig_rebuilds_the_controller() {
    let (mut app, rig) = setup(snappy(), CharacterState::standing(), -0.2);
    app.update();
    app.update();
    assert!(!app
        .world()
        .get::<FootPlacementState>(rig.root)
        .unwrap()
        .controller
        .is_startup());

    app.world_mut()
        .get_mut::<FootPlacementRig>(rig.root)
        .unwrap()
        .config
        .body_position_offset_weight = 0.0;
    app.update();

    // hips keep the animated height with the body weight off
    assert_abs_diff_eq!(world_y(&app, rig.hips), 1.0, epsilon = 1e-4);
    let state = app.world().get::<FootPlacementState>(rig.root).unwrap();
    assert_eq!(state.controller.config().body_position_offset_weight, 0.0);
}
