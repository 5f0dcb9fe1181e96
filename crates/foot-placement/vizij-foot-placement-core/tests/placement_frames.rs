use vizij_foot_placement_core::{
    CharacterState, DebugColor, FootPlacement, FootPlacementConfig, FrameInputs, HipPose, LegPose,
    NoGround, PlaneGround, Quat, RayHit, RigBinding, RootPose, SetupError, Vec3,
};

const DT: f32 = 1.0 / 60.0;

fn snappy() -> FootPlacementConfig {
    FootPlacementConfig {
        feet_position_offset_smoothing: 0.0,
        feet_rotation_offset_smoothing: 0.0,
        body_position_offset_smoothing: 0.0,
        body_rotation_offset_smoothing: 0.0,
        draw_debug_ray: false,
        ..FootPlacementConfig::default()
    }
}

/// Two legs at hip width, feet animated at root height, hips one unit up.
fn biped_inputs() -> FrameInputs {
    FrameInputs {
        dt: DT,
        root: RootPose::default(),
        legs: vec![
            LegPose::new(Vec3::new(-0.2, 0.0, 0.0), Vec3::new(-0.2, 0.5, 0.3)),
            LegPose::new(Vec3::new(0.2, 0.0, 0.0), Vec3::new(0.2, 0.5, 0.3)),
        ],
        hips: HipPose::at(Vec3::new(0.0, 1.0, 0.0)),
    }
}

#[test]
fn flat_ground_aligns_within_one_frame() {
    let mut fp = FootPlacement::new(snappy(), 2).unwrap();
    let mut state = CharacterState::standing();
    let ground = PlaneGround::flat(-0.2);

    let out = fp.step(&mut state, &biped_inputs(), &ground);

    for leg in &out.legs {
        assert!((leg.target_position.y + 0.2).abs() < 1e-5, "foot y = {}", leg.target_position.y);
        assert!(leg.target_rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }
    assert!((out.hips.position.y - 0.8).abs() < 1e-5, "hips y = {}", out.hips.position.y);
    // XZ and hints come straight from the animation on the first frame
    assert!((out.legs[0].target_position.x + 0.2).abs() < 1e-6);
    assert_eq!(out.legs[1].hint_position, Vec3::new(0.2, 0.5, 0.3));
    assert!(!fp.is_startup());
}

#[test]
fn repeated_frames_are_stable() {
    let mut fp = FootPlacement::new(snappy(), 2).unwrap();
    let mut state = CharacterState::standing();
    let ground = PlaneGround::flat(-0.2);
    let inputs = biped_inputs();

    let mut last = fp.step(&mut state, &inputs, &ground);
    for _ in 0..10 {
        let out = fp.step(&mut state, &inputs, &ground);
        for (a, b) in out.legs.iter().zip(&last.legs) {
            assert!((a.target_position - b.target_position).length() < 1e-6);
            assert!((a.hint_position - b.hint_position).length() < 1e-6);
        }
        assert!((out.hips.position - last.hips.position).length() < 1e-6);
        last = out;
    }
}

#[test]
fn zero_foot_weight_keeps_the_animated_height() {
    let cfg = FootPlacementConfig {
        feet_position_offset_weight: 0.0,
        ..snappy()
    };
    let mut fp = FootPlacement::new(cfg, 2).unwrap();
    let mut state = CharacterState::standing();
    let inputs = biped_inputs();
    let ground = PlaneGround::flat(-0.2);

    for _ in 0..10 {
        let out = fp.step(&mut state, &inputs, &ground);
        for (leg, pose) in out.legs.iter().zip(&inputs.legs) {
            assert!((leg.target_position - pose.target_position).length() < 1e-6);
        }
        assert_eq!(fp.leg_position_offset(0), Some(0.0));
        assert_eq!(fp.leg_position_offset(1), Some(0.0));
    }
}

#[test]
fn hips_follow_the_lowest_foot() {
    let mut fp = FootPlacement::new(snappy(), 2).unwrap();
    let mut state = CharacterState::standing();
    // left half of the world is lower than the right half
    let step_terrain = |origin: Vec3, dir: Vec3, max: f32| {
        let height = if origin.x < 0.0 { -0.3 } else { -0.1 };
        let t = origin.y - height;
        (0.0..=max).contains(&t).then(|| RayHit {
            point: origin + dir * t,
            normal: Vec3::Y,
        })
    };

    let out = fp.step(&mut state, &biped_inputs(), &step_terrain);

    assert!((out.legs[0].target_position.y + 0.3).abs() < 1e-5);
    assert!((out.legs[1].target_position.y + 0.1).abs() < 1e-5);
    assert!((out.hips.position.y - 0.7).abs() < 1e-5);
    assert!((fp.body_position_offset() - 0.3).abs() < 1e-5);
}

#[test]
fn raised_ground_lowers_nothing() {
    // The lowest hit is seeded with the root height, so the hips never rise.
    let mut fp = FootPlacement::new(snappy(), 2).unwrap();
    let mut state = CharacterState::standing();
    let out = fp.step(&mut state, &biped_inputs(), &PlaneGround::flat(0.15));

    assert!((out.legs[0].target_position.y - 0.15).abs() < 1e-5);
    assert!((out.hips.position.y - 1.0).abs() < 1e-6);
}

#[test]
fn offsets_decay_when_the_ground_disappears() {
    let cfg = FootPlacementConfig {
        draw_debug_ray: false,
        ..FootPlacementConfig::default()
    };
    let mut fp = FootPlacement::new(cfg, 2).unwrap();
    let mut state = CharacterState::standing();
    let inputs = biped_inputs();
    let ground = PlaneGround::flat(-0.2);

    for _ in 0..30 {
        fp.step(&mut state, &inputs, &ground);
    }
    let settled = fp.leg_position_offset(0).unwrap();
    assert!((settled + 0.2).abs() < 1e-3, "settled offset {settled}");

    let mut previous = settled.abs();
    for _ in 0..60 {
        fp.step(&mut state, &inputs, &NoGround);
        let now = fp.leg_position_offset(0).unwrap().abs();
        assert!(now <= previous + 1e-7);
        previous = now;
    }
    assert!(previous < 1e-4, "offset should have decayed, got {previous}");
    assert!(fp.samples().all(|s| !s.has_hit));
}

#[test]
fn landing_clears_the_jump_flag() {
    let mut fp = FootPlacement::new(snappy(), 2).unwrap();
    let mut state = CharacterState::jumping();
    let ground = PlaneGround::flat(-0.2);

    let out = fp.step(&mut state, &biped_inputs(), &ground);
    assert!(state.jumped);
    // nothing is probed in the air
    assert!(fp.samples().all(|s| !s.has_hit));
    assert!((out.hips.position.y - 1.0).abs() < 1e-6);

    state.is_grounded = true;
    fp.step(&mut state, &biped_inputs(), &ground);
    assert!(!state.jumped);
    assert!(fp.samples().any(|s| s.has_hit));
}

#[test]
fn inactive_character_fades_out_and_restarts() {
    let cfg = FootPlacementConfig {
        draw_debug_ray: false,
        ..FootPlacementConfig::default()
    };
    let mut fp = FootPlacement::new(cfg, 2).unwrap();
    let mut state = CharacterState::standing();
    let inputs = biped_inputs();
    let ground = PlaneGround::flat(-0.2);

    for _ in 0..20 {
        fp.step(&mut state, &inputs, &ground);
    }
    assert!(fp.body_position_offset() > 0.19);

    state.is_active = false;
    let mut previous = fp.body_position_offset();
    for _ in 0..60 {
        let out = fp.step(&mut state, &inputs, &ground);
        // legs pass the animation through untouched
        assert_eq!(out.legs[0].target_position, inputs.legs[0].target_position);
        let now = fp.body_position_offset();
        assert!(now <= previous);
        previous = now;
    }
    assert!(previous < 1e-4);
    assert!(fp.is_startup());

    state.is_active = true;
    fp.step(&mut state, &inputs, &ground);
    assert!(!fp.is_startup());
}

#[test]
fn leg_count_is_fixed_by_setup() {
    let mut fp = FootPlacement::new(snappy(), 3).unwrap();
    let mut state = CharacterState::standing();
    // one leg short: the missing one is echoed, never dropped
    let out = fp.step(&mut state, &biped_inputs(), &PlaneGround::flat(0.0));
    assert_eq!(out.legs.len(), 3);
    assert_eq!(fp.leg_count(), 3);
    assert_eq!(fp.samples().count(), 4);
}

#[test]
fn setup_validates_the_rig() {
    let err = FootPlacement::new(FootPlacementConfig::default(), 0).unwrap_err();
    assert_eq!(err, SetupError::NoLegs);

    let rig = RigBinding::new("Hips")
        .with_leg("LeftFoot_IK", "LeftKnee_Hint")
        .with_leg("RightFoot_IK", "RightKnee_Hint");
    let (fp, bound) = FootPlacement::setup(FootPlacementConfig::biped(), rig).unwrap();
    assert_eq!(fp.leg_count(), 2);
    assert_eq!(bound.hips, "Hips");

    let err = FootPlacement::setup(FootPlacementConfig::biped(), RigBinding::new("Hips")).unwrap_err();
    assert_eq!(err, SetupError::NoLegs);
}

#[test]
fn reset_reopens_the_blend_window() {
    let mut fp = FootPlacement::new(snappy(), 2).unwrap();
    let mut state = CharacterState::walking();
    for _ in 0..5 {
        fp.step(&mut state, &biped_inputs(), &PlaneGround::flat(-0.2));
    }
    assert!(fp.lerp_speed() < 1.0);

    fp.reset();
    assert_eq!(fp.lerp_speed(), 1.0);
    assert!(fp.is_startup());
    assert_eq!(fp.body_position_offset(), 0.0);
}

#[test]
fn debug_lines_cover_probes_and_deadband() {
    let mut fp = FootPlacement::new(FootPlacementConfig::default(), 2).unwrap();
    let mut state = CharacterState::standing();
    let out = fp.step(&mut state, &biped_inputs(), &PlaneGround::flat(-0.2));

    // body + two legs, each hit plus remainder, then forward and two cone edges
    assert_eq!(out.debug.len(), 9);
    assert_eq!(out.debug[0].color, DebugColor::Blue);
    assert_eq!(out.debug.iter().filter(|l| l.color == DebugColor::Yellow).count(), 1);
    assert_eq!(out.debug.iter().filter(|l| l.color == DebugColor::White).count(), 3);

    let quiet = FootPlacementConfig {
        draw_debug_ray: false,
        ..FootPlacementConfig::default()
    };
    let mut fp = FootPlacement::new(quiet, 2).unwrap();
    let out = fp.step(&mut state, &biped_inputs(), &PlaneGround::flat(-0.2));
    assert!(out.debug.is_empty());
}
