//! Coupled wheel pair tests: springs, tilt and rotation about the center

use approx::assert_abs_diff_eq;

use hill_drive::simulation::{
    apply_spring, rotate_about_center, separation, spring_impulse, DriveInput, Segment, SimConfig,
    SimWorld, Viewport, Wheel, WheelId,
};

/// Flat ground at y=0 running far to the right
fn flat_track() -> Vec<Segment> {
    vec![Segment::new(-1000.0, 0.0, 100_000.0, 0.0)]
}

/// Ground so far below that the wheels never reach it during a test
fn distant_track() -> Vec<Segment> {
    vec![Segment::new(-1000.0, 5000.0, 1000.0, 5000.0)]
}

fn pair_world(config: SimConfig, track: Vec<Segment>, y: f64) -> (SimWorld, WheelId, WheelId) {
    let mut world = SimWorld::with_track(config, Viewport::default(), track).unwrap();
    let (root, partner) = world.spawn_vehicle(100.0, y, 100.0, 20.0).unwrap();
    (world, root, partner)
}

#[test]
fn test_rest_length_is_fixed_at_attach_time() {
    let (mut world, root, partner) = pair_world(SimConfig::default(), flat_track(), -20.0);
    assert_eq!(world.pairs().len(), 1);
    assert_eq!(world.pairs()[0].rest_length(), 100.0);
    assert!(world.wheel(root).unwrap().is_root());
    assert!(!world.wheel(partner).unwrap().is_root());

    for _ in 0..200 {
        world.tick(DriveInput::accelerate());
    }
    assert_eq!(world.pairs()[0].rest_length(), 100.0);
}

#[test]
fn test_stretched_spring_pulls_wheels_together() {
    let config = SimConfig::default();
    let first = Wheel::new(0.0, 0.0, 10.0).unwrap();
    let second = Wheel::new(130.0, 0.0, 10.0).unwrap();

    let (ix, iy) = spring_impulse(&first, &second, 100.0, &config).unwrap();
    // first.vx -= ix, so a negative impulse speeds the first wheel toward the second
    assert_abs_diff_eq!(ix, -30.0 * config.spring_constant, epsilon = 1e-12);
    assert_abs_diff_eq!(iy, 0.0, epsilon = 1e-12);
}

#[test]
fn test_spring_step_conserves_momentum() {
    let config = SimConfig::default();
    let mut first = Wheel::new(3.0, -7.0, 10.0).unwrap();
    let mut second = Wheel::new(40.0, 25.0, 12.0).unwrap();
    first.vx = 1.5;
    first.vy = -0.75;
    second.vx = -2.25;
    second.vy = 0.5;

    let before = (first.vx + second.vx, first.vy + second.vy);
    let (ix, iy) = apply_spring(&mut first, &mut second, 30.0, &config).unwrap();
    assert!(ix != 0.0 || iy != 0.0);

    let after = (first.vx + second.vx, first.vy + second.vy);
    assert_abs_diff_eq!(after.0, before.0, epsilon = 1e-12);
    assert_abs_diff_eq!(after.1, before.1, epsilon = 1e-12);
}

#[test]
fn test_coincident_wheels_skip_the_spring() {
    let config = SimConfig::default();
    let mut first = Wheel::new(5.0, 5.0, 10.0).unwrap();
    let mut second = Wheel::new(5.0, 5.0, 10.0).unwrap();
    second.vx = 3.0;

    assert_eq!(apply_spring(&mut first, &mut second, 50.0, &config), None);
    assert_eq!(first.vx, 0.0);
    assert_eq!(second.vx, 3.0);
}

#[test]
fn test_undamped_spring_oscillates_about_rest_length() {
    let config = SimConfig {
        gravity: 0.0,
        damping_factor: 0.0,
        ..SimConfig::default()
    };
    let mut world = SimWorld::with_track(config, Viewport::default(), distant_track()).unwrap();
    let (root, partner) = world.spawn_vehicle(0.0, 0.0, 100.0, 20.0).unwrap();

    let moved = world.wheel_mut(partner).unwrap();
    moved.x = 130.0;
    moved.y = 10.0;

    let mut total = 0.0;
    let mut samples = 0;
    for tick in 0..4000 {
        world.tick(DriveInput::default());
        if tick >= 1000 {
            total += separation(world.wheel(root).unwrap(), world.wheel(partner).unwrap());
            samples += 1;
        }
    }
    let average = total / samples as f64;
    assert_abs_diff_eq!(average, 100.0, epsilon = 1.0);
    assert_eq!(world.pairs()[0].rest_length(), 100.0);
}

#[test]
fn test_rotation_is_incremental_about_midpoint() {
    let mut root = Wheel::new(0.0, 0.0, 20.0).unwrap();
    let mut partner = Wheel::new(100.0, 0.0, 20.0).unwrap();
    root.angle = 1.0;

    rotate_about_center(&mut root, &mut partner, 0.1);

    let (s, c) = 0.1_f64.sin_cos();
    assert_abs_diff_eq!(root.x, 50.0 - 50.0 * c, epsilon = 1e-9);
    assert_abs_diff_eq!(root.y, -50.0 * s, epsilon = 1e-9);
    assert_abs_diff_eq!(partner.x, 50.0 + 50.0 * c, epsilon = 1e-9);
    assert_abs_diff_eq!(partner.y, 50.0 * s, epsilon = 1e-9);
    assert_abs_diff_eq!(separation(&root, &partner), 100.0, epsilon = 1e-9);

    // Only the step is applied; the stored angle plays no part
    assert_eq!(root.angle, 1.0);
}

#[test]
fn test_tiny_rotation_is_skipped() {
    let mut root = Wheel::new(0.0, 0.0, 20.0).unwrap();
    let mut partner = Wheel::new(100.0, 0.0, 20.0).unwrap();
    rotate_about_center(&mut root, &mut partner, 5e-7);
    assert_eq!((root.x, root.y, partner.x, partner.y), (0.0, 0.0, 100.0, 0.0));
}

#[test]
fn test_airborne_acceleration_clamps_at_max_angular_velocity() {
    let (mut world, root, _) = pair_world(SimConfig::default(), distant_track(), 0.0);
    let max = world.config().max_angular_velocity;

    for _ in 0..100 {
        world.tick(DriveInput::accelerate());
        assert!(world.wheel(root).unwrap().omega >= -max);
    }
    assert_abs_diff_eq!(world.wheel(root).unwrap().omega, -max, epsilon = 1e-3);
}

#[test]
fn test_airborne_braking_clamps_at_positive_max() {
    let (mut world, root, _) = pair_world(SimConfig::default(), distant_track(), 0.0);
    let max = world.config().max_angular_velocity;

    for _ in 0..100 {
        world.tick(DriveInput::brake());
        assert!(world.wheel(root).unwrap().omega <= max);
    }
    assert_abs_diff_eq!(world.wheel(root).unwrap().omega, max, epsilon = 1e-12);
}

#[test]
fn test_grounded_acceleration_is_bled_by_contact() {
    let (mut world, root, _) = pair_world(SimConfig::default(), flat_track(), -20.0);
    let config = world.config().clone();

    for _ in 0..100 {
        world.tick(DriveInput::accelerate());
        let omega = world.wheel(root).unwrap().omega;
        assert!(omega >= -config.max_angular_velocity);
        assert!(omega <= 0.0);
    }

    // Contact every tick settles where the bleed balances the angular push
    let balance = -config.angular_acceleration / (1.0 - config.contact_spin_retention);
    assert_abs_diff_eq!(world.wheel(root).unwrap().omega, balance, epsilon = 1e-4);
}

#[test]
fn test_tilt_angle_drifts_from_body_orientation() {
    let (mut world, root, partner) = pair_world(SimConfig::default(), flat_track(), -20.0);
    for _ in 0..300 {
        world.tick(DriveInput::accelerate());
    }

    let a = world.wheel(root).unwrap();
    let b = world.wheel(partner).unwrap();
    let orientation = (b.y - a.y).atan2(b.x - a.x);

    // The ground holds the body level while the accumulated angle keeps winding
    assert!(a.angle < -1.0);
    assert!(orientation.abs() < 0.1);
    assert!(a.x > 1000.0);
}

#[test]
fn test_bracing_restores_level() {
    let (mut world, root, _) = pair_world(SimConfig::default(), flat_track(), -20.0);
    {
        let wheel = world.wheel_mut(root).unwrap();
        wheel.angle = 0.3;
        wheel.omega = 0.05;
    }

    let mut angles = Vec::new();
    let mut restoring = false;
    for _ in 0..50 {
        world.tick(DriveInput::brace());
        let wheel = world.wheel(root).unwrap();
        if restoring {
            assert!(
                wheel.angle.abs() < angles.last().copied().unwrap_or(f64::INFINITY),
                "angle must shrink once the restoring torque takes over"
            );
        }
        restoring |= wheel.omega <= 0.0;
        angles.push(wheel.angle.abs());
    }

    assert!(restoring);
    // Leftover spin carries a short way before the torque wins, then it never diverges
    assert!(angles.iter().all(|a| *a < 0.35));
    assert!(*angles.last().unwrap() < 0.3);
    assert!(world.wheel(root).unwrap().angle > 0.0);
}

#[test]
fn test_released_spin_damps_to_zero() {
    let (mut world, root, _) = pair_world(SimConfig::default(), distant_track(), 0.0);
    world.wheel_mut(root).unwrap().omega = 0.01;

    for _ in 0..300 {
        world.tick(DriveInput::default());
    }
    assert_eq!(world.wheel(root).unwrap().omega, 0.0);
}

#[test]
fn test_angle_wraps_within_full_turn() {
    let (mut world, root, _) = pair_world(SimConfig::default(), distant_track(), 0.0);
    world.wheel_mut(root).unwrap().angle = 2.0 * std::f64::consts::PI - 0.001;

    let full_turn = 2.0 * std::f64::consts::PI;
    for _ in 0..20 {
        world.tick(DriveInput::brake());
        let angle = world.wheel(root).unwrap().angle;
        assert!(angle > -full_turn && angle <= full_turn);
    }
    assert!(world.wheel(root).unwrap().angle < 1.0);
}
