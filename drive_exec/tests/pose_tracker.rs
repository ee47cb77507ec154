//! Closed loop tests of the pose tracker against a base which does exactly
//! as it is commanded.

use std::{
    cell::{Cell, RefCell},
    f64::consts::PI,
    rc::Rc
};

use nalgebra::Vector2;

use drive_lib::{
    drive_ctrl::DriveActuator,
    loc::{FieldVelocity, Pose2, PoseSource},
    pose_ctrl::{params::keys, Params, PoseTracker, Tolerance, TrackerMode}
};
use util::tunable::TunableStore;

const DT: f64 = 0.02;
const INCH_M: f64 = 0.0254;

#[derive(Debug, Default)]
struct Plant {
    pose: Pose2,
    vel: FieldVelocity,
    num_stops: usize
}

impl Plant {
    fn step(&mut self, dt: f64) {
        self.pose = Pose2::from_parts(
            self.pose.position_m() + self.vel.linear_ms * dt,
            self.pose.heading() + self.vel.angular_rads * dt
        );
    }
}

impl DriveActuator for Plant {
    fn run_velocity(&mut self, velocity: &FieldVelocity, _heading_rad: f64) {
        self.vel = *velocity;
    }

    fn stop(&mut self) {
        self.vel = FieldVelocity::zero();
        self.num_stops += 1;
    }
}

fn build<T>(start: Pose2, target: T, tunables: TunableStore) -> (PoseTracker, Rc<RefCell<Plant>>)
where
    T: PoseSource + 'static
{
    let plant = Rc::new(RefCell::new(Plant {
        pose: start,
        ..Default::default()
    }));
    let pose_plant = plant.clone();
    let vel_plant = plant.clone();

    let tracker = PoseTracker::new(
        Params::default(),
        tunables,
        target,
        move || pose_plant.borrow().pose,
        move || vel_plant.borrow().vel,
        plant.clone()
    );

    (tracker, plant)
}

/// Tick the tracker and move the plant on by one cycle.
fn cycle(tracker: &mut PoseTracker, plant: &Rc<RefCell<Plant>>) -> FieldVelocity {
    let cmd = tracker.tick(DT).expect("Tracker should be tracking");
    plant.borrow_mut().step(DT);
    cmd
}

fn default_tolerance() -> Tolerance {
    Tolerance {
        linear_m: 0.4 * INCH_M,
        angular_rad: 1f64.to_radians()
    }
}

#[test]
fn test_straight_line_settles() {
    let target = Pose2::new(3.0, 0.0, 0.0);
    let (mut tracker, plant) = build(Pose2::new(0.0, 0.0, 0.0), target, TunableStore::new());

    tracker.start();

    let mut prev_error_m = tracker.translation_error_m();
    let mut settled_at = None;

    for i in 0..200 {
        let cmd = cycle(&mut tracker, &plant);
        let error_m = tracker.translation_error_m();

        assert!(
            error_m <= prev_error_m + 1e-9,
            "error grew from {} to {} on cycle {}", prev_error_m, error_m, i
        );
        prev_error_m = error_m;

        if tracker.at_target(default_tolerance()) {
            assert!(cmd.is_zero(), "non-zero command {:?} at the target", cmd);
            settled_at = Some(i);
            break;
        }
    }

    let settled_at = settled_at.expect("Did not reach the target");
    assert!(settled_at <= 100, "took {} cycles to settle", settled_at);

    // Stays put once there
    for _ in 0..10 {
        assert!(cycle(&mut tracker, &plant).is_zero());
    }
    assert!(plant.borrow().pose.y_m().abs() < 1e-9);
}

#[test]
fn test_at_target_from_start() {
    let pose = Pose2::new(1.0, 2.0, 30f64.to_radians());
    let (mut tracker, _plant) = build(pose, pose, TunableStore::new());

    tracker.start();
    assert!(tracker.at_target(Tolerance {
        linear_m: 0.01,
        angular_rad: 1f64.to_radians()
    }));

    let cmd = tracker.tick(DT).unwrap();
    assert!(cmd.is_zero());
}

#[test]
fn test_stopped_tracker() {
    let (mut tracker, plant) = build(
        Pose2::new(0.0, 0.0, 0.0), Pose2::new(1.0, 0.0, 0.0), TunableStore::new());

    tracker.start();
    for _ in 0..10 {
        cycle(&mut tracker, &plant);
    }
    assert!(!plant.borrow().vel.is_zero());

    tracker.stop();
    tracker.stop();

    assert_eq!(tracker.mode(), TrackerMode::Idle);
    assert_eq!(plant.borrow().num_stops, 2);
    assert!(plant.borrow().vel.is_zero());
    assert!(!tracker.at_target(Tolerance { linear_m: 100.0, angular_rad: PI }));
    assert_eq!(tracker.tick(DT), None);

    // Restarting picks up from where the base is
    tracker.start();
    assert_eq!(tracker.setpoint().translation_m, plant.borrow().pose.position_m());
    assert!(tracker.tick(DT).is_some());
}

#[test]
fn test_full_scale_driver_input() {
    let (tracker, _plant) = build(
        Pose2::new(0.0, 0.0, 0.0), Pose2::new(3.0, 0.0, 0.0), TunableStore::new());

    let mut tracker = tracker.with_driver_feedforward((
        || Vector2::new(1.0, 0.0),
        || -1.0
    ));
    tracker.start();

    let cmd = tracker.tick(DT).unwrap();
    let params = Params::default();

    assert!((cmd.linear_ms - Vector2::new(params.max_linear_speed_ms, 0.0)).norm() < 1e-9);
    assert!((cmd.angular_rads + params.max_angular_speed_rads).abs() < 1e-9);
}

#[test]
fn test_driver_override_resets_profile() {
    let input = Rc::new(Cell::new(Vector2::zeros()));
    let linear_input = input.clone();

    let (tracker, plant) = build(
        Pose2::new(0.0, 0.0, 0.0), Pose2::new(3.0, 0.0, 0.0), TunableStore::new());
    let mut tracker = tracker.with_driver_feedforward((
        move || linear_input.get(),
        || 0.0
    ));

    tracker.start();
    for _ in 0..10 {
        cycle(&mut tracker, &plant);
    }

    // Half the blend, over the reset threshold
    input.set(Vector2::new(0.0, 0.25));
    let measured = plant.borrow().pose;
    cycle(&mut tracker, &plant);

    let report = *tracker.report().unwrap();
    assert!(report.override_reset);
    assert!((report.linear_interp - 0.5).abs() < 1e-12);
    assert!((tracker.setpoint().translation_m - measured.position_m()).norm() < 1e-12);

    // A light touch is blended without a reset
    input.set(Vector2::new(0.1, 0.0));
    cycle(&mut tracker, &plant);
    let report = tracker.report().unwrap();
    assert!(!report.override_reset);
    assert!((report.linear_interp - 0.2).abs() < 1e-12);
}

#[test]
fn test_heading_jump_keeps_profile_rate() {
    let target = Rc::new(Cell::new(Pose2::new(0.0, 0.0, 90f64.to_radians())));
    let target_src = target.clone();

    let (mut tracker, plant) = build(
        Pose2::new(0.0, 0.0, 0.0), move || target_src.get(), TunableStore::new());

    tracker.start();
    for _ in 0..5 {
        cycle(&mut tracker, &plant);
    }

    let prev_rate = tracker.report().unwrap().head_setpoint_rate_rads;
    assert!(prev_rate > 0.5);

    // 181 deg the other way, which is a 179 deg jump
    target.set(Pose2::new(0.0, 0.0, (-91f64).to_radians()));
    cycle(&mut tracker, &plant);
    let goal_rate = tracker.report().unwrap().head_goal_rate_rads;
    assert!((goal_rate - prev_rate).abs() < 1e-12, "goal rate {} after jump", goal_rate);

    // A small step is a goal moving at step / dt
    target.set(Pose2::new(0.0, 0.0, (-86f64).to_radians()));
    cycle(&mut tracker, &plant);
    let goal_rate = tracker.report().unwrap().head_goal_rate_rads;
    assert!((goal_rate - 5f64.to_radians() / DT).abs() < 1e-9);
}

#[test]
fn test_heading_takes_shortest_way_round() {
    let (mut tracker, _plant) = build(
        Pose2::new(0.0, 0.0, 170f64.to_radians()),
        Pose2::new(0.0, 0.0, (-170f64).to_radians()),
        TunableStore::new()
    );

    tracker.start();
    assert!((tracker.heading_error_rad() - 20f64.to_radians()).abs() < 1e-9);

    let cmd = tracker.tick(DT).unwrap();
    assert!(cmd.angular_rads > 0.0);
}

#[test]
fn test_live_tuning_takes_effect() {
    let tunables = TunableStore::new();
    let (mut tracker, plant) = build(
        Pose2::new(0.0, 0.0, 0.0), Pose2::new(3.0, 0.0, 0.0), tunables.clone());

    tracker.start();
    for _ in 0..30 {
        cycle(&mut tracker, &plant);
    }
    assert!(tracker.report().unwrap().velocity_setpoint_ms < -2.5);

    tunables.set(keys::DRIVE_MAX_VEL_MS, 1.0);

    for _ in 0..100 {
        cycle(&mut tracker, &plant);
        let velocity_ms = tracker.report().unwrap().velocity_setpoint_ms;
        assert!(velocity_ms.abs() <= 1.0 + 1e-9, "setpoint velocity {}", velocity_ms);
    }
}

#[test]
fn test_tuned_tolerance_zeroes_command() {
    let tunables = TunableStore::new();
    tunables.set(keys::DRIVE_TOLERANCE_M, 0.5);

    let (tracker, _plant) = build(
        Pose2::new(0.0, 0.0, 0.0), Pose2::new(0.3, 0.0, 0.0), tunables);
    let mut tracker = tracker.ending_at_target(Default::default());

    tracker.start();
    assert_eq!(tracker.end_tolerance().linear_m, 0.5);

    let cmd = tracker.tick(DT).unwrap();
    assert!(cmd.is_zero());
    assert!(tracker.is_finished());
}

#[test]
fn test_follows_moving_target() {
    let cycles = Rc::new(Cell::new(0u32));
    let target_cycles = cycles.clone();

    // Target moving along +Y at 0.5 m/s
    let (mut tracker, plant) = build(
        Pose2::new(0.0, 0.0, 0.0),
        move || Pose2::new(1.0, 0.5 * DT * target_cycles.get() as f64, 0.0),
        TunableStore::new()
    );

    tracker.start();
    for _ in 0..400 {
        cycle(&mut tracker, &plant);
        cycles.set(cycles.get() + 1);
    }

    assert!(tracker.translation_error_m() < 0.1);
}
