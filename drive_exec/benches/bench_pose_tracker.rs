//! # Pose Tracker Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use drive_lib::{
    drive_ctrl::DriveActuator,
    loc::{FieldVelocity, Pose2},
    pose_ctrl::{
        profile::{self, Constraints, ProfileState},
        Params, PoseTracker
    }
};
use util::tunable::TunableStore;

/// A drivetrain which ignores its commands.
struct NullDrive;

impl DriveActuator for NullDrive {
    fn run_velocity(&mut self, _velocity: &FieldVelocity, _heading_rad: f64) {}

    fn stop(&mut self) {}
}

fn pose_tracker_benchmark(c: &mut Criterion) {
    // ---- Profile on its own ----

    let constraints = Constraints::new(3.7, 5.0);
    let goal = ProfileState::default();

    c.bench_function("profile::calculate", |b| {
        b.iter(|| {
            profile::calculate(
                black_box(0.02),
                &ProfileState::new(black_box(2.3), -1.2),
                &goal,
                &constraints
            )
        })
    });

    // ---- Full cycle ----

    // Base held off the target, so every cycle does the full calculation
    let mut tracker = PoseTracker::new(
        Params::default(),
        TunableStore::new(),
        Pose2::new(-2.0, 1.5, (-135f64).to_radians()),
        Pose2::new(0.5, 0.25, 0.3),
        FieldVelocity::zero(),
        NullDrive
    );
    tracker.start();

    c.bench_function("PoseTracker::tick", |b| {
        b.iter(|| tracker.tick(black_box(0.02)))
    });
}

criterion_group!(benches, pose_tracker_benchmark);
criterion_main!(benches);
