//! Pose control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::f64::consts::PI;
use log::{debug, info, trace};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{
    controllers::{PidController, ProfiledPidController},
    driver_ff::{self, DriverFeedforward, NoDriverInput},
    profile::{self, Constraints, ProfileState},
    telemetry::TelemetrySink,
    Params
};
use crate::{
    drive_ctrl::DriveActuator,
    loc::{FieldVelocity, Pose2, PoseSource, VelocitySource}
};
use util::{
    maths::{band_fraction, get_ang_dist},
    tunable::{ChangeToken, TunableStore}
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target heading changes smaller than this between cycles are tracked as a
/// moving goal. Larger changes start a new heading profile leg.
///
/// Units: radians
pub const GOAL_ROTATION_JUMP_RAD: f64 = 10.0 * PI / 180.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drives the base from its current pose to a target pose.
///
/// Each cycle the tracker runs a trapezoidal profile on the straight line
/// distance to the target and a profiled PID on heading, blends profile
/// feedforward with feedback based on how far off the target the base is,
/// blends in any driver input and commands the resulting Field-relative
/// velocity.
pub struct PoseTracker {
    params: Params,
    tunables: TunableStore,
    tuning_token: ChangeToken,

    target_source: Box<dyn PoseSource>,
    pose_source: Box<dyn PoseSource>,
    velocity_source: Box<dyn VelocitySource>,
    driver_ff: Box<dyn DriverFeedforward>,
    actuator: Box<dyn DriveActuator>,
    telemetry: Option<Box<dyn TelemetrySink>>,

    /// Executing mode
    mode: TrackerMode,

    /// If true `is_finished` reports reaching the target
    end_at_target: bool,
    end_tolerance: ToleranceOverride,

    drive_ctrl: PidController,
    head_ctrl: ProfiledPidController,
    drive_constraints: Constraints,

    /// Memory carried from one cycle to the next
    setpoint: ControllerSetpoint,

    /// Straight line distance from the target at the latest sample
    trans_error_m: f64,

    /// Absolute heading error at the latest sample
    head_error_rad: f64,

    report: Option<StatusReport>
}

/// The possible modes of the tracker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackerMode {
    Idle,
    Tracking
}

/// The translational setpoint and heading goal carried between cycles.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct ControllerSetpoint {
    /// Position of the translational setpoint.
    ///
    /// Units: meters,
    /// Frame: Field
    pub translation_m: Vector2<f64>,

    /// Velocity of the translational setpoint.
    ///
    /// Units: meters/second,
    /// Frame: Field
    pub velocity_ms: Vector2<f64>,

    /// Target heading seen on the previous cycle.
    ///
    /// Units: radians
    pub goal_heading_rad: f64
}

/// How close to the target counts as being there.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Tolerance {
    /// Units: meters
    pub linear_m: f64,

    /// Units: radians
    pub angular_rad: f64
}

/// Caller supplied tolerances, with `None` falling back to the live-tunable
/// drive and heading tolerances.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ToleranceOverride {
    pub linear_m: Option<f64>,
    pub angular_rad: Option<f64>
}

/// Status report for one cycle of pose tracking.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct StatusReport {
    pub measured_pose: Pose2,
    pub target_pose: Pose2,

    /// Translational setpoint with the heading profile setpoint
    pub setpoint_pose: Pose2,

    /// Units: meters
    pub distance_measured_m: f64,

    /// Setpoint distance from the target
    ///
    /// Units: meters
    pub distance_setpoint_m: f64,

    /// Setpoint speed along the target to base line, negative towards the
    /// target.
    ///
    /// Units: meters/second
    pub velocity_setpoint_ms: f64,

    /// Absolute heading error
    ///
    /// Units: radians
    pub head_error_rad: f64,

    /// Rate of the goal fed into the heading profile
    ///
    /// Units: radians/second
    pub head_goal_rate_rads: f64,

    /// Units: radians/second
    pub head_setpoint_rate_rads: f64,

    pub linear_ff_scalar: f64,
    pub head_ff_scalar: f64,

    pub linear_interp: f64,
    pub angular_interp: f64,

    /// True if driver input restarted the profiles this cycle
    pub override_reset: bool,

    /// The velocity commanded this cycle
    pub cmd: FieldVelocity
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseTracker {
    /// Create a new tracker driving the pose from `pose_source` towards the
    /// pose from `target_source`.
    ///
    /// The tracker starts in `Idle` and never reports being finished. Use the
    /// `with_*` and `ending_at_target` functions to add driver input,
    /// telemetry or an end condition.
    pub fn new<T, P, V, A>(
        params: Params,
        tunables: TunableStore,
        target_source: T,
        pose_source: P,
        velocity_source: V,
        actuator: A
    ) -> Self
    where
        T: PoseSource + 'static,
        P: PoseSource + 'static,
        V: VelocitySource + 'static,
        A: DriveActuator + 'static
    {
        let tuned = params.with_overrides(&tunables);

        let mut head_ctrl = ProfiledPidController::new(
            tuned.head_k_p,
            tuned.head_k_d,
            Constraints::new(tuned.head_max_vel_rads, tuned.head_max_accel_radss)
        );
        head_ctrl.enable_continuous_input(-PI, PI);

        let mut tracker = Self {
            params,
            tunables,
            tuning_token: ChangeToken::default(),
            target_source: Box::new(target_source),
            pose_source: Box::new(pose_source),
            velocity_source: Box::new(velocity_source),
            driver_ff: Box::new(NoDriverInput),
            actuator: Box::new(actuator),
            telemetry: None,
            mode: TrackerMode::Idle,
            end_at_target: false,
            end_tolerance: ToleranceOverride::default(),
            drive_ctrl: PidController::new(tuned.drive_k_p, tuned.drive_k_d),
            head_ctrl,
            drive_constraints: Constraints::new(
                tuned.drive_max_vel_ms, tuned.drive_max_accel_mss),
            setpoint: ControllerSetpoint::default(),
            trans_error_m: 0.0,
            head_error_rad: 0.0,
            report: None
        };
        tracker.configure_controllers(&tuned);

        tracker
    }

    /// Blend input from the driver into the commanded velocity.
    pub fn with_driver_feedforward<D>(mut self, driver_ff: D) -> Self
    where
        D: DriverFeedforward + 'static
    {
        self.driver_ff = Box::new(driver_ff);
        self
    }

    /// Send a status report to `sink` every cycle.
    pub fn with_telemetry<S>(mut self, sink: S) -> Self
    where
        S: TelemetrySink + 'static
    {
        self.telemetry = Some(Box::new(sink));
        self
    }

    /// Report finished once within the given tolerances of the target.
    pub fn ending_at_target(mut self, tolerance: ToleranceOverride) -> Self {
        self.end_at_target = true;
        self.end_tolerance = tolerance;
        self
    }

    /// Begin tracking, or restart tracking from the current state.
    ///
    /// The translational setpoint is seeded from the measured position and
    /// Field velocity, and the heading profile from the measured heading and
    /// rate, so tracking picks up smoothly from however the base is moving.
    pub fn start(&mut self) {
        let params = self.params.with_overrides(&self.tunables);
        if self.tunables.has_changed(&mut self.tuning_token) {
            self.configure_controllers(&params);
        }

        self.reset_profile(&params);

        let pose = self.pose_source.get_pose();
        let target = self.target_source.get_pose();
        self.update_errors(&pose, &target);

        self.mode = TrackerMode::Tracking;

        info!(
            "Pose tracking started from ({:.3}, {:.3}, {:.1} deg) to ({:.3}, {:.3}, {:.1} deg)",
            pose.x_m(), pose.y_m(), pose.heading().to_degrees(),
            target.x_m(), target.y_m(), target.heading().to_degrees()
        );
    }

    /// Process one cycle of tracking, `dt` seconds after the previous one.
    ///
    /// Returns the commanded velocity, which has also been sent to the
    /// actuator, or `None` if the tracker is idle.
    pub fn tick(&mut self, dt: f64) -> Option<FieldVelocity> {
        if self.mode != TrackerMode::Tracking {
            trace!("PoseTracker is idle, no command issued");
            return None;
        }

        // ---- PARAMETERS ----

        let params = self.params.with_overrides(&self.tunables);
        if self.tunables.has_changed(&mut self.tuning_token) {
            self.configure_controllers(&params);
        }
        self.update_constraints(&params);

        // ---- AUTONOMOUS COMMAND ----

        let pose = self.pose_source.get_pose();
        let target = self.target_source.get_pose();
        self.update_errors(&pose, &target);

        let mut report = StatusReport {
            measured_pose: pose,
            target_pose: target,
            distance_measured_m: self.trans_error_m,
            head_error_rad: self.head_error_rad,
            ..Default::default()
        };

        let linear_ms = self.calc_drive_velocity(&pose, &target, dt, &params, &mut report);
        let angular_rads = self.calc_head_rate(&pose, &target, dt, &params, &mut report);

        // ---- DRIVER OVERRIDE ----

        let blend = driver_ff::blend(
            &FieldVelocity::new(linear_ms, angular_rads),
            self.driver_ff.linear(),
            self.driver_ff.angular(),
            params.max_linear_speed_ms,
            params.max_angular_speed_rads
        );
        report.linear_interp = blend.linear_interp;
        report.angular_interp = blend.angular_interp;

        // Significant driver input invalidates the profiles, restart them from
        // wherever the driver has taken the base.
        if blend.requires_reset(params.override_reset_threshold) {
            debug!(
                "Driver override (linear {:.2}, angular {:.2}), resetting profiles",
                blend.linear_interp, blend.angular_interp
            );
            self.reset_profile(&params);
            report.override_reset = true;
        }

        // ---- OUTPUT ----

        let cmd = blend.velocity;
        self.actuator.run_velocity(&cmd, pose.heading());

        let head_setpoint = self.head_ctrl.setpoint();
        report.setpoint_pose = Pose2::from_parts(self.setpoint.translation_m, head_setpoint.position);
        report.head_setpoint_rate_rads = head_setpoint.velocity;
        report.cmd = cmd;

        if let Some(ref mut sink) = self.telemetry {
            sink.record(&report);
        }
        self.report = Some(report);

        Some(cmd)
    }

    /// Stop tracking and command the drivetrain to stop.
    ///
    /// Calling `stop` while idle issues the same stop command again.
    pub fn stop(&mut self) {
        self.actuator.stop();

        if self.mode == TrackerMode::Tracking {
            info!("Pose tracking stopped");
        }

        self.mode = TrackerMode::Idle;
        self.setpoint = ControllerSetpoint::default();
        self.trans_error_m = 0.0;
        self.head_error_rad = 0.0;
        self.report = None;

        if let Some(ref mut sink) = self.telemetry {
            sink.clear();
        }
    }

    /// Whether the base is within `tolerance` of the target. Always false
    /// when idle.
    pub fn at_target(&self, tolerance: Tolerance) -> bool {
        self.mode == TrackerMode::Tracking
            && self.trans_error_m < tolerance.linear_m
            && self.head_error_rad < tolerance.angular_rad
    }

    /// The tolerance used by `is_finished`: the caller's overrides, or the
    /// current drive and heading tolerances for any not given.
    pub fn end_tolerance(&self) -> Tolerance {
        let params = self.params.with_overrides(&self.tunables);

        Tolerance {
            linear_m: self.end_tolerance.linear_m.unwrap_or(params.drive_tolerance_m),
            angular_rad: self.end_tolerance.angular_rad.unwrap_or(params.head_tolerance_rad)
        }
    }

    /// Whether tracking is complete. Only ever true for trackers built with
    /// `ending_at_target`.
    pub fn is_finished(&self) -> bool {
        self.end_at_target && self.at_target(self.end_tolerance())
    }

    pub fn mode(&self) -> TrackerMode {
        self.mode
    }

    /// The setpoint memory carried into the next cycle.
    pub fn setpoint(&self) -> ControllerSetpoint {
        self.setpoint
    }

    /// The heading profile's current setpoint.
    pub fn heading_setpoint(&self) -> ProfileState {
        self.head_ctrl.setpoint()
    }

    pub fn translation_error_m(&self) -> f64 {
        self.trans_error_m
    }

    pub fn heading_error_rad(&self) -> f64 {
        self.head_error_rad
    }

    /// The report from the latest cycle, `None` before the first cycle after
    /// a start or after stopping.
    pub fn report(&self) -> Option<&StatusReport> {
        self.report.as_ref()
    }
}

impl PoseTracker {

    /// Apply gains and tolerances to the controllers.
    fn configure_controllers(&mut self, params: &Params) {
        self.drive_ctrl.set_gains(params.drive_k_p, params.drive_k_d);
        self.drive_ctrl.set_tolerance(params.drive_tolerance_m);
        self.head_ctrl.set_gains(params.head_k_p, params.head_k_d);
        self.head_ctrl.set_tolerance(params.head_tolerance_rad);

        debug!(
            "PoseTracker gains: drive ({}, {}) tol {} m, head ({}, {}) tol {} rad",
            params.drive_k_p, params.drive_k_d, params.drive_tolerance_m,
            params.head_k_p, params.head_k_d, params.head_tolerance_rad
        );
    }

    fn update_constraints(&mut self, params: &Params) {
        self.drive_constraints = Constraints::new(
            params.drive_max_vel_ms, params.drive_max_accel_mss);
        self.head_ctrl.set_constraints(Constraints::new(
            params.head_max_vel_rads, params.head_max_accel_radss));
    }

    fn update_errors(&mut self, pose: &Pose2, target: &Pose2) {
        self.trans_error_m = (pose.position_m() - target.position_m()).norm();
        self.head_error_rad = get_ang_dist(target.heading(), pose.heading()).abs();
    }

    /// Reseed the profiles and controllers from the measured state.
    fn reset_profile(&mut self, params: &Params) {
        let pose = self.pose_source.get_pose();
        let target = self.target_source.get_pose();
        let velocity = self.velocity_source.get_field_velocity();

        self.update_constraints(params);
        self.drive_ctrl.reset();
        self.head_ctrl.reset(pose.heading(), velocity.angular_rads);

        self.setpoint = ControllerSetpoint {
            translation_m: pose.position_m(),
            velocity_ms: velocity.linear_ms,
            goal_heading_rad: target.heading()
        };
    }

    /// Calculate the Field-relative translational velocity.
    ///
    /// The distance profile runs along the line from the previous setpoint to
    /// the target, with the target at its origin. Its setpoint is then laid
    /// back onto the line from the target to the base, so the next cycle
    /// starts from a setpoint in line with where the base actually is.
    fn calc_drive_velocity(
        &mut self,
        pose: &Pose2,
        target: &Pose2,
        dt: f64,
        params: &Params,
        report: &mut StatusReport
    ) -> Vector2<f64> {

        let ff_scalar = band_fraction(
            self.trans_error_m,
            params.linear_ff_min_radius_m,
            params.linear_ff_max_radius_m
        );

        let direction = target.position_m() - self.setpoint.translation_m;
        let remaining_m = direction.norm();

        // Very close to the target the direction is meaningless, keep the
        // previous speed rather than projecting onto it.
        let mut setpoint_vel_ms = if remaining_m <= params.min_dist_vel_correction_m {
            self.setpoint.velocity_ms.norm()
        }
        else {
            self.setpoint.velocity_ms.dot(&direction) / remaining_m
        };
        setpoint_vel_ms = setpoint_vel_ms.max(params.setpoint_min_vel_ms);

        // Approaching the target is negative velocity in the profile
        let drive_setpoint = profile::calculate(
            dt,
            &ProfileState::new(remaining_m, -setpoint_vel_ms),
            &ProfileState::default(),
            &self.drive_constraints
        );

        let mut speed_ms = self.drive_ctrl.calculate(
            self.trans_error_m, drive_setpoint.position, dt)
            + drive_setpoint.velocity * ff_scalar;
        if self.trans_error_m < self.drive_ctrl.error_tolerance() {
            speed_ms = 0.0;
        }

        let offset = pose.position_m() - target.position_m();
        let bearing_rad = offset[1].atan2(offset[0]);
        let bearing = Vector2::new(bearing_rad.cos(), bearing_rad.sin());

        self.setpoint.translation_m = target.position_m() + bearing * drive_setpoint.position;
        self.setpoint.velocity_ms = bearing * drive_setpoint.velocity;

        report.distance_setpoint_m = drive_setpoint.position;
        report.velocity_setpoint_ms = drive_setpoint.velocity;
        report.linear_ff_scalar = ff_scalar;

        bearing * speed_ms
    }

    /// Calculate the rotation rate.
    fn calc_head_rate(
        &mut self,
        pose: &Pose2,
        target: &Pose2,
        dt: f64,
        params: &Params,
        report: &mut StatusReport
    ) -> f64 {

        let ff_scalar = band_fraction(
            self.head_error_rad,
            params.head_ff_min_error_rad,
            params.head_ff_max_error_rad
        );

        // A small change in target heading is a goal moving at that rate. A
        // jump keeps the profile's own rate instead of an impulse.
        let goal_delta_rad = get_ang_dist(self.setpoint.goal_heading_rad, target.heading());
        let goal_rate_rads = if goal_delta_rad.abs() < GOAL_ROTATION_JUMP_RAD && dt > 0.0 {
            goal_delta_rad / dt
        }
        else {
            self.head_ctrl.setpoint().velocity
        };

        let mut rate_rads = self.head_ctrl.calculate(
            pose.heading(),
            ProfileState::new(target.heading(), goal_rate_rads),
            dt
        );
        rate_rads += self.head_ctrl.setpoint().velocity * ff_scalar;

        if self.head_error_rad < self.head_ctrl.position_tolerance() {
            rate_rads = 0.0;
        }

        self.setpoint.goal_heading_rad = target.heading();

        report.head_goal_rate_rads = goal_rate_rads;
        report.head_ff_scalar = ff_scalar;

        rate_rads
    }
}

impl ToleranceOverride {
    /// Tolerance for trackers driving to a fixed target: 5 inches and 5
    /// degrees.
    pub fn fixed_target() -> Self {
        Self {
            linear_m: Some(5.0 * 0.0254),
            angular_rad: Some(5f64.to_radians())
        }
    }
}

impl From<Tolerance> for ToleranceOverride {
    fn from(tolerance: Tolerance) -> Self {
        Self {
            linear_m: Some(tolerance.linear_m),
            angular_rad: Some(tolerance.angular_rad)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default)]
    struct RecordingDrive {
        cmds: Vec<FieldVelocity>,
        stops: usize
    }

    impl DriveActuator for RecordingDrive {
        fn run_velocity(&mut self, velocity: &FieldVelocity, _heading_rad: f64) {
            self.cmds.push(*velocity);
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn tracker(pose: Pose2, target: Pose2) -> (PoseTracker, Rc<RefCell<RecordingDrive>>) {
        moving_tracker(pose, target, FieldVelocity::zero())
    }

    fn moving_tracker(
        pose: Pose2,
        target: Pose2,
        velocity: FieldVelocity
    ) -> (PoseTracker, Rc<RefCell<RecordingDrive>>) {
        let drive = Rc::new(RefCell::new(RecordingDrive::default()));
        let tracker = PoseTracker::new(
            Params::default(),
            TunableStore::new(),
            target,
            pose,
            velocity,
            drive.clone()
        );

        (tracker, drive)
    }

    fn tight() -> Tolerance {
        Tolerance { linear_m: 0.01, angular_rad: 1f64.to_radians() }
    }

    #[test]
    fn test_idle_tracker_not_at_target() {
        let pose = Pose2::new(1.0, 2.0, 0.5);
        let (mut tracker, drive) = tracker(pose, pose);

        assert_eq!(tracker.mode(), TrackerMode::Idle);
        assert!(!tracker.at_target(tight()));

        // Ticking while idle does nothing
        assert_eq!(tracker.tick(0.02), None);
        assert!(drive.borrow().cmds.is_empty());
        assert!(tracker.report().is_none());
    }

    #[test]
    fn test_start_samples_errors() {
        let (mut tracker, _) = tracker(Pose2::new(0.0, 0.0, 0.0), Pose2::new(3.0, 4.0, 0.0));
        tracker.start();

        assert_eq!(tracker.mode(), TrackerMode::Tracking);
        assert!((tracker.translation_error_m() - 5.0).abs() < 1e-12);
        assert!(!tracker.at_target(tight()));

        // Setpoint seeded from the measured pose
        assert_eq!(tracker.setpoint().translation_m, Vector2::zeros());
    }

    #[test]
    fn test_start_seeds_heading_profile() {
        let pose = Pose2::new(0.0, 0.0, 1.0);
        let target = Pose2::new(0.0, 0.0, -1.0);
        let velocity = FieldVelocity::new(Vector2::zeros(), 0.75);
        let (mut tracker, _) = moving_tracker(pose, target, velocity);

        tracker.start();
        assert_eq!(tracker.heading_setpoint(), ProfileState::new(pose.heading(), 0.75));
        assert_eq!(tracker.setpoint().goal_heading_rad, target.heading());
    }

    #[test]
    fn test_setpoint_velocity_floor() {
        // Driving away from the target at 2 m/s, floored to 0.5 m/s away
        let params = Params::default();
        let velocity = FieldVelocity::new(Vector2::new(-2.0, 0.0), 0.0);
        let (mut tracker, _) = moving_tracker(
            Pose2::new(0.0, 0.0, 0.0), Pose2::new(3.0, 0.0, 0.0), velocity);

        tracker.start();
        tracker.tick(0.02);

        // The profile then decelerates the away motion by one step
        let expected = -params.setpoint_min_vel_ms - params.drive_max_accel_mss * 0.02;
        let report = tracker.report().unwrap();
        assert!(
            (report.velocity_setpoint_ms - expected).abs() < 1e-9,
            "setpoint velocity {}", report.velocity_setpoint_ms
        );
    }

    #[test]
    fn test_setpoint_speed_kept_near_target() {
        // Within the correction radius a sideways setpoint velocity keeps its
        // speed instead of projecting to zero onto the target direction
        let params = Params::default();
        let velocity = FieldVelocity::new(Vector2::new(0.0, 1.0), 0.0);
        let (mut tracker, _) = moving_tracker(
            Pose2::new(0.005, 0.0, 0.0), Pose2::new(0.0, 0.0, 0.0), velocity);

        tracker.start();
        assert!(tracker.translation_error_m() <= params.min_dist_vel_correction_m);
        tracker.tick(0.02);

        // 1 m/s towards the target brakes by one step
        let expected = -(1.0 - params.drive_max_accel_mss * 0.02);
        let report = tracker.report().unwrap();
        assert!(
            (report.velocity_setpoint_ms - expected).abs() < 1e-9,
            "setpoint velocity {}", report.velocity_setpoint_ms
        );
    }

    #[test]
    fn test_stop_is_idempotent() {
        let pose = Pose2::new(1.0, 2.0, 0.5);
        let (mut tracker, drive) = tracker(pose, Pose2::new(2.0, 2.0, 0.0));

        tracker.start();
        tracker.tick(0.02);
        tracker.stop();

        let mode_once = tracker.mode();
        let setpoint_once = tracker.setpoint();
        assert_eq!(drive.borrow().stops, 1);

        tracker.stop();
        assert_eq!(drive.borrow().stops, 2);
        assert_eq!(tracker.mode(), mode_once);
        assert_eq!(tracker.mode(), TrackerMode::Idle);
        assert_eq!(tracker.setpoint(), setpoint_once);
        assert!(tracker.report().is_none());
        assert!(!tracker.at_target(Tolerance { linear_m: 10.0, angular_rad: PI }));
    }

    #[test]
    fn test_end_tolerance_overrides() {
        let pose = Pose2::new(0.0, 0.0, 0.0);
        let (tracker, _) = tracker(pose, pose);

        let tracker = tracker.ending_at_target(ToleranceOverride {
            linear_m: Some(0.2),
            angular_rad: None
        });
        let tol = tracker.end_tolerance();
        assert_eq!(tol.linear_m, 0.2);
        assert_eq!(tol.angular_rad, Params::default().head_tolerance_rad);

        // Not started, so never finished
        assert!(!tracker.is_finished());
    }

    #[test]
    fn test_default_tracker_never_finishes() {
        let pose = Pose2::new(0.0, 0.0, 0.0);
        let (mut tracker, _) = tracker(pose, pose);

        tracker.start();
        tracker.tick(0.02);
        assert!(tracker.at_target(tight()));
        assert!(!tracker.is_finished());
    }
}
