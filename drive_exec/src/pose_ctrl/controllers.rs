//! # Pose controllers module
//!
//! This module provides the PID controllers used by the pose tracker: a
//! plain proportional-derivative controller for the distance to the target,
//! and a profiled variant for heading which steps a trapezoidal profile
//! towards the goal each cycle and servos onto the profile's setpoint.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use util::maths::input_modulus;
use super::profile::{self, Constraints, ProfileState};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PD controller with an error tolerance and an optional continuous
/// (wrapping) input range.
#[derive(Debug, Serialize, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Dervative gain
    k_d: f64,

    /// Error magnitude under which the controller is at its setpoint
    error_tolerance: f64,

    /// Input range over which the measurement wraps, if any
    continuous_range: Option<(f64, f64)>,

    /// Error from the previous calculation, `None` straight after a reset
    prev_error: Option<f64>,

    /// Error from the latest calculation
    error: f64
}

/// A PD controller which tracks the setpoint of a trapezoidal profile
/// running towards the goal.
#[derive(Debug, Serialize, Clone)]
pub struct ProfiledPidController {
    pid: PidController,

    constraints: Constraints,

    /// Current profile setpoint
    setpoint: ProfileState,

    /// Goal the profile is moving towards
    goal: ProfileState
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_d: f64) -> Self {
        Self {
            k_p, k_d,
            error_tolerance: 0.0,
            continuous_range: None,
            prev_error: None,
            error: 0.0
        }
    }

    /// Treat the input as wrapping between `min` and `max`, so the error is
    /// always the shortest signed distance between setpoint and measurement.
    pub fn enable_continuous_input(&mut self, min: f64, max: f64) {
        self.continuous_range = Some((min, max));
    }

    pub fn set_gains(&mut self, k_p: f64, k_d: f64) {
        self.k_p = k_p;
        self.k_d = k_d;
    }

    pub fn set_tolerance(&mut self, error_tolerance: f64) {
        self.error_tolerance = error_tolerance;
    }

    pub fn error_tolerance(&self) -> f64 {
        self.error_tolerance
    }

    /// Whether the latest error is within tolerance.
    pub fn at_setpoint(&self) -> bool {
        self.error.abs() < self.error_tolerance
    }

    /// Forget the error history, so the next calculation has no derivative
    /// kick.
    pub fn reset(&mut self) {
        self.prev_error = None;
        self.error = 0.0;
    }

    /// Get the output of the controller for the given measurement and
    /// setpoint, `dt` seconds after the previous calculation.
    pub fn calculate(&mut self, measurement: f64, setpoint: f64, dt: f64) -> f64 {
        let error = match self.continuous_range {
            Some((min, max)) => {
                let error_bound = (max - min) / 2.0;
                input_modulus(setpoint - measurement, -error_bound, error_bound)
            },
            None => setpoint - measurement
        };

        // No derivative on the first sample after a reset, or if time hasn't
        // moved forward.
        let deriv = match self.prev_error {
            Some(e) if dt > 0.0 => (error - e) / dt,
            _ => 0.0
        };

        self.prev_error = Some(error);
        self.error = error;

        self.k_p * error + self.k_d * deriv
    }
}

impl ProfiledPidController {

    /// Create a new controller with the given gains and profile constraints.
    pub fn new(k_p: f64, k_d: f64, constraints: Constraints) -> Self {
        Self {
            pid: PidController::new(k_p, k_d),
            constraints,
            setpoint: ProfileState::default(),
            goal: ProfileState::default()
        }
    }

    pub fn enable_continuous_input(&mut self, min: f64, max: f64) {
        self.pid.enable_continuous_input(min, max);
    }

    pub fn set_gains(&mut self, k_p: f64, k_d: f64) {
        self.pid.set_gains(k_p, k_d);
    }

    pub fn set_tolerance(&mut self, position_tolerance: f64) {
        self.pid.set_tolerance(position_tolerance);
    }

    pub fn position_tolerance(&self) -> f64 {
        self.pid.error_tolerance()
    }

    pub fn set_constraints(&mut self, constraints: Constraints) {
        self.constraints = constraints;
    }

    /// The profile setpoint produced by the latest calculation.
    pub fn setpoint(&self) -> ProfileState {
        self.setpoint
    }

    pub fn goal(&self) -> ProfileState {
        self.goal
    }

    /// Restart the profile from the given measured position and rate.
    pub fn reset(&mut self, measurement: f64, measurement_rate: f64) {
        self.pid.reset();
        self.setpoint = ProfileState::new(measurement, measurement_rate);
    }

    /// Step the profile towards `goal` and get the controller output for the
    /// new setpoint.
    pub fn calculate(&mut self, measurement: f64, goal: ProfileState, dt: f64) -> f64 {
        self.goal = goal;

        // With a wrapping input re-express the goal and setpoint as their
        // shortest distance from the measurement, so the profile takes the
        // shortest way round.
        if let Some((min, max)) = self.pid.continuous_range {
            let error_bound = (max - min) / 2.0;
            let goal_min_dist = input_modulus(
                self.goal.position - measurement, -error_bound, error_bound);
            let setpoint_min_dist = input_modulus(
                self.setpoint.position - measurement, -error_bound, error_bound);

            self.goal.position = measurement + goal_min_dist;
            self.setpoint.position = measurement + setpoint_min_dist;
        }

        self.setpoint = profile::calculate(dt, &self.setpoint, &self.goal, &self.constraints);

        self.pid.calculate(measurement, self.setpoint.position, dt)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_proportional_and_tolerance() {
        let mut pid = PidController::new(2.0, 0.0);
        pid.set_tolerance(0.1);

        assert_eq!(pid.calculate(1.0, 3.0, 0.02), 4.0);
        assert!(!pid.at_setpoint());

        pid.calculate(2.95, 3.0, 0.02);
        assert!(pid.at_setpoint());
    }

    #[test]
    fn test_no_derivative_kick_after_reset() {
        let mut pid = PidController::new(0.0, 1.0);

        // First sample has no history
        assert_eq!(pid.calculate(0.0, 1.0, 0.02), 0.0);

        // Error falls by 0.1 over 0.02 s
        let out = pid.calculate(0.1, 1.0, 0.02);
        assert!((out + 5.0).abs() < 1e-9);

        pid.reset();
        assert_eq!(pid.calculate(5.0, 1.0, 0.02), 0.0);
    }

    #[test]
    fn test_continuous_error_is_shortest() {
        let mut pid = PidController::new(1.0, 0.0);
        pid.enable_continuous_input(-PI, PI);

        // From 170 deg to -170 deg is +20 deg through the wrap
        let out = pid.calculate(170f64.to_radians(), (-170f64).to_radians(), 0.02);
        assert!((out - 20f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_profiled_takes_shortest_path() {
        let mut ctrl = ProfiledPidController::new(
            2.5, 0.0, Constraints::new(720f64.to_radians(), 500f64.to_radians()));
        ctrl.enable_continuous_input(-PI, PI);

        let start = 170f64.to_radians();
        ctrl.reset(start, 0.0);

        let out = ctrl.calculate(start, ProfileState::new((-170f64).to_radians(), 0.0), 0.02);

        // Goal re-expressed as 20 deg on from the measurement
        assert!((ctrl.goal().position - 190f64.to_radians()).abs() < 1e-9);
        assert_eq!(ctrl.goal().velocity, 0.0);

        // Setpoint moves up past 170 deg rather than back down through zero
        assert!(ctrl.setpoint().position > start);
        assert!(ctrl.setpoint().velocity > 0.0);
        assert!(out > 0.0);
    }

    #[test]
    fn test_profiled_reset_seeds_setpoint() {
        let mut ctrl = ProfiledPidController::new(1.0, 0.0, Constraints::new(1.0, 1.0));
        ctrl.reset(0.5, -0.25);
        assert_eq!(ctrl.setpoint(), ProfileState::new(0.5, -0.25));
    }
}
