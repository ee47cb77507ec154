//! # Trapezoidal motion profile
//!
//! Computes the next state of a one dimensional, time optimal motion towards a
//! goal state under velocity and acceleration limits. The profile has no
//! memory: each call replans from the given current state, so it can be
//! stepped one cycle at a time while the goal moves or the limits are tuned.
//!
//! The plan is built as if the motion started and finished at rest. A
//! non-zero current or goal velocity is handled by cutting off the matching
//! portion of the acceleration or deceleration ramp, which gives:
//!
//! ```text
//!  v
//!  ^      ________
//!  |     /        \
//!  |    /          \
//!  +---+------+-----+----> t
//!  end_accel  end_full_speed  end_decel
//! ```
//!
//! A state already moving towards the goal too fast to stop before it cannot
//! follow this shape. It brakes at the acceleration limit instead, and later
//! calls plan back to the goal from wherever it comes to rest.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use serde::Serialize;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Slack on the end of the acceleration phase before a state counts as
/// unable to stop at the goal.
///
/// Units: seconds
const OVERSHOOT_TIME_TOL_S: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A position and velocity along one axis.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct ProfileState {
    pub position: f64,
    pub velocity: f64
}

/// Limits on the motion along one axis.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Constraints {
    /// Maximum magnitude of velocity.
    pub max_velocity: f64,

    /// Maximum magnitude of acceleration.
    pub max_acceleration: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProfileState {
    pub fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }

    /// Express the state in a frame whose positive direction is `direction`
    /// (either 1 or -1).
    fn directed(&self, direction: f64) -> Self {
        Self {
            position: self.position * direction,
            velocity: self.velocity * direction
        }
    }
}

impl Constraints {
    pub fn new(max_velocity: f64, max_acceleration: f64) -> Self {
        Self { max_velocity, max_acceleration }
    }

    /// Whether the profile can plan any motion under these limits.
    pub fn is_valid(&self) -> bool {
        self.max_velocity.is_finite()
            && self.max_acceleration.is_finite()
            && self.max_velocity > 0.0
            && self.max_acceleration > 0.0
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the state reached `dt` seconds after `current` while moving
/// towards `goal` under `constraints`.
///
/// - If the profile would reach the goal within `dt` the goal is returned
///   unchanged.
/// - A current velocity above the limit is clamped to the limit before
///   planning.
/// - A current velocity towards the goal which cannot be stopped within the
///   remaining distance is braked at the acceleration limit, overshooting
///   the goal.
/// - Constraints which are zero, negative or non-finite cannot plan any
///   motion, so the current position is held with zero velocity.
pub fn calculate(
    dt: f64,
    current: &ProfileState,
    goal: &ProfileState,
    constraints: &Constraints
) -> ProfileState {

    if !constraints.is_valid() {
        warn!(
            "Invalid profile constraints (v: {}, a: {}), holding position",
            constraints.max_velocity,
            constraints.max_acceleration
        );
        return ProfileState::new(current.position, 0.0);
    }

    let max_v = constraints.max_velocity;
    let max_a = constraints.max_acceleration;

    // Plan in a frame where the goal is always in the positive direction
    let direction = if current.position > goal.position { -1.0 } else { 1.0 };
    let mut current = current.directed(direction);
    let goal = goal.directed(direction);

    if current.velocity.abs() > max_v {
        current.velocity = max_v.copysign(current.velocity);
    }

    // Truncation of the full rest-to-rest trapezoid at either end
    let cutoff_begin = current.velocity / max_a;
    let cutoff_dist_begin = cutoff_begin * cutoff_begin * max_a / 2.0;

    let cutoff_end = goal.velocity / max_a;
    let cutoff_dist_end = cutoff_end * cutoff_end * max_a / 2.0;

    let full_trapezoid_dist =
        cutoff_dist_begin + (goal.position - current.position) + cutoff_dist_end;
    let mut accel_time = max_v / max_a;
    let mut full_speed_dist = full_trapezoid_dist - accel_time * accel_time * max_a;

    // Triangular profile, never reaching the velocity limit
    if full_speed_dist < 0.0 {
        accel_time = (full_trapezoid_dist / max_a).sqrt();
        full_speed_dist = 0.0;
    }

    let end_accel = accel_time - cutoff_begin;
    let end_full_speed = end_accel + full_speed_dist / max_v;
    let end_decel = end_full_speed + accel_time - cutoff_end;

    let mut result = current;

    if end_accel < -OVERSHOOT_TIME_TOL_S {
        result.velocity = (current.velocity - dt * max_a).max(-max_v);
        result.position += (current.velocity + result.velocity) / 2.0 * dt;
    }
    else if dt < end_accel {
        result.velocity += dt * max_a;
        result.position += (current.velocity + dt * max_a / 2.0) * dt;
    }
    else if dt < end_full_speed {
        result.velocity = max_v;
        result.position += (current.velocity + end_accel * max_a / 2.0) * end_accel
            + max_v * (dt - end_accel);
    }
    else if dt <= end_decel {
        let time_left = end_decel - dt;
        result.velocity = goal.velocity + time_left * max_a;
        result.position = goal.position
            - (goal.velocity + time_left * max_a / 2.0) * time_left;
    }
    else {
        result = goal;
    }

    result.directed(direction)
}
