//! # Drive control interface
//!
//! The actuator abstraction which realises commanded velocities on the
//! drivetrain, and the robot-relative velocity type drivetrains consume.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::cell::RefCell;
use std::rc::Rc;
use nalgebra::{Rotation2, Vector2};
use serde::Serialize;

// Internal
use crate::loc::FieldVelocity;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Velocity of the base expressed in its own body frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct ChassisSpeeds {
    /// Forward speed.
    ///
    /// Units: meters/second
    pub vx_ms: f64,

    /// Leftward speed.
    ///
    /// Units: meters/second
    pub vy_ms: f64,

    /// Rotational rate, positive anticlockwise.
    ///
    /// Units: radians/second
    pub omega_rads: f64
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A drivetrain able to execute velocity commands.
pub trait DriveActuator {
    /// Execute the given Field-relative velocity. `heading_rad` is the
    /// measured heading the command was computed against, for drivetrains
    /// which need to rotate it into their own frame.
    fn run_velocity(&mut self, velocity: &FieldVelocity, heading_rad: f64);

    /// Bring the drivetrain to a stop.
    fn stop(&mut self);
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ChassisSpeeds {
    /// Convert a Field-relative velocity into the body frame of a base with
    /// the given heading.
    pub fn from_field_relative(velocity: &FieldVelocity, heading_rad: f64) -> Self {
        let body = velocity.linear_in_body(heading_rad);

        Self {
            vx_ms: body[0],
            vy_ms: body[1],
            omega_rads: velocity.angular_rads
        }
    }

    /// Convert back into the Field frame given the base's heading.
    pub fn to_field_relative(&self, heading_rad: f64) -> FieldVelocity {
        FieldVelocity::new(
            Rotation2::new(heading_rad) * Vector2::new(self.vx_ms, self.vy_ms),
            self.omega_rads
        )
    }
}

impl<T> DriveActuator for Rc<RefCell<T>>
where
    T: DriveActuator
{
    fn run_velocity(&mut self, velocity: &FieldVelocity, heading_rad: f64) {
        self.borrow_mut().run_velocity(velocity, heading_rad)
    }

    fn stop(&mut self) {
        self.borrow_mut().stop()
    }
}
