//! # Localisation interfaces
//!
//! Poses and velocities in the fixed Field frame, and the capabilities through
//! which the controller pulls them each cycle. The estimator that produces
//! them lives outside this crate; anything implementing `PoseSource` or
//! `VelocitySource` can stand in for it, including plain closures.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Rotation2, Vector2};
use serde::Serialize;

// Internal
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A 2D pose (position and heading) in the Field frame.
///
/// Heading is always held in the range (-pi, pi], with 0 along the Field +X
/// axis and positive anticlockwise.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Pose2 {
    /// Position in the Field frame.
    ///
    /// Units: meters
    position_m: Vector2<f64>,

    /// Heading relative to the Field +X axis.
    ///
    /// Units: radians
    heading_rad: f64
}

/// Velocity of the base expressed in the Field frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct FieldVelocity {
    /// Translational velocity.
    ///
    /// Units: meters/second,
    /// Frame: Field
    pub linear_ms: Vector2<f64>,

    /// Rotational rate about the vertical axis, positive anticlockwise.
    ///
    /// Units: radians/second
    pub angular_rads: f64
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Something which can provide a pose on demand, for instance the current
/// pose estimate or the target to drive to.
pub trait PoseSource {
    fn get_pose(&self) -> Pose2;
}

/// Something which can provide the current Field-relative velocity of the
/// base.
pub trait VelocitySource {
    fn get_field_velocity(&self) -> FieldVelocity;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose2 {
    /// Create a new pose, wrapping the heading into (-pi, pi].
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self::from_parts(Vector2::new(x_m, y_m), heading_rad)
    }

    /// Create a new pose from a position vector and a heading.
    pub fn from_parts(position_m: Vector2<f64>, heading_rad: f64) -> Self {
        Self {
            position_m,
            heading_rad: wrap_pi(heading_rad)
        }
    }

    pub fn position_m(&self) -> Vector2<f64> {
        self.position_m
    }

    pub fn x_m(&self) -> f64 {
        self.position_m[0]
    }

    pub fn y_m(&self) -> f64 {
        self.position_m[1]
    }

    /// Heading in the range (-pi, pi].
    pub fn heading(&self) -> f64 {
        self.heading_rad
    }
}

impl FieldVelocity {
    pub fn new(linear_ms: Vector2<f64>, angular_rads: f64) -> Self {
        Self { linear_ms, angular_rads }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate the translational part into the frame of a base with the given
    /// heading.
    pub fn linear_in_body(&self, heading_rad: f64) -> Vector2<f64> {
        Rotation2::new(-heading_rad) * self.linear_ms
    }

    pub fn is_zero(&self) -> bool {
        self.linear_ms == Vector2::zeros() && self.angular_rads == 0.0
    }
}

impl PoseSource for Pose2 {
    fn get_pose(&self) -> Pose2 {
        *self
    }
}

impl<F> PoseSource for F
where
    F: Fn() -> Pose2
{
    fn get_pose(&self) -> Pose2 {
        self()
    }
}

impl VelocitySource for FieldVelocity {
    fn get_field_velocity(&self) -> FieldVelocity {
        *self
    }
}

impl<F> VelocitySource for F
where
    F: Fn() -> FieldVelocity
{
    fn get_field_velocity(&self) -> FieldVelocity {
        self()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_pose_heading_wrapped() {
        let pose = Pose2::new(1.0, 2.0, 3.0 * PI / 2.0);
        assert!((pose.heading() + PI / 2.0).abs() < 1e-12);
        assert_eq!(pose.x_m(), 1.0);
        assert_eq!(pose.y_m(), 2.0);

        let pose = Pose2::new(0.0, 0.0, -PI);
        assert!((pose.heading() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_linear_in_body() {
        // Moving along Field +Y while facing +Y is straight ahead in the body
        let vel = FieldVelocity::new(Vector2::new(0.0, 2.0), 0.0);
        let body = vel.linear_in_body(PI / 2.0);
        assert!((body[0] - 2.0).abs() < 1e-12);
        assert!(body[1].abs() < 1e-12);
    }

    #[test]
    fn test_closure_sources() {
        let target = || Pose2::new(3.0, 0.0, 0.0);
        assert_eq!(target.get_pose(), Pose2::new(3.0, 0.0, 0.0));

        let fixed = Pose2::new(1.0, 1.0, 1.0);
        assert_eq!(fixed.get_pose(), fixed);

        let vel = || FieldVelocity::new(Vector2::new(0.5, 0.0), 0.1);
        assert_eq!(vel.get_field_velocity().angular_rads, 0.1);
    }
}
