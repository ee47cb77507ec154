//! # Driver feedforward
//!
//! Manual driver input blended on top of the autonomous command. Inputs are
//! normalised to [-1, 1] of the platform's maximum speed. Half of full scale
//! on an axis hands that axis entirely to the driver.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use crate::loc::FieldVelocity;
use util::maths::{clamp, lerp};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A driver feedforward source which never gives any input.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoDriverInput;

/// The result of blending driver input with the autonomous command.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct OverrideBlend {
    /// The velocity to command
    pub velocity: FieldVelocity,

    /// How much of the translational command came from the driver, [0, 1]
    pub linear_interp: f64,

    /// How much of the rotational command came from the driver, [0, 1]
    pub angular_interp: f64
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Source of normalised driver input in the Field frame.
pub trait DriverFeedforward {
    /// Translational input, each component in [-1, 1].
    fn linear(&self) -> Vector2<f64>;

    /// Rotational input in [-1, 1].
    fn angular(&self) -> f64;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriverFeedforward for NoDriverInput {
    fn linear(&self) -> Vector2<f64> {
        Vector2::zeros()
    }

    fn angular(&self) -> f64 {
        0.0
    }
}

/// A pair of closures can act as driver input, the first for translation
/// and the second for rotation.
impl<L, A> DriverFeedforward for (L, A)
where
    L: Fn() -> Vector2<f64>,
    A: Fn() -> f64
{
    fn linear(&self) -> Vector2<f64> {
        (self.0)()
    }

    fn angular(&self) -> f64 {
        (self.1)()
    }
}

impl OverrideBlend {
    /// Whether the driver took enough control on either axis that the
    /// autonomous profiles no longer describe the motion.
    pub fn requires_reset(&self, threshold: f64) -> bool {
        self.linear_interp >= threshold || self.angular_interp >= threshold
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Blend the autonomous command with driver input, independently per axis.
pub fn blend(
    auto: &FieldVelocity,
    input_linear: Vector2<f64>,
    input_angular: f64,
    max_linear_speed_ms: f64,
    max_angular_speed_rads: f64
) -> OverrideBlend {
    let linear_interp = clamp(&(input_linear.norm() * 2.0), &0.0, &1.0);
    let angular_interp = clamp(&(input_angular.abs() * 2.0), &0.0, &1.0);

    let driver_linear = input_linear * max_linear_speed_ms;
    let linear_ms = auto.linear_ms + (driver_linear - auto.linear_ms) * linear_interp;

    let angular_rads = lerp(
        auto.angular_rads,
        input_angular * max_angular_speed_rads,
        angular_interp
    );

    OverrideBlend {
        velocity: FieldVelocity::new(linear_ms, angular_rads),
        linear_interp,
        angular_interp
    }
}
