//! Pose control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use util::tunable::TunableStore;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const INCH_M: f64 = 0.0254;

/// Track width of the drive base.
///
/// Units: meters
const TRACK_WIDTH_M: f64 = 17.5 * INCH_M;

/// Wheel base of the drive base.
///
/// Units: meters
const WHEEL_BASE_M: f64 = 15.5 * INCH_M;

/// Names of the live-tunable parameters in the `TunableStore`.
pub mod keys {
    pub const DRIVE_K_P: &str = "pose_ctrl/drive_k_p";
    pub const DRIVE_K_D: &str = "pose_ctrl/drive_k_d";
    pub const HEAD_K_P: &str = "pose_ctrl/head_k_p";
    pub const HEAD_K_D: &str = "pose_ctrl/head_k_d";
    pub const DRIVE_TOLERANCE_M: &str = "pose_ctrl/drive_tolerance_m";
    pub const HEAD_TOLERANCE_RAD: &str = "pose_ctrl/head_tolerance_rad";
    pub const DRIVE_MAX_VEL_MS: &str = "pose_ctrl/drive_max_vel_ms";
    pub const DRIVE_MAX_ACCEL_MSS: &str = "pose_ctrl/drive_max_accel_mss";
    pub const HEAD_MAX_VEL_RADS: &str = "pose_ctrl/head_max_vel_rads";
    pub const HEAD_MAX_ACCEL_RADSS: &str = "pose_ctrl/head_max_accel_radss";
    pub const SETPOINT_MIN_VEL_MS: &str = "pose_ctrl/setpoint_min_vel_ms";
    pub const MIN_DIST_VEL_CORRECTION_M: &str = "pose_ctrl/min_dist_vel_correction_m";
    pub const LINEAR_FF_MIN_RADIUS_M: &str = "pose_ctrl/linear_ff_min_radius_m";
    pub const LINEAR_FF_MAX_RADIUS_M: &str = "pose_ctrl/linear_ff_max_radius_m";
    pub const HEAD_FF_MIN_ERROR_RAD: &str = "pose_ctrl/head_ff_min_error_rad";
    pub const HEAD_FF_MAX_ERROR_RAD: &str = "pose_ctrl/head_ff_max_error_rad";
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for pose control.
///
/// Every field has a default, so a parameter file only needs to list the
/// values it changes.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Params {

    // ---- GAINS ----

    /// Distance controller proportional gain
    pub drive_k_p: f64,

    /// Distance controller derivative gain
    pub drive_k_d: f64,

    /// Heading controller proportional gain
    pub head_k_p: f64,

    /// Heading controller derivative gain
    pub head_k_d: f64,

    // ---- TOLERANCES ----

    /// Distance error under which the commanded speed is zeroed, and the
    /// default linear tolerance for reaching the target.
    ///
    /// Units: meters
    pub drive_tolerance_m: f64,

    /// Heading error under which the commanded rate is zeroed, and the
    /// default angular tolerance for reaching the target.
    ///
    /// Units: radians
    pub head_tolerance_rad: f64,

    // ---- PROFILE CONSTRAINTS ----

    /// Units: meters/second
    pub drive_max_vel_ms: f64,

    /// Units: meters/second^2
    pub drive_max_accel_mss: f64,

    /// Units: radians/second
    pub head_max_vel_rads: f64,

    /// Units: radians/second^2
    pub head_max_accel_radss: f64,

    // ---- SETPOINT CORRECTION ----

    /// The most negative (away from the target) setpoint speed fed into the
    /// distance profile.
    ///
    /// Units: meters/second
    pub setpoint_min_vel_ms: f64,

    /// Below this distance between the previous setpoint and the target the
    /// setpoint velocity is no longer projected onto the target direction.
    ///
    /// Units: meters
    pub min_dist_vel_correction_m: f64,

    // ---- FEEDFORWARD ----

    /// Distance error below which no profile feedforward is applied.
    ///
    /// Units: meters
    pub linear_ff_min_radius_m: f64,

    /// Distance error above which full profile feedforward is applied.
    ///
    /// Units: meters
    pub linear_ff_max_radius_m: f64,

    /// Heading error below which no profile feedforward is applied.
    ///
    /// Units: radians
    pub head_ff_min_error_rad: f64,

    /// Heading error above which full profile feedforward is applied.
    ///
    /// Units: radians
    pub head_ff_max_error_rad: f64,

    // ---- DRIVER OVERRIDE ----

    /// Override interpolation factor at or above which the profiles are
    /// restarted from the measured state.
    pub override_reset_threshold: f64,

    // ---- PLATFORM ----

    /// Speed commanded by a full scale driver input.
    ///
    /// Units: meters/second
    pub max_linear_speed_ms: f64,

    /// Rate commanded by a full scale driver input.
    ///
    /// Units: radians/second
    pub max_angular_speed_rads: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        let max_linear_speed_ms = 3.7;
        let drive_base_radius_m = (TRACK_WIDTH_M / 2.0).hypot(WHEEL_BASE_M / 2.0);

        Self {
            drive_k_p: 2.75,
            drive_k_d: 0.0,
            head_k_p: 2.5,
            head_k_d: 0.0,

            drive_tolerance_m: 0.4 * INCH_M,
            head_tolerance_rad: 1f64.to_radians(),

            drive_max_vel_ms: max_linear_speed_ms,
            drive_max_accel_mss: 5.0,
            head_max_vel_rads: 720f64.to_radians(),
            head_max_accel_radss: 500f64.to_radians(),

            setpoint_min_vel_ms: -0.5,
            min_dist_vel_correction_m: 0.4 * INCH_M,

            linear_ff_min_radius_m: 0.01,
            linear_ff_max_radius_m: 0.05,
            head_ff_min_error_rad: 0.0,
            head_ff_max_error_rad: 0.0,

            override_reset_threshold: 0.3,

            max_linear_speed_ms,
            max_angular_speed_rads: max_linear_speed_ms / drive_base_radius_m
        }
    }
}

impl Params {
    /// Return a copy of these parameters with any live-tuned values from
    /// `store` applied, using the values in `self` as defaults.
    pub fn with_overrides(&self, store: &TunableStore) -> Self {
        Self {
            drive_k_p: store.get(keys::DRIVE_K_P, self.drive_k_p),
            drive_k_d: store.get(keys::DRIVE_K_D, self.drive_k_d),
            head_k_p: store.get(keys::HEAD_K_P, self.head_k_p),
            head_k_d: store.get(keys::HEAD_K_D, self.head_k_d),
            drive_tolerance_m: store.get(keys::DRIVE_TOLERANCE_M, self.drive_tolerance_m),
            head_tolerance_rad: store.get(keys::HEAD_TOLERANCE_RAD, self.head_tolerance_rad),
            drive_max_vel_ms: store.get(keys::DRIVE_MAX_VEL_MS, self.drive_max_vel_ms),
            drive_max_accel_mss: store.get(keys::DRIVE_MAX_ACCEL_MSS, self.drive_max_accel_mss),
            head_max_vel_rads: store.get(keys::HEAD_MAX_VEL_RADS, self.head_max_vel_rads),
            head_max_accel_radss: store.get(keys::HEAD_MAX_ACCEL_RADSS, self.head_max_accel_radss),
            setpoint_min_vel_ms: store.get(keys::SETPOINT_MIN_VEL_MS, self.setpoint_min_vel_ms),
            min_dist_vel_correction_m: store.get(
                keys::MIN_DIST_VEL_CORRECTION_M, self.min_dist_vel_correction_m),
            linear_ff_min_radius_m: store.get(
                keys::LINEAR_FF_MIN_RADIUS_M, self.linear_ff_min_radius_m),
            linear_ff_max_radius_m: store.get(
                keys::LINEAR_FF_MAX_RADIUS_M, self.linear_ff_max_radius_m),
            head_ff_min_error_rad: store.get(keys::HEAD_FF_MIN_ERROR_RAD, self.head_ff_min_error_rad),
            head_ff_max_error_rad: store.get(keys::HEAD_FF_MAX_ERROR_RAD, self.head_ff_max_error_rad),
            ..self.clone()
        }
    }
}
