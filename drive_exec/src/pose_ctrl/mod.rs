//! # Pose control module
//!
//! Pose control drives a holonomic base from wherever it currently is to a
//! target pose on the Field, with the target allowed to move while the base
//! is driving.
//!
//! Translation and heading are controlled separately. Translation uses a
//! trapezoidal motion profile on the straight line distance to the target,
//! with a PD controller pulling the measured distance onto the profile
//! setpoint. Heading uses a profiled PD controller on the wrapped heading
//! error. Close to the target the profile velocity feedforward is faded out
//! so the feedback alone settles the base without overshoot.
//!
//! The setpoint carried between cycles is always laid back onto the line
//! from the target to the base. If the base is pushed off the line, or the
//! target moves, the next cycle replans from in line with the base rather
//! than chasing a stale setpoint.
//!
//! A driver can nudge the base on top of the autonomous command. Input is
//! blended per axis, and large input restarts the profiles from the measured
//! state once the driver lets go.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
pub mod driver_ff;
pub mod params;
pub mod profile;
pub mod state;
pub mod telemetry;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use thiserror::Error;

// Internal
pub use controllers::*;
pub use driver_ff::{DriverFeedforward, NoDriverInput, OverrideBlend};
pub use params::Params;
pub use profile::{Constraints, ProfileState};
pub use state::*;
pub use telemetry::{ArchiveSink, LogSink, TelemetrySink};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while setting up pose control.
#[derive(Debug, Error)]
pub enum PoseCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load pose control parameters from a file in the parameters directory.
pub fn load_params(param_file_path: &str) -> Result<Params, PoseCtrlError> {
    util::params::load(param_file_path).map_err(PoseCtrlError::ParamLoadError)
}
