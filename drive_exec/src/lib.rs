//! # Drive control library.
//!
//! This library allows the executable, tests and benchmarks to access the
//! pose control items defined inside the drive crate.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Localisation interfaces - poses, velocities, and where they come from
pub mod loc;

/// Drive control interface - realises commanded velocities on the drivetrain
pub mod drive_ctrl;

/// Pose control module - drives the base to a target pose
pub mod pose_ctrl;
