//! # Pose control telemetry
//!
//! Sinks which receive the tracker's status report every cycle. The tracker
//! works the same with or without a sink attached.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::path::Path;
use log::{trace, warn};
use serde::Serialize;

// Internal
use super::StatusReport;
use util::{
    archive::{ArchiveError, Archiver},
    session::{self, Session}
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Writes each status report as a row of a CSV archive.
pub struct ArchiveSink {
    archiver: Archiver,

    num_records: u64
}

/// Writes each status report to the log at `TRACE`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogSink;

/// Flat form of the status report, one CSV column per field.
#[derive(Debug, Serialize)]
struct ArchiveRecord {
    time_s: f64,
    record: u64,
    pose_x_m: f64,
    pose_y_m: f64,
    pose_head_rad: f64,
    target_x_m: f64,
    target_y_m: f64,
    target_head_rad: f64,
    setpoint_x_m: f64,
    setpoint_y_m: f64,
    setpoint_head_rad: f64,
    distance_measured_m: f64,
    distance_setpoint_m: f64,
    velocity_setpoint_ms: f64,
    head_error_rad: f64,
    head_goal_rate_rads: f64,
    head_setpoint_rate_rads: f64,
    linear_ff_scalar: f64,
    head_ff_scalar: f64,
    linear_interp: f64,
    angular_interp: f64,
    override_reset: bool,
    cmd_vx_ms: f64,
    cmd_vy_ms: f64,
    cmd_omega_rads: f64
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A consumer of pose control telemetry.
pub trait TelemetrySink {
    /// Record the report from the latest cycle.
    fn record(&mut self, report: &StatusReport);

    /// Tracking has stopped, any displayed setpoint or target is stale.
    fn clear(&mut self);
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArchiveSink {
    /// Create a sink archiving into a path relative to the session's archive
    /// root.
    pub fn new(session: &Session, path: &str) -> Result<Self, ArchiveError> {
        Ok(Self {
            archiver: Archiver::from_path(session, path)?,
            num_records: 0
        })
    }

    /// Create a sink archiving into the given file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        Ok(Self {
            archiver: Archiver::create(path)?,
            num_records: 0
        })
    }

    /// Number of reports archived so far.
    pub fn num_records(&self) -> u64 {
        self.num_records
    }
}

impl TelemetrySink for ArchiveSink {
    fn record(&mut self, report: &StatusReport) {
        let record = ArchiveRecord::from_report(report, self.num_records);

        match self.archiver.serialise(record) {
            Ok(_) => self.num_records += 1,
            Err(e) => warn!("Could not archive pose control report: {}", e)
        }
    }

    // Rows are never removed from the archive, the gap in records marks the
    // stop.
    fn clear(&mut self) {}
}

impl TelemetrySink for LogSink {
    fn record(&mut self, report: &StatusReport) {
        trace!(
            "PoseCtrl: dist {:.4} m (sp {:.4} m, {:.3} m/s), head err {:.4} rad, \
            cmd ({:.3}, {:.3}, {:.3})",
            report.distance_measured_m,
            report.distance_setpoint_m,
            report.velocity_setpoint_ms,
            report.head_error_rad,
            report.cmd.linear_ms[0],
            report.cmd.linear_ms[1],
            report.cmd.angular_rads
        );
    }

    fn clear(&mut self) {
        trace!("PoseCtrl: telemetry cleared");
    }
}

impl ArchiveRecord {
    fn from_report(report: &StatusReport, record: u64) -> Self {
        Self {
            time_s: session::get_elapsed_seconds(),
            record,
            pose_x_m: report.measured_pose.x_m(),
            pose_y_m: report.measured_pose.y_m(),
            pose_head_rad: report.measured_pose.heading(),
            target_x_m: report.target_pose.x_m(),
            target_y_m: report.target_pose.y_m(),
            target_head_rad: report.target_pose.heading(),
            setpoint_x_m: report.setpoint_pose.x_m(),
            setpoint_y_m: report.setpoint_pose.y_m(),
            setpoint_head_rad: report.setpoint_pose.heading(),
            distance_measured_m: report.distance_measured_m,
            distance_setpoint_m: report.distance_setpoint_m,
            velocity_setpoint_ms: report.velocity_setpoint_ms,
            head_error_rad: report.head_error_rad,
            head_goal_rate_rads: report.head_goal_rate_rads,
            head_setpoint_rate_rads: report.head_setpoint_rate_rads,
            linear_ff_scalar: report.linear_ff_scalar,
            head_ff_scalar: report.head_ff_scalar,
            linear_interp: report.linear_interp,
            angular_interp: report.angular_interp,
            override_reset: report.override_reset,
            cmd_vx_ms: report.cmd.linear_ms[0],
            cmd_vy_ms: report.cmd.linear_ms[1],
            cmd_omega_rads: report.cmd.angular_rads
        }
    }
}
