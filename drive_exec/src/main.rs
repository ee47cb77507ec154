//! # Drive executable
//!
//! Runs pose control against a simulated holonomic base, driving it from a
//! start pose to a target pose. The base integrates exactly what it is
//! commanded, which makes this a quick way to try out tuning before putting
//! it on the robot.
//!
//! Each cycle's status report is archived under the session directory, along
//! with a summary of the run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::{
    cell::RefCell,
    rc::Rc,
    thread,
    time::{Duration, Instant}
};
use color_eyre::{
    eyre::{eyre, WrapErr},
    Result
};
use log::{debug, info, warn};
use serde::Serialize;
use structopt::StructOpt;

// Internal
use drive_lib::{
    drive_ctrl::{ChassisSpeeds, DriveActuator},
    loc::{FieldVelocity, Pose2},
    pose_ctrl::{
        self, ArchiveSink, LogSink, Params, PoseTracker, Tolerance, ToleranceOverride
    }
};
use util::{
    logger::{logger_init, LevelFilter},
    session::{self, Session},
    tunable::TunableStore
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "drive_exec", about = "Drive a simulated base to a target pose")]
struct Opts {
    /// Start pose as "x_m,y_m,heading_deg"
    #[structopt(long, default_value = "0,0,0", parse(try_from_str = parse_pose))]
    start: Pose2,

    /// Target pose as "x_m,y_m,heading_deg"
    #[structopt(long, parse(try_from_str = parse_pose))]
    target: Pose2,

    /// Maximum number of cycles to run for
    #[structopt(long, default_value = "500")]
    cycles: u64,

    /// Parameter file, relative to the parameters directory
    #[structopt(long)]
    params: Option<String>,

    /// Live-tune a parameter, as "pose_ctrl/<name>=<value>". May be repeated.
    #[structopt(long = "tune")]
    tune: Vec<String>,

    /// Finish within 5 in and 5 deg rather than the controller tolerances
    #[structopt(long)]
    loose_end: bool,

    /// Sleep to run the cycles in real time
    #[structopt(long)]
    realtime: bool,

    /// Log each cycle's status report instead of archiving it
    #[structopt(long)]
    no_archive: bool,

    /// Keep per-cycle controller traces in the log
    #[structopt(long)]
    trace_ctrl: bool
}

/// A base which does exactly as it is told.
#[derive(Debug, Default)]
struct SimDrive {
    pose: Pose2,
    speeds: ChassisSpeeds,
    num_cmds: u64
}

/// Summary of a run, saved into the session directory.
#[derive(Debug, Serialize)]
struct RunSummary {
    start: Pose2,
    target: Pose2,
    final_pose: Pose2,
    params: Params,
    end_tolerance: Tolerance,
    num_cycles: u64,
    num_cmds: u64,
    finished: bool,
    time_to_target_s: Option<f64>,
    translation_error_m: f64,
    heading_error_rad: f64
}

// ---------------------------------------------------------------------------
// MAIN
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    let session = Session::new("drive_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Debug, opts.trace_ctrl, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Drive Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let params = match opts.params {
        Some(ref path) => pose_ctrl::load_params(path)
            .wrap_err_with(|| format!("Could not load pose control params from {}", path))?,
        None => {
            info!("No parameter file given, using defaults");
            Params::default()
        }
    };

    let tunables = TunableStore::new();
    for assignment in opts.tune.iter() {
        tunables.apply_assignment(assignment)
            .wrap_err("Invalid tuning assignment")?;
    }

    // ---- MODULE INIT ----

    let sim = Rc::new(RefCell::new(SimDrive {
        pose: opts.start,
        ..Default::default()
    }));

    let pose_sim = sim.clone();
    let vel_sim = sim.clone();

    let mut tracker = PoseTracker::new(
        params.clone(),
        tunables,
        opts.target,
        move || pose_sim.borrow().pose,
        move || vel_sim.borrow().field_velocity(),
        sim.clone()
    );

    tracker = if opts.no_archive {
        tracker.with_telemetry(LogSink)
    }
    else {
        let sink = ArchiveSink::new(&session, "pose_ctrl.csv")
            .wrap_err("Failed to open the pose control archive")?;
        tracker.with_telemetry(sink)
    };

    tracker = if opts.loose_end {
        tracker.ending_at_target(ToleranceOverride::fixed_target())
    }
    else {
        tracker.ending_at_target(ToleranceOverride::default())
    };

    info!("PoseTracker init complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    tracker.start();

    let mut num_cycles = 0;
    let mut time_to_target_s = None;

    while num_cycles < opts.cycles {
        let cycle_start_instant = Instant::now();

        if tracker.tick(CYCLE_PERIOD_S).is_none() {
            return Err(eyre!("PoseTracker stopped issuing commands"));
        }

        sim.borrow_mut().step(CYCLE_PERIOD_S);
        num_cycles += 1;

        if tracker.is_finished() {
            let t = num_cycles as f64 * CYCLE_PERIOD_S;
            info!("Target reached after {} cycles ({:.2} s)", num_cycles, t);
            time_to_target_s = Some(t);
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        if opts.realtime {
            let cycle_dur = Instant::now() - cycle_start_instant;

            match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
                Some(d) => thread::sleep(d),
                None => warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                )
            }
        }
    }

    if time_to_target_s.is_none() {
        warn!("Target not reached within {} cycles", opts.cycles);
    }

    // ---- SHUTDOWN ----

    let translation_error_m = tracker.translation_error_m();
    let heading_error_rad = tracker.heading_error_rad();
    let end_tolerance = tracker.end_tolerance();

    tracker.stop();

    let final_pose = sim.borrow().pose;
    info!(
        "Final pose ({:.4}, {:.4}, {:.2} deg)",
        final_pose.x_m(), final_pose.y_m(), final_pose.heading().to_degrees()
    );

    let summary = RunSummary {
        start: opts.start,
        target: opts.target,
        final_pose,
        params,
        end_tolerance,
        num_cycles,
        num_cmds: sim.borrow().num_cmds,
        finished: time_to_target_s.is_some(),
        time_to_target_s,
        translation_error_m,
        heading_error_rad
    };
    session.save_json("summary.json", &summary)
        .wrap_err("Failed to save the run summary")?;

    info!("Run complete in {:.2} s", session::get_elapsed_seconds());

    Ok(())
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse a pose given as "x_m,y_m,heading_deg".
fn parse_pose(s: &str) -> Result<Pose2, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| format!("Invalid pose \"{}\": {}", s, e))?;

    match values.as_slice() {
        [x_m, y_m, heading_deg] => Ok(Pose2::new(*x_m, *y_m, heading_deg.to_radians())),
        _ => Err(format!("Expected a pose as \"x_m,y_m,heading_deg\", found \"{}\"", s))
    }
}

impl SimDrive {
    fn field_velocity(&self) -> FieldVelocity {
        self.speeds.to_field_relative(self.pose.heading())
    }

    /// Move the base on by `dt` seconds at the commanded speeds.
    fn step(&mut self, dt: f64) {
        let vel = self.field_velocity();

        self.pose = Pose2::from_parts(
            self.pose.position_m() + vel.linear_ms * dt,
            self.pose.heading() + vel.angular_rads * dt
        );
    }
}

impl DriveActuator for SimDrive {
    fn run_velocity(&mut self, velocity: &FieldVelocity, heading_rad: f64) {
        self.speeds = ChassisSpeeds::from_field_relative(velocity, heading_rad);
        self.num_cmds += 1;
    }

    fn stop(&mut self) {
        self.speeds = ChassisSpeeds::default();
    }
}
