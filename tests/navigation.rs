//! End-to-end navigation scenarios against mock hardware
//!
//! The mock clock removes all real delays, so entire runs execute in
//! microseconds while preserving the command sequence the drivetrain
//! would see.

use approx::assert_relative_eq;
use rover_core::navigation::motion::MotionPrimitives;
use rover_core::perception::PoseEstimator;
use rover_core::{
    CalibrationParams, CancelToken, Clock, Drivetrain, HardwareError, MotionCommand, NavError,
    NavOutcome, Navigator, RangeSensor,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Drivetrain that records every command it receives
#[derive(Default)]
struct RecordingDrivetrain {
    commands: Arc<Mutex<Vec<MotionCommand>>>,
}

impl RecordingDrivetrain {
    fn log(&self) -> Arc<Mutex<Vec<MotionCommand>>> {
        Arc::clone(&self.commands)
    }
}

impl Drivetrain for RecordingDrivetrain {
    fn set_motion(&mut self, command: MotionCommand) -> Result<(), HardwareError> {
        self.commands.lock().unwrap().push(command);
        Ok(())
    }
}

/// Sonar replaying scripted millimeter samples, repeating the final value
/// once the script runs out
struct ScriptedSonar {
    samples: VecDeque<f64>,
    last: f64,
}

impl ScriptedSonar {
    fn new(samples: Vec<f64>, last: f64) -> Self {
        ScriptedSonar {
            samples: samples.into(),
            last,
        }
    }

    fn always(value: f64) -> Self {
        Self::new(Vec::new(), value)
    }
}

impl RangeSensor for ScriptedSonar {
    fn get_distance(&mut self) -> Result<f64, HardwareError> {
        Ok(self.samples.pop_front().unwrap_or(self.last))
    }
}

/// Clock that only honors cancellation, never actually waits
struct InstantClock;

impl Clock for InstantClock {
    fn sleep(&self, _duration: Duration, cancel: &CancelToken) -> Result<(), NavError> {
        cancel.checkpoint()
    }
}

/// Clock that fires the run's cancel token after a fixed number of waits
struct CancellingClock {
    remaining: Mutex<u32>,
}

impl CancellingClock {
    fn after(waits: u32) -> Self {
        CancellingClock {
            remaining: Mutex::new(waits),
        }
    }
}

impl Clock for CancellingClock {
    fn sleep(&self, _duration: Duration, cancel: &CancelToken) -> Result<(), NavError> {
        let mut remaining = self.remaining.lock().unwrap();
        if *remaining == 0 {
            cancel.cancel();
        } else {
            *remaining -= 1;
        }
        cancel.checkpoint()
    }
}

fn navigator(sonar: ScriptedSonar) -> (Navigator, Arc<Mutex<Vec<MotionCommand>>>) {
    let drivetrain = RecordingDrivetrain::default();
    let log = drivetrain.log();
    let nav = Navigator::with_clock(
        Box::new(drivetrain),
        Box::new(sonar),
        CalibrationParams::default(),
        Arc::new(InstantClock),
    );
    (nav, log)
}

#[test]
fn direct_path_converges_on_the_target() {
    // Sensor always reads 2.0 m, so the loop only ever steps forward
    let (mut nav, log) = navigator(ScriptedSonar::always(2000.0));

    let outcome = nav.navigate(0.0, 3.0).unwrap();
    assert_eq!(outcome, NavOutcome::Reached);
    assert!(outcome.is_reached());

    let commands = log.lock().unwrap();
    // Target sits straight ahead at the initial 90 degree heading, so the
    // rover never turns and every translation runs along heading 90
    assert!(commands
        .iter()
        .all(|c| c.angular_speed.is_none() || c.angular_speed == Some(0.0)));
    assert!(commands
        .iter()
        .all(|c| c.heading.is_none() || c.heading == Some(90.0)));
    // Safety stop after the run
    assert!(commands.last().unwrap().is_halt());
}

#[test]
fn blocked_path_strafes_left_then_resumes() {
    // Five obstacle checks (three samples each) read 0.1 m, everything
    // afterwards reads 0.5 m: one front check plus four strafe-left checks,
    // then the path clears
    let (mut nav, log) = navigator(ScriptedSonar::new(vec![100.0; 15], 500.0));

    let outcome = nav.navigate(0.0, 3.0).unwrap();
    assert_eq!(outcome, NavOutcome::Reached);

    let commands = log.lock().unwrap();
    // Strafe-left runs perpendicular to the 90 degree heading
    let left_strafes = commands
        .iter()
        .filter(|c| c.heading == Some(180.0))
        .count();
    assert_eq!(left_strafes, 4);
    // Forward progress resumed after the obstacle
    assert!(commands.iter().any(|c| c.heading == Some(90.0)));
    assert!(commands.last().unwrap().is_halt());
}

#[test]
fn unresolvable_obstruction_abandons_within_budget() {
    // 0.05 m forever: every avoidance invocation exhausts all three
    // strategies and the run must still terminate at the approach budget
    let (mut nav, log) = navigator(ScriptedSonar::always(50.0));

    let outcome = nav.navigate(0.0, 3.0).unwrap();
    assert_eq!(outcome, NavOutcome::Abandoned);

    let commands = log.lock().unwrap();
    assert!(commands.last().unwrap().is_halt());
    // Escalation ran: both strafe budgets were spent at least once
    assert!(commands.iter().any(|c| c.heading == Some(180.0)));
    assert!(commands.iter().any(|c| c.heading == Some(0.0)));
}

#[test]
fn cancellation_stops_the_rover_mid_run() {
    let drivetrain = RecordingDrivetrain::default();
    let log = drivetrain.log();
    let mut nav = Navigator::with_clock(
        Box::new(drivetrain),
        Box::new(ScriptedSonar::always(2000.0)),
        CalibrationParams::default(),
        Arc::new(CancellingClock::after(10)),
    );

    let result = nav.navigate(0.0, 3.0);
    assert!(matches!(result, Err(NavError::Cancelled)));

    // The rover must not be left with a non-zero commanded velocity
    let commands = log.lock().unwrap();
    assert!(commands.last().unwrap().is_halt());
}

#[test]
fn pre_cancelled_token_aborts_before_any_motion() {
    let drivetrain = RecordingDrivetrain::default();
    let log = drivetrain.log();
    let mut nav = Navigator::with_clock(
        Box::new(drivetrain),
        Box::new(ScriptedSonar::always(2000.0)),
        CalibrationParams::default(),
        Arc::new(InstantClock),
    );
    nav.cancel_token().cancel();

    let result = nav.navigate(0.0, 3.0);
    assert!(matches!(result, Err(NavError::Cancelled)));

    let commands = log.lock().unwrap();
    // Only the exit safety stop reached the drivetrain
    assert!(commands.iter().all(|c| c.is_halt()));
    assert!(commands.last().unwrap().is_halt());
}

#[test]
fn dead_reckoning_matches_closed_form() {
    // Pure dead reckoning: a fixed sequence of turns and moves must land
    // exactly on the analytic sum of the reported deltas
    let params = CalibrationParams::default();
    let drivetrain = RecordingDrivetrain::default();
    let mut motion = MotionPrimitives::new(
        Box::new(drivetrain),
        Arc::new(InstantClock),
        CancelToken::new(),
        params.clone(),
    );
    let mut pose = PoseEstimator::new(params.initial_heading);

    let script: [(f64, f64); 3] = [(0.0, 0.5), (-90.0, 0.3), (45.0, 0.2)];
    let mut expected_x = 0.0;
    let mut expected_y = 0.0;
    let mut expected_heading = params.initial_heading;

    for (angle, distance) in script {
        let new_heading = motion.turn(angle, pose.heading()).unwrap();
        pose.apply_turn(new_heading);
        let delta = motion.advance(distance, pose.heading()).unwrap();
        pose.apply_delta(delta);

        expected_heading = (expected_heading + angle).rem_euclid(360.0);
        expected_x += distance * expected_heading.to_radians().cos();
        expected_y += distance * expected_heading.to_radians().sin();
    }

    assert_relative_eq!(pose.position().x, expected_x);
    assert_relative_eq!(pose.position().y, expected_y);
    assert_relative_eq!(pose.heading(), expected_heading);
}
