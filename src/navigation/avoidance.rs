//! Escalating obstacle avoidance
//!
//! Entered when the filtered range drops below the obstacle threshold.
//! Strategies run in a fixed order with per-strategy attempt caps:
//! strafe left, strafe right, then back up and turn onto a new approach
//! vector. The escalation keeps no memory between invocations; every new
//! obstruction starts again at strafe-left.

use log::{info, warn};

use crate::config::CalibrationParams;
use crate::error::NavError;
use crate::navigation::motion::MotionPrimitives;
use crate::navigation::range::RangeFilter;
use crate::perception::dead_reckoning::wrap_degrees;
use crate::perception::PoseEstimator;

/// Result of one avoidance invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvoidanceOutcome {
    /// The path ahead reads clear again; one forward step was already taken
    Cleared,
    /// Every strategy ran out of attempts without clearing the path
    Exhausted,
}

/// Recovery strategies in escalation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    StrafeLeft,
    StrafeRight,
    BackupAndTurn,
}

/// Run the escalation until the path clears or every strategy is spent.
///
/// The pose is updated after every displacement so dead reckoning stays
/// consistent with whatever ground the avoidance covered.
pub fn avoid_obstacle(
    motion: &mut MotionPrimitives,
    range: &mut RangeFilter,
    pose: &mut PoseEstimator,
    params: &CalibrationParams,
) -> Result<AvoidanceOutcome, NavError> {
    info!("obstacle detected, attempting to navigate around");

    let mut strategy = Strategy::StrafeLeft;
    loop {
        match strategy {
            Strategy::StrafeLeft => {
                if strafe_until_clear(motion, range, pose, params, 90.0)? {
                    break;
                }
                warn!("left strafing failed to clear obstacle, trying right");
                strategy = Strategy::StrafeRight;
            }
            Strategy::StrafeRight => {
                if strafe_until_clear(motion, range, pose, params, -90.0)? {
                    break;
                }
                warn!("strafing failed, backing up and trying a new approach");
                strategy = Strategy::BackupAndTurn;
            }
            Strategy::BackupAndTurn => {
                let backup_heading = wrap_degrees(pose.heading() + 180.0);
                let delta = motion.advance(params.backup_distance, backup_heading)?;
                pose.apply_delta(delta);

                let new_heading = motion.turn(params.escape_turn, pose.heading())?;
                pose.apply_turn(new_heading);
                break;
            }
        }
    }

    // Consolidate any recovered clearance with one forward step before
    // handing control back to the approach loop.
    if range.read_distance()? >= params.clear_threshold {
        let delta = motion.advance(params.forward_step, pose.heading())?;
        pose.apply_delta(delta);
        Ok(AvoidanceOutcome::Cleared)
    } else {
        Ok(AvoidanceOutcome::Exhausted)
    }
}

/// Step sideways at `offset_deg` from the current heading until the path
/// clears or the attempt cap is hit. Returns whether the path cleared.
fn strafe_until_clear(
    motion: &mut MotionPrimitives,
    range: &mut RangeFilter,
    pose: &mut PoseEstimator,
    params: &CalibrationParams,
    offset_deg: f64,
) -> Result<bool, NavError> {
    let strafe_heading = wrap_degrees(pose.heading() + offset_deg);

    let mut attempts = 0;
    while attempts < params.max_strafe_attempts {
        if range.read_distance()? >= params.clear_threshold {
            return Ok(true);
        }
        let delta = motion.strafe(params.strafe_step, strafe_heading)?;
        pose.apply_delta(delta);
        attempts += 1;
    }

    // One last look after the final sidestep
    Ok(range.read_distance()? >= params.clear_threshold)
}
