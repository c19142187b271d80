//! Navigation module for the rover
//!
//! [`Navigator`] owns the hardware interfaces for the duration of a run and
//! drives the target-seeking loop: align with the bearing to the target,
//! check for obstacles, advance by a bounded step, integrate the resulting
//! pose delta, repeat. The loop is synchronous by design; timed waits are
//! the only motion feedback the rover has.

pub mod avoidance;
pub mod motion;
pub mod range;

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use self::avoidance::{avoid_obstacle, AvoidanceOutcome};
use self::motion::MotionPrimitives;
use self::range::RangeFilter;
use crate::common::types::WorldPoint;
use crate::config::CalibrationParams;
use crate::error::NavError;
use crate::hardware::{Drivetrain, RangeSensor};
use crate::perception::PoseEstimator;
use crate::runtime::{CancelToken, Clock, SystemClock};

/// Terminal state of one navigation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The rover ended within the target threshold
    Reached,
    /// The approach budget ran out before the target was reached
    Abandoned,
}

impl NavOutcome {
    /// True when the target was reached
    pub fn is_reached(&self) -> bool {
        matches!(self, NavOutcome::Reached)
    }
}

/// Target-seeking controller for a single rover
pub struct Navigator {
    motion: MotionPrimitives,
    range: RangeFilter,
    clock: Arc<dyn Clock>,
    cancel: CancelToken,
    params: CalibrationParams,
}

impl Navigator {
    /// Wire a navigator to hardware with the wall clock
    pub fn new(
        drivetrain: Box<dyn Drivetrain>,
        sonar: Box<dyn RangeSensor>,
        params: CalibrationParams,
    ) -> Self {
        Self::with_clock(drivetrain, sonar, params, Arc::new(SystemClock))
    }

    /// Wire a navigator with an explicit time source
    pub fn with_clock(
        drivetrain: Box<dyn Drivetrain>,
        sonar: Box<dyn RangeSensor>,
        params: CalibrationParams,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cancel = CancelToken::new();
        Navigator {
            motion: MotionPrimitives::new(
                drivetrain,
                Arc::clone(&clock),
                cancel.clone(),
                params.clone(),
            ),
            range: RangeFilter::new(sonar, Arc::clone(&clock), cancel.clone(), params.clone()),
            clock,
            cancel,
            params,
        }
    }

    /// Token that aborts the current run when cancelled.
    ///
    /// Checked at every blocking wait, so a fired token interrupts even an
    /// in-progress timed motion.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Drive toward `(target_x, target_y)`, meters from the starting
    /// position.
    ///
    /// The run starts at the origin with the calibrated initial heading and
    /// ends when the rover is within the target threshold, the approach
    /// budget is spent, or the cancel token fires. The drivetrain is
    /// commanded to zero velocity before this returns, whatever the
    /// outcome.
    pub fn navigate(&mut self, target_x: f64, target_y: f64) -> Result<NavOutcome, NavError> {
        let target = WorldPoint::new(target_x, target_y);
        let mut pose = PoseEstimator::new(self.params.initial_heading);

        info!("navigating to target ({:.2}, {:.2})", target_x, target_y);
        let result = self.seek(&target, &mut pose);

        // Safety stop on every exit path, including cancellation
        if let Err(e) = self.motion.halt() {
            warn!("failed to stop drivetrain on exit: {}", e);
        }

        match &result {
            Ok(NavOutcome::Reached) => {
                info!("reached target ({:.2}, {:.2})", target_x, target_y)
            }
            Ok(NavOutcome::Abandoned) => warn!(
                "unable to reach target after {} attempts",
                self.params.max_approach_attempts
            ),
            Err(e) => warn!("navigation aborted: {}", e),
        }
        result
    }

    fn seek(
        &mut self,
        target: &WorldPoint,
        pose: &mut PoseEstimator,
    ) -> Result<NavOutcome, NavError> {
        for _ in 0..self.params.max_approach_attempts {
            if pose.distance_to(target) <= self.params.target_threshold {
                return Ok(NavOutcome::Reached);
            }

            // Align with the bearing to the target, taking the minimal turn
            let desired_heading = pose.heading_to(target);
            let turn_angle = minimal_turn(desired_heading, pose.heading());
            if turn_angle.abs() > self.params.heading_tolerance {
                let new_heading = self.motion.turn(turn_angle, pose.heading())?;
                pose.apply_turn(new_heading);
            }

            let front_distance = self.range.read_distance()?;
            if front_distance < self.params.obstacle_threshold {
                let outcome =
                    avoid_obstacle(&mut self.motion, &mut self.range, pose, &self.params)?;
                if outcome == AvoidanceOutcome::Exhausted {
                    // Bounded forward progress beats a permanent stall; the
                    // approach budget still guarantees termination.
                    warn!("avoidance exhausted, pushing forward anyway");
                    self.step_toward(target, pose)?;
                }
            } else {
                self.step_toward(target, pose)?;
            }

            info!(
                "position ({:.2}, {:.2}), heading {:.2} deg, {:.2} m to target",
                pose.position().x,
                pose.position().y,
                pose.heading(),
                pose.distance_to(target)
            );

            self.clock.sleep(
                Duration::from_secs_f64(self.params.loop_pause),
                &self.cancel,
            )?;
        }

        if pose.distance_to(target) <= self.params.target_threshold {
            return Ok(NavOutcome::Reached);
        }
        Ok(NavOutcome::Abandoned)
    }

    /// One bounded forward step, shortened near the target so the rover
    /// decelerates into it
    fn step_toward(
        &mut self,
        target: &WorldPoint,
        pose: &mut PoseEstimator,
    ) -> Result<(), NavError> {
        let remaining = pose.distance_to(target);
        let step = self.params.forward_step.min(remaining * 0.8);
        let delta = self.motion.advance(step, pose.heading())?;
        pose.apply_delta(delta);
        Ok(())
    }
}

/// Minimal signed turn from `current` to `desired`, in [-180, 180)
fn minimal_turn(desired: f64, current: f64) -> f64 {
    (desired - current + 180.0).rem_euclid(360.0) - 180.0
}
