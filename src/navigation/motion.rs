//! Timed open-loop motion primitives
//!
//! Rotation and translation run for a pre-computed duration derived from
//! the calibration record; nothing closes the loop against sensors. Each
//! primitive therefore reports the pose delta it is assumed to have
//! caused, which is the only input the dead-reckoning estimator gets.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::common::types::Displacement;
use crate::config::CalibrationParams;
use crate::error::NavError;
use crate::hardware::{Drivetrain, MotionCommand};
use crate::perception::dead_reckoning::wrap_degrees;
use crate::runtime::{CancelToken, Clock};

/// Turns below this are under the drivetrain's mechanical resolution, degrees
const MIN_TURN_ANGLE: f64 = 3.0;

/// Translations below this are within drivetrain slack, meters
const MIN_TRANSLATION: f64 = 0.01;

/// Executes velocity commands on the drivetrain for fixed durations
pub struct MotionPrimitives {
    drivetrain: Box<dyn Drivetrain>,
    clock: Arc<dyn Clock>,
    cancel: CancelToken,
    params: CalibrationParams,
}

impl MotionPrimitives {
    pub fn new(
        drivetrain: Box<dyn Drivetrain>,
        clock: Arc<dyn Clock>,
        cancel: CancelToken,
        params: CalibrationParams,
    ) -> Self {
        MotionPrimitives {
            drivetrain,
            clock,
            cancel,
            params,
        }
    }

    /// Rotate by `angle_deg` from `current_heading` and return the new
    /// heading, wrapped into [0, 360).
    ///
    /// Duration is linear in the requested angle (constant angular velocity
    /// assumption, calibrated per rover). Angles below the mechanical
    /// resolution are a no-op and issue no command.
    pub fn turn(&mut self, angle_deg: f64, current_heading: f64) -> Result<f64, NavError> {
        if angle_deg.abs() < MIN_TURN_ANGLE {
            return Ok(current_heading);
        }

        let direction = if angle_deg > 0.0 { 1.0 } else { -1.0 };
        let duration = angle_deg.abs() / 90.0 * self.params.turn_calibration;

        debug!(
            "turning {:.2} deg from heading {:.2} deg",
            angle_deg, current_heading
        );
        self.drivetrain.set_motion(
            MotionCommand::new().angular_speed(self.params.angular_speed * direction),
        )?;
        self.hold(duration)?;
        self.drivetrain
            .set_motion(MotionCommand::new().angular_speed(0.0))?;
        self.settle()?;

        Ok(wrap_degrees(current_heading + angle_deg))
    }

    /// Move `distance` meters along `heading` using the forward
    /// calibration ratio; returns the dead-reckoned displacement
    pub fn advance(&mut self, distance: f64, heading: f64) -> Result<Displacement, NavError> {
        self.translate(
            distance,
            self.params.forward_speed,
            self.params.actual_speed,
            heading,
        )
    }

    /// Move `distance` meters along `heading` using the strafe calibration
    /// ratio; lateral motion is mechanically slower than forward motion
    pub fn strafe(&mut self, distance: f64, heading: f64) -> Result<Displacement, NavError> {
        self.translate(
            distance,
            self.params.strafe_speed,
            self.params.actual_strafe_speed,
            heading,
        )
    }

    /// Zero the linear and angular axes
    pub fn halt(&mut self) -> Result<(), NavError> {
        self.drivetrain.set_motion(MotionCommand::halt())?;
        Ok(())
    }

    fn translate(
        &mut self,
        distance: f64,
        speed: f64,
        actual_speed: f64,
        heading: f64,
    ) -> Result<Displacement, NavError> {
        if distance < MIN_TRANSLATION {
            return Ok(Displacement::zeros());
        }

        let duration = distance / actual_speed;

        debug!("moving {:.2} m along heading {:.2} deg", distance, heading);
        self.drivetrain
            .set_motion(MotionCommand::new().speed(speed).heading(heading))?;
        self.hold(duration)?;
        self.drivetrain.set_motion(MotionCommand::new().speed(0.0))?;
        self.settle()?;

        // Displacement is computed from the commanded heading, not measured
        let rad = heading.to_radians();
        Ok(Displacement::new(distance * rad.cos(), distance * rad.sin()))
    }

    fn hold(&mut self, seconds: f64) -> Result<(), NavError> {
        self.clock
            .sleep(Duration::from_secs_f64(seconds), &self.cancel)
    }

    fn settle(&mut self) -> Result<(), NavError> {
        self.clock
            .sleep(Duration::from_secs_f64(self.params.settle_time), &self.cancel)
    }
}
