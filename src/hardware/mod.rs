//! Hardware collaborator interfaces
//!
//! The navigation core never touches GPIO or device drivers directly; it
//! drives these narrow traits. Production wires them to the mecanum
//! drivetrain and the ultrasonic sonar, while tests and the simulator
//! supply mocks.

use crate::error::HardwareError;

/// A velocity command for the drivetrain.
///
/// Each axis is optional: an unset axis keeps whatever was previously
/// commanded on it. Commands persist until superseded, so a follow-up
/// `speed(0.0)` stops translation while leaving heading state alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionCommand {
    /// Linear speed setting (0-100)
    pub speed: Option<f64>,
    /// Translation heading in degrees
    pub heading: Option<f64>,
    /// Angular speed setting (-100..100), positive turns counter-clockwise
    pub angular_speed: Option<f64>,
}

impl MotionCommand {
    /// A command that leaves every axis unchanged
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the linear speed axis
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set the translation heading axis
    pub fn heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Set the angular speed axis
    pub fn angular_speed(mut self, angular_speed: f64) -> Self {
        self.angular_speed = Some(angular_speed);
        self
    }

    /// Zero the linear and angular axes.
    ///
    /// This is the safety stop issued on every run exit, normal or not.
    pub fn halt() -> Self {
        MotionCommand::new().speed(0.0).angular_speed(0.0)
    }

    /// True when both driven axes are commanded to zero
    pub fn is_halt(&self) -> bool {
        self.speed == Some(0.0) && self.angular_speed == Some(0.0)
    }
}

/// Motion actuation collaborator.
///
/// The drivetrain executes a command asynchronously until the next one
/// arrives; the caller owns all timing.
pub trait Drivetrain: Send {
    /// Issue a velocity command
    fn set_motion(&mut self, command: MotionCommand) -> Result<(), HardwareError>;
}

/// Range sensing collaborator
pub trait RangeSensor: Send {
    /// One raw range sample in millimeters
    fn get_distance(&mut self) -> Result<f64, HardwareError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_axes_stay_unset() {
        let cmd = MotionCommand::new().speed(50.0);
        assert_eq!(cmd.speed, Some(50.0));
        assert_eq!(cmd.heading, None);
        assert_eq!(cmd.angular_speed, None);
    }

    #[test]
    fn halt_zeroes_driven_axes() {
        let cmd = MotionCommand::halt();
        assert!(cmd.is_halt());
        assert_eq!(cmd.heading, None);
    }
}
