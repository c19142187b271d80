//! Error types for the rover core

use thiserror::Error;

/// Faults reported by the hardware collaborators
#[derive(Error, Debug)]
pub enum HardwareError {
    /// The drivetrain rejected or failed to execute a motion command
    #[error("drivetrain command failed: {0}")]
    Drivetrain(String),

    /// A single range sample failed; the distance filter recovers from
    /// these locally and never propagates them
    #[error("sonar read failed: {0}")]
    Sonar(String),
}

/// Errors that abort a navigation run
///
/// An exhausted approach budget is not an error; it surfaces as
/// [`crate::navigation::NavOutcome::Abandoned`]. Whatever the exit path,
/// the drivetrain is commanded to zero velocity before the run returns.
#[derive(Error, Debug)]
pub enum NavError {
    /// An external shutdown request arrived
    #[error("navigation cancelled")]
    Cancelled,

    /// A drivetrain fault that cannot be recovered locally
    #[error(transparent)]
    Hardware(#[from] HardwareError),
}
