//! Core navigation functionality for a holonomic mecanum rover
//!
//! Drives the rover toward a target point expressed in a local Cartesian
//! frame, using dead-reckoned pose estimation, noise-filtered ultrasonic
//! ranging, timed open-loop motion primitives, and an escalating
//! obstacle-avoidance strategy. Hardware is reached only through the narrow
//! traits in [`hardware`], so the whole controller runs unchanged against a
//! real drivetrain, a simulator, or test mocks.

pub mod common;
pub mod config;
pub mod error;
pub mod hardware;
pub mod navigation;
pub mod perception;
pub mod runtime;

pub use config::CalibrationParams;
pub use error::{HardwareError, NavError};
pub use hardware::{Drivetrain, MotionCommand, RangeSensor};
pub use navigation::{NavOutcome, Navigator};
pub use runtime::{CancelToken, Clock, SystemClock};
