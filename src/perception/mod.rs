//! Perception module for the rover
pub mod dead_reckoning;

pub use dead_reckoning::PoseEstimator;
