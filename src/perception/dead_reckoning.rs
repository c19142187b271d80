//! Dead-reckoning pose estimation
//!
//! The rover carries no encoders or IMU; position and heading are
//! integrated purely from the displacements the motion primitives report
//! after each timed command. Nothing here reads hardware.

use nalgebra::distance;

use crate::common::types::{Displacement, WorldPoint};

/// Wrap a heading into [0, 360)
pub fn wrap_degrees(heading: f64) -> f64 {
    heading.rem_euclid(360.0)
}

/// The authoritative (x, y, heading) estimate for one navigation run.
///
/// Mutated only through [`apply_delta`](PoseEstimator::apply_delta) and
/// [`apply_turn`](PoseEstimator::apply_turn), called by the navigation
/// loop right after a motion primitive returns; never reconstructed from
/// sensor input. Heading is renormalized to [0, 360) on every update.
#[derive(Debug, Clone)]
pub struct PoseEstimator {
    position: WorldPoint,
    heading: f64,
}

impl PoseEstimator {
    /// Start a run at the origin with the given heading in degrees
    pub fn new(initial_heading: f64) -> Self {
        PoseEstimator {
            position: WorldPoint::origin(),
            heading: wrap_degrees(initial_heading),
        }
    }

    /// Current position estimate, meters
    pub fn position(&self) -> WorldPoint {
        self.position
    }

    /// Current heading estimate in [0, 360) degrees
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Integrate a displacement reported by a translation primitive
    pub fn apply_delta(&mut self, delta: Displacement) {
        self.position += delta;
    }

    /// Record the heading a turn primitive reports
    pub fn apply_turn(&mut self, new_heading: f64) {
        self.heading = wrap_degrees(new_heading);
    }

    /// Euclidean distance from the current position to a target, meters
    pub fn distance_to(&self, target: &WorldPoint) -> f64 {
        distance(&self.position, target)
    }

    /// Bearing from the current position to a target, degrees.
    ///
    /// Raw `atan2`, deliberately not normalized; the caller computes a
    /// minimal signed turn from it.
    pub fn heading_to(&self, target: &WorldPoint) -> f64 {
        let delta = target - self.position;
        delta.y.atan2(delta.x).to_degrees()
    }
}
