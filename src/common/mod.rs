//! Common utilities and types for the rover

/// Common types used across the codebase
pub mod types {
    use nalgebra::{Point2, Vector2};

    /// A 2D point in the rover's local world frame, meters
    pub type WorldPoint = Point2<f64>;

    /// A 2D displacement in the rover's local world frame, meters
    pub type Displacement = Vector2<f64>;
}
