//! Calibration parameters for the navigation core

use std::collections::HashMap;

/// The fixed calibration record for a navigation run.
///
/// The rover has no encoders, so every duration the motion primitives
/// compute comes from these empirically measured ratios. Values are set
/// before a run starts (defaults below, overridable through
/// [`CalibrationParams::configure`]) and are read-only afterwards.
#[derive(Debug, Clone)]
pub struct CalibrationParams {
    /// Measured forward velocity in m/s at speed setting 100
    pub actual_speed: f64,
    /// Measured lateral velocity in m/s at speed setting 100; the mecanum
    /// wheels are mechanically less efficient sideways than forward
    pub actual_strafe_speed: f64,
    /// Speed setting for forward motion (0-100)
    pub forward_speed: f64,
    /// Speed setting for strafing (0-100)
    pub strafe_speed: f64,
    /// Angular speed setting used for turns (0-100)
    pub angular_speed: f64,
    /// Seconds for a 90 degree turn at `angular_speed`
    pub turn_calibration: f64,
    /// Trigger obstacle avoidance below this range, meters
    pub obstacle_threshold: f64,
    /// Consider the path clear at or above this range, meters
    pub clear_threshold: f64,
    /// Target reached within this distance, meters
    pub target_threshold: f64,
    /// Forward step distance per approach iteration, meters
    pub forward_step: f64,
    /// Sideways step distance per avoidance attempt, meters
    pub strafe_step: f64,
    /// Reverse distance for the backup-and-turn strategy, meters
    pub backup_distance: f64,
    /// Turn applied after backing up, degrees
    pub escape_turn: f64,
    /// Attempt cap for each strafe direction
    pub max_strafe_attempts: u32,
    /// Iteration cap for one navigation run
    pub max_approach_attempts: u32,
    /// Range samples averaged per distance read
    pub sensor_attempts: u32,
    /// Re-align only when off the desired heading by more than this, degrees
    pub heading_tolerance: f64,
    /// Heading at the start of a run, degrees; 90 points the sensor-forward
    /// side of the rover along the +y axis
    pub initial_heading: f64,
    /// Pause after each motion command to let the chassis settle, seconds
    pub settle_time: f64,
    /// Pause between approach iterations, seconds
    pub loop_pause: f64,
    /// Pause between successive range samples, seconds
    pub sample_interval: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        CalibrationParams {
            actual_speed: 0.172,
            actual_strafe_speed: 0.156,
            forward_speed: 100.0,
            strafe_speed: 100.0,
            angular_speed: 100.0,
            turn_calibration: 1.0,
            obstacle_threshold: 0.2,
            clear_threshold: 0.3,
            target_threshold: 0.1,
            forward_step: 0.2,
            strafe_step: 0.1,
            backup_distance: 0.3,
            escape_turn: 45.0,
            max_strafe_attempts: 10,
            max_approach_attempts: 20,
            sensor_attempts: 3,
            heading_tolerance: 5.0,
            initial_heading: 90.0,
            settle_time: 0.1,
            loop_pause: 0.1,
            sample_interval: 0.01,
        }
    }
}

impl CalibrationParams {
    /// Override calibration values by name.
    ///
    /// Takes the same `name -> value` map shape the rest of the stack uses
    /// for tuning parameters; unknown keys are ignored so one map can feed
    /// several components.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), String> {
        if let Some(&actual_speed) = params.get("actual_speed") {
            if actual_speed <= 0.0 {
                return Err("Actual speed must be positive".to_string());
            }
            self.actual_speed = actual_speed;
        }

        if let Some(&actual_strafe_speed) = params.get("actual_strafe_speed") {
            if actual_strafe_speed <= 0.0 {
                return Err("Actual strafe speed must be positive".to_string());
            }
            self.actual_strafe_speed = actual_strafe_speed;
        }

        if let Some(&forward_speed) = params.get("forward_speed") {
            if !(0.0..=100.0).contains(&forward_speed) {
                return Err("Forward speed setting must be in 0-100".to_string());
            }
            self.forward_speed = forward_speed;
        }

        if let Some(&strafe_speed) = params.get("strafe_speed") {
            if !(0.0..=100.0).contains(&strafe_speed) {
                return Err("Strafe speed setting must be in 0-100".to_string());
            }
            self.strafe_speed = strafe_speed;
        }

        if let Some(&angular_speed) = params.get("angular_speed") {
            if !(0.0..=100.0).contains(&angular_speed) {
                return Err("Angular speed setting must be in 0-100".to_string());
            }
            self.angular_speed = angular_speed;
        }

        if let Some(&turn_calibration) = params.get("turn_calibration") {
            if turn_calibration <= 0.0 {
                return Err("Turn calibration must be positive".to_string());
            }
            self.turn_calibration = turn_calibration;
        }

        if let Some(&obstacle_threshold) = params.get("obstacle_threshold") {
            if obstacle_threshold <= 0.0 {
                return Err("Obstacle threshold must be positive".to_string());
            }
            self.obstacle_threshold = obstacle_threshold;
        }

        if let Some(&clear_threshold) = params.get("clear_threshold") {
            if clear_threshold <= 0.0 {
                return Err("Clear threshold must be positive".to_string());
            }
            self.clear_threshold = clear_threshold;
        }

        if let Some(&target_threshold) = params.get("target_threshold") {
            if target_threshold <= 0.0 {
                return Err("Target threshold must be positive".to_string());
            }
            self.target_threshold = target_threshold;
        }

        if let Some(&forward_step) = params.get("forward_step") {
            if forward_step <= 0.0 {
                return Err("Forward step must be positive".to_string());
            }
            self.forward_step = forward_step;
        }

        if let Some(&strafe_step) = params.get("strafe_step") {
            if strafe_step <= 0.0 {
                return Err("Strafe step must be positive".to_string());
            }
            self.strafe_step = strafe_step;
        }

        if let Some(&backup_distance) = params.get("backup_distance") {
            if backup_distance <= 0.0 {
                return Err("Backup distance must be positive".to_string());
            }
            self.backup_distance = backup_distance;
        }

        if let Some(&max_strafe_attempts) = params.get("max_strafe_attempts") {
            if max_strafe_attempts < 1.0 {
                return Err("Max strafe attempts must be at least 1".to_string());
            }
            self.max_strafe_attempts = max_strafe_attempts as u32;
        }

        if let Some(&max_approach_attempts) = params.get("max_approach_attempts") {
            if max_approach_attempts < 1.0 {
                return Err("Max approach attempts must be at least 1".to_string());
            }
            self.max_approach_attempts = max_approach_attempts as u32;
        }

        if let Some(&sensor_attempts) = params.get("sensor_attempts") {
            if sensor_attempts < 1.0 {
                return Err("Sensor attempts must be at least 1".to_string());
            }
            self.sensor_attempts = sensor_attempts as u32;
        }

        if let Some(&initial_heading) = params.get("initial_heading") {
            self.initial_heading = initial_heading;
        }

        if self.clear_threshold < self.obstacle_threshold {
            return Err("Clear threshold must not be below the obstacle threshold".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let params = CalibrationParams::default();
        assert!(params.clear_threshold >= params.obstacle_threshold);
        assert!(params.actual_strafe_speed <= params.actual_speed);
        assert!(params.max_strafe_attempts >= 1);
    }

    #[test]
    fn configure_overrides_named_values() {
        let mut params = CalibrationParams::default();
        let mut overrides = HashMap::new();
        overrides.insert("actual_speed".to_string(), 0.335);
        overrides.insert("max_approach_attempts".to_string(), 40.0);
        overrides.insert("unknown_key".to_string(), 1.0);

        params.configure(&overrides).unwrap();
        assert_eq!(params.actual_speed, 0.335);
        assert_eq!(params.max_approach_attempts, 40);
    }

    #[test]
    fn configure_rejects_bad_values() {
        let mut params = CalibrationParams::default();

        let mut overrides = HashMap::new();
        overrides.insert("actual_speed".to_string(), 0.0);
        assert!(params.configure(&overrides).is_err());

        let mut overrides = HashMap::new();
        overrides.insert("clear_threshold".to_string(), 0.05);
        assert!(params.configure(&overrides).is_err());
    }
}
