use anyhow::Result;
use rover_core::hardware::{Drivetrain, MotionCommand, RangeSensor};
use rover_core::{CalibrationParams, HardwareError, Navigator};
use std::collections::HashMap;

/// Drivetrain stand-in that keeps the latest state of each command axis
#[derive(Debug, Default)]
struct SimDrivetrain {
    speed: f64,
    heading: f64,
    angular_speed: f64,
}

impl Drivetrain for SimDrivetrain {
    fn set_motion(&mut self, command: MotionCommand) -> Result<(), HardwareError> {
        if let Some(speed) = command.speed {
            self.speed = speed;
        }
        if let Some(heading) = command.heading {
            self.heading = heading;
        }
        if let Some(angular_speed) = command.angular_speed {
            self.angular_speed = angular_speed;
        }
        println!(
            "drivetrain: speed={:.0} heading={:.0} angular={:.0}",
            self.speed, self.heading, self.angular_speed
        );
        Ok(())
    }
}

/// Sonar stand-in reporting open floor ahead
struct SimSonar;

impl RangeSensor for SimSonar {
    fn get_distance(&mut self) -> Result<f64, HardwareError> {
        Ok(2000.0)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("Initializing rover core simulation...");

    // Target from the command line, default (0, 3)
    let mut args = std::env::args().skip(1);
    let target_x: f64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 0.0,
    };
    let target_y: f64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 3.0,
    };

    // Speed up the simulated rover so the demo finishes quickly
    let mut params = CalibrationParams::default();
    let mut overrides = HashMap::new();
    overrides.insert("actual_speed".to_string(), 2.0);
    overrides.insert("actual_strafe_speed".to_string(), 1.8);
    overrides.insert("turn_calibration".to_string(), 0.1);
    params
        .configure(&overrides)
        .map_err(anyhow::Error::msg)?;

    let mut navigator = Navigator::new(Box::new(SimDrivetrain::default()), Box::new(SimSonar), params);

    println!("Navigating to ({:.2}, {:.2})", target_x, target_y);
    let outcome = navigator.navigate(target_x, target_y)?;

    if outcome.is_reached() {
        println!("Navigation complete.");
    } else {
        println!("Unable to reach target.");
    }
    Ok(())
}
