//! Noise-filtered range sensing
//!
//! The ultrasonic sonar is noisy and occasionally fails outright, so a
//! single sample is never trusted: several are taken, out-of-band values
//! are discarded, and the rest are averaged.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::config::CalibrationParams;
use crate::error::NavError;
use crate::hardware::RangeSensor;
use crate::runtime::{CancelToken, Clock};

/// Samples outside (MIN, MAX) are treated as sensor noise, meters
const MIN_VALID_RANGE: f64 = 0.01;
const MAX_VALID_RANGE: f64 = 4.0;

/// Returned when no sample is usable, meters.
///
/// Fails open: a flaky sensor must not pin the rover in perpetual
/// avoidance, so the filter assumes the path is clear.
const FALLBACK_DISTANCE: f64 = 2.0;

/// The sonar reports millimeters
const MM_TO_M: f64 = 0.001;

/// Averages several sonar samples into one range estimate
pub struct RangeFilter {
    sonar: Box<dyn RangeSensor>,
    clock: Arc<dyn Clock>,
    cancel: CancelToken,
    params: CalibrationParams,
}

impl RangeFilter {
    pub fn new(
        sonar: Box<dyn RangeSensor>,
        clock: Arc<dyn Clock>,
        cancel: CancelToken,
        params: CalibrationParams,
    ) -> Self {
        RangeFilter {
            sonar,
            clock,
            cancel,
            params,
        }
    }

    /// Filtered distance ahead of the rover, meters.
    ///
    /// Takes `sensor_attempts` samples with a short pause between them to
    /// reduce correlated noise. Failed or out-of-band samples are dropped;
    /// if nothing survives, the fail-open fallback is returned. Only
    /// cancellation aborts the read.
    pub fn read_distance(&mut self) -> Result<f64, NavError> {
        let mut accepted = Vec::with_capacity(self.params.sensor_attempts as usize);

        for _ in 0..self.params.sensor_attempts {
            match self.sonar.get_distance() {
                Ok(raw) => {
                    let meters = raw * MM_TO_M;
                    if meters > MIN_VALID_RANGE && meters < MAX_VALID_RANGE {
                        accepted.push(meters);
                    }
                }
                Err(e) => warn!("sensor reading error: {}", e),
            }
            self.clock.sleep(
                Duration::from_secs_f64(self.params.sample_interval),
                &self.cancel,
            )?;
        }

        if accepted.is_empty() {
            warn!("no valid sensor readings obtained, assuming path is clear");
            return Ok(FALLBACK_DISTANCE);
        }

        let average = accepted.iter().sum::<f64>() / accepted.len() as f64;
        debug!("ultrasonic reading: {:.2} m", average);
        Ok(average)
    }
}
