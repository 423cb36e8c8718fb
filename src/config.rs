//! System configuration parameters
//!
//! All tunable parameters for the airvent appliance. Defaults match the
//! reference board; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Sensor ---
    /// 7-bit I2C address of the SCD41
    pub sensor_address: u8,

    // --- Actuation ---
    /// CO2 concentration (ppm) above which the damper motor runs
    pub co2_threshold_ppm: f32,

    // --- Timing ---
    /// Sampling activity period (milliseconds)
    pub sample_interval_ms: u32,
    /// Actuation activity period (milliseconds); one motor step per period
    pub actuation_interval_ms: u32,
    /// Presentation activity period (milliseconds)
    pub presentation_interval_ms: u32,
    /// Button polling period (milliseconds)
    pub input_poll_interval_ms: u32,

    // --- Inputs ---
    /// Consecutive stable polls before a button edge is accepted
    pub debounce_samples: u8,

    // --- Storage ---
    /// Whether sample logging starts enabled at boot
    pub storage_enabled: bool,

    // --- Diagnostics ---
    /// Emit a sampling summary every N sampling periods (0 = never)
    pub stats_report_every: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Sensor
            sensor_address: 0x62,

            // Actuation
            co2_threshold_ppm: 1000.0,

            // Timing
            sample_interval_ms: 1000,      // 1 Hz
            actuation_interval_ms: 5,      // 200 half-steps/s
            presentation_interval_ms: 500, // 2 Hz
            input_poll_interval_ms: 10,    // 100 Hz

            // Inputs
            debounce_samples: 5, // 50 ms at 10 ms polling

            // Storage
            storage_enabled: false,

            // Diagnostics
            stats_report_every: 60,
        }
    }
}

impl SystemConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// The firmware reads this document from `pins::CONFIG_PATH` at boot
    /// when the SD card mounts.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON document"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the firmware cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sensor_address > 0x7F {
            return Err(Error::Config("sensor_address must be a 7-bit address"));
        }
        if !self.co2_threshold_ppm.is_finite() || self.co2_threshold_ppm <= 0.0 {
            return Err(Error::Config("co2_threshold_ppm must be positive"));
        }
        if self.sample_interval_ms == 0
            || self.actuation_interval_ms == 0
            || self.presentation_interval_ms == 0
            || self.input_poll_interval_ms == 0
        {
            return Err(Error::Config("activity intervals must be non-zero"));
        }
        if self.actuation_interval_ms >= self.sample_interval_ms {
            return Err(Error::Config(
                "actuation_interval_ms must be shorter than sample_interval_ms",
            ));
        }
        if self.debounce_samples == 0 {
            return Err(Error::Config("debounce_samples must be at least 1"));
        }
        Ok(())
    }
}
