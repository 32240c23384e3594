//! System configuration parameters
//!
//! All tunable parameters for the Mnemon monitor.
//! Values can be overridden from a JSON file through the [`ConfigPort`]
//! adapter; anything missing falls back to the defaults below.
//!
//! [`ConfigPort`]: crate::app::ports::ConfigPort

use serde::{Deserialize, Serialize};

use crate::alert::AlertThresholds;
use crate::app::ports::ConfigError;
use crate::scenario::{self, ScenarioName};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Timing ---
    /// Sampler tick interval (milliseconds)
    pub sample_interval_ms: u32,
    /// How often the main loop checks whether a tick is due (milliseconds)
    pub scheduler_granularity_ms: u32,

    // --- Alerting ---
    /// Red / yellow limits for the alert evaluator
    pub thresholds: AlertThresholds,

    // --- Scenario ---
    /// Scenario active at boot
    pub initial_scenario: ScenarioName,

    // --- Control plane ---
    /// TCP port of the HTTP control plane
    pub http_port: u16,
    /// Token refill rate for mutating requests (per second)
    pub control_rate_per_sec: u32,
    /// Token bucket capacity for mutating requests
    pub control_burst: u32,

    // --- Telemetry ---
    /// Emit one JSON telemetry record per tick on the serial stream
    pub telemetry_enabled: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            sample_interval_ms: 2000,     // 0.5 Hz
            scheduler_granularity_ms: 100, // 10 Hz poll

            // Alerting
            thresholds: AlertThresholds::default(),

            // Scenario
            initial_scenario: scenario::default_name(),

            // Control plane
            http_port: 8080,
            control_rate_per_sec: 10,
            control_burst: 10,

            // Telemetry
            telemetry_enabled: true,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("sample_interval_ms must be > 0"));
        }
        if self.scheduler_granularity_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "scheduler_granularity_ms must be > 0",
            ));
        }
        if self.scheduler_granularity_ms > self.sample_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "scheduler_granularity_ms must not exceed sample_interval_ms",
            ));
        }

        let t = &self.thresholds;
        let pairs = [
            (t.temp_yellow_c, t.temp_red_c, "temperature"),
            (t.humidity_yellow_pct, t.humidity_red_pct, "humidity"),
            (t.accel_yellow_g, t.accel_red_g, "acceleration"),
        ];
        for (yellow, red, _signal) in pairs {
            if !yellow.is_finite() || !red.is_finite() {
                return Err(ConfigError::ValidationFailed("thresholds must be finite"));
            }
            if yellow >= red {
                return Err(ConfigError::ValidationFailed(
                    "yellow threshold must be below red threshold",
                ));
            }
        }

        if self.initial_scenario.is_empty() {
            return Err(ConfigError::ValidationFailed("initial_scenario must not be empty"));
        }
        if self.control_rate_per_sec == 0 || self.control_burst == 0 {
            return Err(ConfigError::ValidationFailed(
                "control rate and burst must be > 0",
            ));
        }
        Ok(())
    }
}
