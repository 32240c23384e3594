//! Telemetry record: one JSON object per sampling tick.
//!
//! ```json
//! {
//!   "timestamp": 42000, "scenario": "sensor_validation", "step": 3,
//!   "elapsed_seconds": 25,
//!   "sensors": {
//!     "dht22":   { "temperature": 24.1, "humidity": 45.0 },
//!     "ldr":     { "raw": 1800, "lux": 38 },
//!     "mpu6050": { "accelX": 0.0, "accelY": 0.0, "accelZ": 1.0 }
//!   },
//!   "actuators": { "rgb_led": "green", "buzzer": "off" },
//!   "alert_level": "normal"
//! }
//! ```
//!
//! `timestamp` is uptime in milliseconds. Temperature and humidity are
//! rounded to 0.1, lux and raw to integers, acceleration to 0.01. Values
//! that are not finite (a faulted read) serialize as `null`.

use core::time::Duration;

use serde::Serialize;

use crate::alert::AlertLevel;
use crate::context::ScenarioStatus;
use crate::drivers::{ActuatorColor, ActuatorState, BuzzerState};
use crate::scenario::ScenarioName;
use crate::sensors::ReadingSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub timestamp: u64,
    pub scenario: ScenarioName,
    pub step: u32,
    pub elapsed_seconds: u64,
    pub sensors: SensorsRecord,
    pub actuators: ActuatorsRecord,
    pub alert_level: AlertLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorsRecord {
    pub dht22: Dht22Record,
    pub ldr: LdrRecord,
    pub mpu6050: Mpu6050Record,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dht22Record {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LdrRecord {
    pub raw: Option<i64>,
    pub lux: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mpu6050Record {
    pub accel_x: Option<f64>,
    pub accel_y: Option<f64>,
    pub accel_z: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActuatorsRecord {
    pub rgb_led: ActuatorColor,
    pub buzzer: BuzzerState,
}

impl TelemetryRecord {
    pub fn new(
        uptime: Duration,
        scenario: &ScenarioStatus,
        snap: &ReadingSnapshot,
        actuators: ActuatorState,
        alert_level: AlertLevel,
    ) -> Self {
        Self {
            timestamp: u64::try_from(uptime.as_millis()).unwrap_or(u64::MAX),
            scenario: scenario.name.clone(),
            step: scenario.step,
            elapsed_seconds: scenario.elapsed.as_secs(),
            sensors: SensorsRecord {
                dht22: Dht22Record {
                    temperature: round_to(snap.temperature_c, 10.0),
                    humidity: round_to(snap.humidity_pct, 10.0),
                },
                ldr: LdrRecord {
                    raw: round_int(snap.light_raw),
                    lux: round_int(snap.light_lux),
                },
                mpu6050: Mpu6050Record {
                    accel_x: round_to(snap.accel_x_g, 100.0),
                    accel_y: round_to(snap.accel_y_g, 100.0),
                    accel_z: round_to(snap.accel_z_g, 100.0),
                },
            },
            actuators: ActuatorsRecord {
                rgb_led: actuators.color,
                buzzer: actuators.buzzer,
            },
            alert_level,
        }
    }

    /// Single-line JSON, as written to the serial stream.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Round to `1 / scale`. `None` for NaN and infinities.
pub fn round_to(v: f32, scale: f64) -> Option<f64> {
    v.is_finite().then(|| (f64::from(v) * scale).round() / scale)
}

pub fn round_int(v: f32) -> Option<i64> {
    // Saturating float-to-int cast; finite sensor values are far inside i64.
    v.is_finite().then(|| f64::from(v).round() as i64)
}
