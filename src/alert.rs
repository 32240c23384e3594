//! Alert evaluator.
//!
//! Classifies one [`ReadingSnapshot`] into an [`AlertLevel`] against a
//! threshold table. Runs every tick after the snapshot is taken and
//! before actuators are driven.
//!
//! ## Rules
//!
//! 1. Any red threshold reached → `Critical`.
//! 2. Otherwise any yellow threshold reached → `Warning`.
//! 3. Otherwise `Normal`.
//!
//! Thresholds are inclusive (`>=`). The evaluator keeps no state: the same
//! snapshot always yields the same level. NaN never compares `>=`, so a
//! faulted channel cannot raise the level by itself.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::sensors::ReadingSnapshot;

/// Default red/yellow limits.
pub const TEMP_RED: f32 = 45.0;
pub const TEMP_YELLOW: f32 = 35.0;
pub const HUMIDITY_RED: f32 = 90.0;
pub const HUMIDITY_YELLOW: f32 = 80.0;
pub const ACCEL_RED: f32 = 1.7;
pub const ACCEL_YELLOW: f32 = 1.3;

/// Three-tier classification, ordered `Normal < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AlertLevel {
    Normal = 0,
    Warning = 1,
    Critical = 2,
}

impl AlertLevel {
    /// Inverse of `level as u8`; out-of-range bytes map to `Normal`.
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            2 => Self::Critical,
            1 => Self::Warning,
            _ => Self::Normal,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Red and yellow limits per signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub temp_yellow_c: f32,
    pub temp_red_c: f32,
    pub humidity_yellow_pct: f32,
    pub humidity_red_pct: f32,
    pub accel_yellow_g: f32,
    pub accel_red_g: f32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            temp_yellow_c: TEMP_YELLOW,
            temp_red_c: TEMP_RED,
            humidity_yellow_pct: HUMIDITY_YELLOW,
            humidity_red_pct: HUMIDITY_RED,
            accel_yellow_g: ACCEL_YELLOW,
            accel_red_g: ACCEL_RED,
        }
    }
}

/// Classify a snapshot.
pub fn evaluate(snap: &ReadingSnapshot, limits: &AlertThresholds) -> AlertLevel {
    let accel = snap.accel_magnitude();

    if snap.temperature_c >= limits.temp_red_c
        || snap.humidity_pct >= limits.humidity_red_pct
        || accel >= limits.accel_red_g
    {
        AlertLevel::Critical
    } else if snap.temperature_c >= limits.temp_yellow_c
        || snap.humidity_pct >= limits.humidity_yellow_pct
        || accel >= limits.accel_yellow_g
    {
        AlertLevel::Warning
    } else {
        AlertLevel::Normal
    }
}
