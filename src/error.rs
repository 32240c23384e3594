//! Error types for the Mnemon monitor.
//!
//! Sensor faults stay inside the sampler and control-plane rejections stay
//! inside the router; neither crosses into the other. Both are `Copy` so
//! they pass through events and responses without allocation. The binary
//! wraps start-up failures in `anyhow`.

use core::fmt;

use crate::sensors::SensorGroup;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// A failed live read. The sampler turns these into NaN channel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The bus transaction or ADC conversion failed.
    ReadFailed(SensorGroup),
    /// The sensor did not answer in time.
    Timeout(SensorGroup),
    /// The sensor answered with a corrupted frame.
    ChecksumMismatch(SensorGroup),
}

impl SensorError {
    /// The sensor group the failure belongs to.
    pub fn group(&self) -> SensorGroup {
        match self {
            Self::ReadFailed(g) | Self::Timeout(g) | Self::ChecksumMismatch(g) => *g,
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed(g) => write!(f, "{} read failed", g.name()),
            Self::Timeout(g) => write!(f, "{} timed out", g.name()),
            Self::ChecksumMismatch(g) => write!(f, "{} checksum mismatch", g.name()),
        }
    }
}

impl std::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Control-plane errors
// ---------------------------------------------------------------------------

/// Boundary rejections. None of these leave the channel store modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// Request body failed to parse or carried a field of the wrong type.
    MalformedBody,
    /// Request exceeded the fixed request buffer.
    PayloadTooLarge,
    /// No handler for the method/path pair.
    UnknownRoute,
    /// Mutating request rejected by the token bucket.
    RateLimited,
    /// Scenario name empty or too long to store.
    InvalidScenario,
}

impl ControlError {
    /// HTTP status code for this rejection.
    pub const fn status(self) -> u16 {
        match self {
            Self::MalformedBody | Self::InvalidScenario => 400,
            Self::UnknownRoute => 404,
            Self::PayloadTooLarge => 413,
            Self::RateLimited => 429,
        }
    }
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedBody => write!(f, "Invalid JSON"),
            Self::PayloadTooLarge => write!(f, "Payload too large"),
            Self::UnknownRoute => write!(f, "Endpoint not found"),
            Self::RateLimited => write!(f, "Rate limit exceeded"),
            Self::InvalidScenario => write!(f, "Invalid scenario name"),
        }
    }
}

impl std::error::Error for ControlError {}
