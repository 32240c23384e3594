//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, event sinks, config storage, clock)
//! implement these traits. The [`MonitorService`](super::service::MonitorService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! ## Notes
//!
//! - **ConfigPort** implementations MUST validate before persisting.
//! - **TimePort** is the only source of "now" in the core; tests drive it by hand.

use core::time::Duration;

use crate::config::SystemConfig;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one call per physical sensor.
///
/// A failed read is reported, not retried; the sampler marks the whole
/// group NaN for that tick.
pub trait SensorPort {
    /// DHT22 temperature (°C) and relative humidity (%).
    fn read_dht22(&mut self) -> Result<(f32, f32), SensorError>;

    /// LDR raw 12-bit ADC count.
    fn read_ldr(&mut self) -> Result<u16, SensorError>;

    /// MPU-6050 acceleration (g) on x, y, z.
    fn read_mpu6050(&mut self) -> Result<(f32, f32, f32), SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Light the status LED dies.
    fn set_led(&mut self, r: bool, g: bool, b: bool);

    /// Switch the buzzer.
    fn set_buzzer(&mut self, on: bool);

    /// LED dark, buzzer silent.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (log, serial
/// telemetry stream, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Fan an event out to two sinks.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

/// An absent sink drops every event.
impl<S: EventSink> EventSink for Option<S> {
    fn emit(&mut self, event: &super::events::AppEvent) {
        if let Some(sink) = self {
            sink.emit(event);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic uptime source shared by the sampler and the control plane.
pub trait TimePort: Send + Sync {
    fn uptime(&self) -> Duration;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the sampler)
// ───────────────────────────────────────────────────────────────

/// Callback the [`SampleScheduler`](crate::scheduler::SampleScheduler)
/// invokes when a sampling tick is due.
pub trait SchedulerDelegate {
    fn on_sample_due(&mut self, now: Duration);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
