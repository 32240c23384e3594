//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them: log them, queue telemetry for the
//! serial writer, or record them in a test.

use crate::alert::AlertLevel;
use crate::error::SensorError;
use crate::scenario::ScenarioName;
use crate::telemetry::TelemetryRecord;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the initial scenario).
    Started { scenario: ScenarioName },

    /// One record per sampling tick.
    Telemetry(TelemetryRecord),

    /// The alert level moved.
    AlertChanged { from: AlertLevel, to: AlertLevel },

    /// A sensor group started failing its live reads.
    SensorFault(SensorError),
}
