//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events
//! through the `log` facade. Telemetry goes to `debug` so a default `info`
//! filter shows only edges (start, alert changes, sensor faults).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let d = &t.sensors;
                debug!(
                    "TELEM | {} step {} | T={:?}\u{00b0}C RH={:?}% | light={:?} ({:?} lux) | \
                     accel=({:?}, {:?}, {:?})g | led={} buzzer={} | {}",
                    t.scenario,
                    t.step,
                    d.dht22.temperature,
                    d.dht22.humidity,
                    d.ldr.raw,
                    d.ldr.lux,
                    d.mpu6050.accel_x,
                    d.mpu6050.accel_y,
                    d.mpu6050.accel_z,
                    t.actuators.rgb_led,
                    t.actuators.buzzer.as_str(),
                    t.alert_level,
                );
            }
            AppEvent::AlertChanged { from, to } => {
                info!("ALERT | {} -> {}", from, to);
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | {}", e);
            }
            AppEvent::Started { scenario } => {
                info!("START | scenario={}", scenario);
            }
        }
    }
}
