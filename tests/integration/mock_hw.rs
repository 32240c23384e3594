//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history, and serves sensor readings the test sets directly.

use mnemon::app::events::AppEvent;
use mnemon::app::ports::{ActuatorPort, EventSink, SensorPort};
use mnemon::error::SensorError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetLed { r: bool, g: bool, b: bool },
    SetBuzzer(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub dht22: Result<(f32, f32), SensorError>,
    pub ldr: Result<u16, SensorError>,
    pub mpu6050: Result<(f32, f32, f32), SensorError>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            dht22: Ok((22.0, 40.0)),
            ldr: Ok(2048),
            mpu6050: Ok((0.0, 0.0, 1.0)),
        }
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// Current LED channels, replaying the call history.
    pub fn led(&self) -> (bool, bool, bool) {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetLed { r, g, b } => Some((*r, *g, *b)),
                ActuatorCall::AllOff => Some((false, false, false)),
                ActuatorCall::SetBuzzer(_) => None,
            })
            .unwrap_or_default()
    }

    pub fn buzzer_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetBuzzer(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::SetLed { .. } => None,
            })
            .unwrap_or(false)
    }

    pub fn led_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::SetLed { .. }))
            .count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_led(&mut self, r: bool, g: bool, b: bool) {
        self.calls.push(ActuatorCall::SetLed { r, g, b });
    }

    fn set_buzzer(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetBuzzer(on));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

impl SensorPort for MockHardware {
    fn read_dht22(&mut self) -> Result<(f32, f32), SensorError> {
        self.dht22
    }

    fn read_ldr(&mut self) -> Result<u16, SensorError> {
        self.ldr
    }

    fn read_mpu6050(&mut self) -> Result<(f32, f32, f32), SensorError> {
        self.mpu6050
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
