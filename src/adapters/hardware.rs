//! Hardware adapter: bridges the sensor bank and actuator drivers to the
//! domain port traits.
//!
//! Owns the [`SimulatedSensors`] bank plus the [`StatusLed`] and [`Buzzer`]
//! drivers, exposing them through [`SensorPort`] and [`ActuatorPort`]. This
//! is the only module in the system that touches the "physical" side.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::buzzer::Buzzer;
use crate::drivers::status_led::StatusLed;
use crate::error::SensorError;
use crate::sensors::sim::SimulatedSensors;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensors: SimulatedSensors,
    led: StatusLed,
    buzzer: Buzzer,
}

impl HardwareAdapter {
    pub fn new(sensors: SimulatedSensors, led: StatusLed, buzzer: Buzzer) -> Self {
        Self {
            sensors,
            led,
            buzzer,
        }
    }

    pub fn sensors(&self) -> &SimulatedSensors {
        &self.sensors
    }

    pub fn led(&self) -> &StatusLed {
        &self.led
    }

    pub fn buzzer(&self) -> &Buzzer {
        &self.buzzer
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_dht22(&mut self) -> Result<(f32, f32), SensorError> {
        self.sensors.read_dht22()
    }

    fn read_ldr(&mut self) -> Result<u16, SensorError> {
        self.sensors.read_ldr()
    }

    fn read_mpu6050(&mut self) -> Result<(f32, f32, f32), SensorError> {
        self.sensors.read_mpu6050()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_led(&mut self, r: bool, g: bool, b: bool) {
        self.led.set(r, g, b);
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer.set(on);
    }

    fn all_off(&mut self) {
        self.led.off();
        self.buzzer.set(false);
    }
}
