//! Tri-colour status LED driver.
//!
//! Three digital outputs drive the red, green and blue dies of a
//! common-cathode RGB LED. There is no PWM: each die is either lit or dark.
//!
//! On host builds the driver keeps the pin levels in memory and counts
//! writes, so tests can tell a real transition from a repeated command.

use log::debug;

pub struct StatusLed {
    current: (bool, bool, bool),
    writes: u32,
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            current: (false, false, false),
            writes: 0,
        }
    }

    pub fn set(&mut self, r: bool, g: bool, b: bool) {
        debug!("LED: r={} g={} b={}", r as u8, g as u8, b as u8);
        self.current = (r, g, b);
        self.writes = self.writes.wrapping_add(1);
    }

    pub fn off(&mut self) {
        self.set(false, false, false);
    }

    /// Pin levels as last written.
    pub fn current(&self) -> (bool, bool, bool) {
        self.current
    }

    /// Number of pin writes since construction.
    pub fn write_count(&self) -> u32 {
        self.writes
    }
}
