//! Active piezo buzzer on a single GPIO. High = sounding.

use log::debug;

pub struct Buzzer {
    on: bool,
    writes: u32,
}

impl Default for Buzzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buzzer {
    pub fn new() -> Self {
        Self { on: false, writes: 0 }
    }

    pub fn set(&mut self, on: bool) {
        debug!("Buzzer: {}", if on { "on" } else { "off" });
        self.on = on;
        self.writes = self.writes.wrapping_add(1);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn write_count(&self) -> u32 {
        self.writes
    }
}
