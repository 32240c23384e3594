//! Simulated sensor bank for host builds.
//!
//! Stands in for the DHT22 / LDR / MPU-6050 drivers. Live values and
//! per-group faults are injected through a cloneable [`SimHandle`], so a
//! test (or a simulation script) can move the "physical" world while the
//! sampler runs on another thread.
//!
//! Values are stored as `f32` bit patterns in atomics; each group is read
//! field by field, which is fine for a simulation: only the channel store
//! owes readers an untorn view.

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};
use std::sync::Arc;

use crate::error::SensorError;
use crate::sensors::SensorGroup;

/// Live values the bank starts with: a quiet indoor room.
pub const DEFAULT_TEMPERATURE_C: f32 = 24.0;
pub const DEFAULT_HUMIDITY_PCT: f32 = 45.0;
pub const DEFAULT_LIGHT_RAW: u16 = 1800;
pub const DEFAULT_ACCEL_G: (f32, f32, f32) = (0.0, 0.0, 1.0);

const FAULT_NONE: u8 = 0;
const FAULT_READ: u8 = 1;
const FAULT_TIMEOUT: u8 = 2;
const FAULT_CHECKSUM: u8 = 3;

/// Kind of failure to inject into a group's next reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimFault {
    ReadFailed,
    Timeout,
    ChecksumMismatch,
}

struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(v: f32) -> Self {
        Self(AtomicU32::new(v.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, v: f32) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }
}

struct SimInputs {
    temperature_c: AtomicF32,
    humidity_pct: AtomicF32,
    light_raw: AtomicU32,
    accel: [AtomicF32; 3],
    faults: [AtomicU8; 3],
}

/// Injection handle shared with the simulated bank.
#[derive(Clone)]
pub struct SimHandle(Arc<SimInputs>);

impl SimHandle {
    pub fn set_dht22(&self, temperature_c: f32, humidity_pct: f32) {
        self.0.temperature_c.store(temperature_c);
        self.0.humidity_pct.store(humidity_pct);
    }

    pub fn set_light_raw(&self, raw: u16) {
        self.0.light_raw.store(u32::from(raw), Ordering::Relaxed);
    }

    pub fn set_accel(&self, x_g: f32, y_g: f32, z_g: f32) {
        for (slot, v) in self.0.accel.iter().zip([x_g, y_g, z_g]) {
            slot.store(v);
        }
    }

    /// Make every subsequent read of `group` fail with `fault`
    /// (`None` restores normal reads).
    pub fn set_fault(&self, group: SensorGroup, fault: Option<SimFault>) {
        let code = match fault {
            None => FAULT_NONE,
            Some(SimFault::ReadFailed) => FAULT_READ,
            Some(SimFault::Timeout) => FAULT_TIMEOUT,
            Some(SimFault::ChecksumMismatch) => FAULT_CHECKSUM,
        };
        self.0.faults[group_slot(group)].store(code, Ordering::Relaxed);
    }
}

/// Simulated DHT22 + LDR + MPU-6050.
pub struct SimulatedSensors {
    inputs: Arc<SimInputs>,
}

impl Default for SimulatedSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSensors {
    pub fn new() -> Self {
        let (ax, ay, az) = DEFAULT_ACCEL_G;
        Self {
            inputs: Arc::new(SimInputs {
                temperature_c: AtomicF32::new(DEFAULT_TEMPERATURE_C),
                humidity_pct: AtomicF32::new(DEFAULT_HUMIDITY_PCT),
                light_raw: AtomicU32::new(u32::from(DEFAULT_LIGHT_RAW)),
                accel: [AtomicF32::new(ax), AtomicF32::new(ay), AtomicF32::new(az)],
                faults: [AtomicU8::new(FAULT_NONE), AtomicU8::new(FAULT_NONE), AtomicU8::new(FAULT_NONE)],
            }),
        }
    }

    /// A handle for injecting values and faults from any thread.
    pub fn handle(&self) -> SimHandle {
        SimHandle(Arc::clone(&self.inputs))
    }

    /// Temperature (°C) and relative humidity (%).
    pub fn read_dht22(&self) -> Result<(f32, f32), SensorError> {
        self.check_fault(SensorGroup::Dht22)?;
        Ok((
            self.inputs.temperature_c.load(),
            self.inputs.humidity_pct.load(),
        ))
    }

    /// Raw 12-bit ADC count.
    pub fn read_ldr(&self) -> Result<u16, SensorError> {
        self.check_fault(SensorGroup::Ldr)?;
        let raw = self.inputs.light_raw.load(Ordering::Relaxed);
        Ok(raw.min(u32::from(u16::MAX)) as u16)
    }

    /// Acceleration (g) on x, y, z.
    pub fn read_mpu6050(&self) -> Result<(f32, f32, f32), SensorError> {
        self.check_fault(SensorGroup::Mpu6050)?;
        let [x, y, z] = &self.inputs.accel;
        Ok((x.load(), y.load(), z.load()))
    }

    fn check_fault(&self, group: SensorGroup) -> Result<(), SensorError> {
        match self.inputs.faults[group_slot(group)].load(Ordering::Relaxed) {
            FAULT_READ => Err(SensorError::ReadFailed(group)),
            FAULT_TIMEOUT => Err(SensorError::Timeout(group)),
            FAULT_CHECKSUM => Err(SensorError::ChecksumMismatch(group)),
            _ => Ok(()),
        }
    }
}

fn group_slot(group: SensorGroup) -> usize {
    match group {
        SensorGroup::Dht22 => 0,
        SensorGroup::Ldr => 1,
        SensorGroup::Mpu6050 => 2,
    }
}
