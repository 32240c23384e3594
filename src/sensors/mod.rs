//! Sensor subsystem: channel identities, groups, and the per-tick snapshot.
//!
//! Three physical sensors feed six channels:
//!
//! | Group     | Channels                     | Unit        |
//! |-----------|------------------------------|-------------|
//! | `dht22`   | temperature, humidity        | °C, %RH     |
//! | `ldr`     | light raw                    | 12-bit ADC  |
//! | `mpu6050` | accel x, accel y, accel z    | g           |
//!
//! The sampler resolves every channel into a [`ReadingSnapshot`] once per
//! tick; everything downstream consumes the snapshot only.

pub mod ldr;
pub mod sim;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Channel identity
// ---------------------------------------------------------------------------

/// One physical quantity tracked independently in the channel store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    Temperature = 0,
    Humidity = 1,
    LightRaw = 2,
    AccelX = 3,
    AccelY = 4,
    AccelZ = 5,
}

impl Channel {
    /// Total number of channels: used to size the store.
    pub const COUNT: usize = 6;

    /// Every channel, in store order.
    pub const ALL: [Channel; Self::COUNT] = [
        Self::Temperature,
        Self::Humidity,
        Self::LightRaw,
        Self::AccelX,
        Self::AccelY,
        Self::AccelZ,
    ];

    /// Index into the store array.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The sensor group this channel belongs to.
    pub const fn group(self) -> SensorGroup {
        match self {
            Self::Temperature | Self::Humidity => SensorGroup::Dht22,
            Self::LightRaw => SensorGroup::Ldr,
            Self::AccelX | Self::AccelY | Self::AccelZ => SensorGroup::Mpu6050,
        }
    }

    /// Value every cell holds at startup, for both the live and the
    /// override slot.
    pub const fn default_value(self) -> f32 {
        match self {
            Self::Temperature => 25.0,
            Self::Humidity => 50.0,
            Self::LightRaw => 2048.0,
            Self::AccelX | Self::AccelY => 0.0,
            Self::AccelZ => 1.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::LightRaw => "light_raw",
            Self::AccelX => "accel_x",
            Self::AccelY => "accel_y",
            Self::AccelZ => "accel_z",
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor groups
// ---------------------------------------------------------------------------

/// A physical sensor; the unit of override commands and fault reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorGroup {
    Dht22,
    Ldr,
    Mpu6050,
}

impl SensorGroup {
    pub const ALL: [SensorGroup; 3] = [Self::Dht22, Self::Ldr, Self::Mpu6050];

    /// Channels owned by this group, in wire order.
    pub const fn channels(self) -> &'static [Channel] {
        match self {
            Self::Dht22 => &[Channel::Temperature, Channel::Humidity],
            Self::Ldr => &[Channel::LightRaw],
            Self::Mpu6050 => &[Channel::AccelX, Channel::AccelY, Channel::AccelZ],
        }
    }

    /// Wire name, also the last path segment of its override endpoint.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dht22 => "dht22",
            Self::Ldr => "ldr",
            Self::Mpu6050 => "mpu6050",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Resolved channel values captured at the start of one sampling tick.
///
/// Values are taken verbatim: a faulted live read shows up here as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadingSnapshot {
    /// DHT22 temperature (°C).
    pub temperature_c: f32,
    /// DHT22 relative humidity (%).
    pub humidity_pct: f32,
    /// LDR raw ADC count (0 – 4095).
    pub light_raw: f32,
    /// Illuminance derived from `light_raw`.
    pub light_lux: f32,
    /// MPU-6050 acceleration (g).
    pub accel_x_g: f32,
    pub accel_y_g: f32,
    pub accel_z_g: f32,
}

impl ReadingSnapshot {
    /// Build a snapshot from one resolved value per channel (store order).
    pub fn from_channels(values: [f32; Channel::COUNT]) -> Self {
        let light_raw = values[Channel::LightRaw.index()];
        Self {
            temperature_c: values[Channel::Temperature.index()],
            humidity_pct: values[Channel::Humidity.index()],
            light_raw,
            light_lux: ldr::raw_to_lux(light_raw),
            accel_x_g: values[Channel::AccelX.index()],
            accel_y_g: values[Channel::AccelY.index()],
            accel_z_g: values[Channel::AccelZ.index()],
        }
    }

    /// Euclidean norm of the acceleration vector (g).
    pub fn accel_magnitude(&self) -> f32 {
        (self.accel_x_g * self.accel_x_g
            + self.accel_y_g * self.accel_y_g
            + self.accel_z_g * self.accel_z_g)
            .sqrt()
    }
}

impl Default for ReadingSnapshot {
    fn default() -> Self {
        Self::from_channels(Channel::ALL.map(Channel::default_value))
    }
}
