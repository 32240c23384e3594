//! Actuator controller: alert level to LED colour and buzzer.
//!
//! | Level      | LED    | Buzzer |
//! |------------|--------|--------|
//! | `Normal`   | green  | off    |
//! | `Warning`  | yellow | off    |
//! | `Critical` | red    | on     |
//!
//! The mapping is a pure function ([`ActuatorState::for_level`]). The
//! controller remembers what it last drove and only touches the outputs
//! when the target state differs, so a steady alert level never makes
//! the LED or buzzer flicker.

use core::fmt;

use serde::Serialize;

use crate::alert::AlertLevel;
use crate::app::ports::ActuatorPort;

/// Colour shown on the tri-colour status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorColor {
    Green,
    Yellow,
    Red,
}

impl ActuatorColor {
    /// Die levels `(r, g, b)` that produce this colour. Yellow is the
    /// red and green dies lit together.
    pub const fn channels(self) -> (bool, bool, bool) {
        match self {
            Self::Green => (false, true, false),
            Self::Yellow => (true, true, false),
            Self::Red => (true, false, false),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for ActuatorColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuzzerState {
    On,
    Off,
}

impl BuzzerState {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

/// Everything the actuators show at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActuatorState {
    pub color: ActuatorColor,
    pub buzzer: BuzzerState,
}

impl ActuatorState {
    pub const fn for_level(level: AlertLevel) -> Self {
        match level {
            AlertLevel::Critical => Self {
                color: ActuatorColor::Red,
                buzzer: BuzzerState::On,
            },
            AlertLevel::Warning => Self {
                color: ActuatorColor::Yellow,
                buzzer: BuzzerState::Off,
            },
            AlertLevel::Normal => Self {
                color: ActuatorColor::Green,
                buzzer: BuzzerState::Off,
            },
        }
    }
}

/// Drives the actuators from alert levels, writing only on change.
#[derive(Debug, Default)]
pub struct ActuatorController {
    current: Option<ActuatorState>,
}

impl ActuatorController {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Bring the actuators to the state for `level` and return it.
    ///
    /// LED and buzzer are written independently, each only if its own
    /// half of the state changed. The first call always writes both.
    pub fn apply(&mut self, level: AlertLevel, hw: &mut impl ActuatorPort) -> ActuatorState {
        let target = ActuatorState::for_level(level);
        let prev = self.current;

        if prev.map(|s| s.color) != Some(target.color) {
            let (r, g, b) = target.color.channels();
            hw.set_led(r, g, b);
        }
        if prev.map(|s| s.buzzer) != Some(target.buzzer) {
            hw.set_buzzer(target.buzzer.is_on());
        }

        self.current = Some(target);
        target
    }

    /// State last driven, `None` before the first `apply`.
    pub fn current(&self) -> Option<ActuatorState> {
        self.current
    }

    /// Turn everything off and forget the last state, so the next
    /// `apply` writes both outputs again.
    pub fn shutdown(&mut self, hw: &mut impl ActuatorPort) {
        hw.all_off();
        self.current = None;
    }
}
