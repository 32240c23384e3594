//! Actuator drivers and the level-to-actuator controller.

pub mod actuator;
pub mod buzzer;
pub mod status_led;

pub use actuator::{ActuatorColor, ActuatorController, ActuatorState, BuzzerState};
