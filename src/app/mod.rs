//! Application core: domain orchestration, no direct I/O.
//!
//! This module contains the sampling cycle of the monitor: live reads,
//! snapshot, alert evaluation, actuator control, scenario progression and
//! telemetry. All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
