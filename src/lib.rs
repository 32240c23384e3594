//! Mnemon environmental monitor.
//!
//! Samples a DHT22, an LDR and an MPU-6050 on a fixed tick, classifies
//! each snapshot into an alert level, drives a status LED and buzzer, and
//! exposes an HTTP control plane that can override any sensor channel
//! while sampling continues.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │  HardwareAdapter   LogEventSink   SerialTelemetrySink          │
//! │  (Sensor+Actuator) (EventSink)    (EventSink)                  │
//! │  JsonFileConfig    SystemClock    http::server                 │
//! │  (ConfigPort)      (TimePort)     (control plane I/O)          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  MonitorService ── store · alert · drivers · scenario          │
//! │  ControlPlane   ── gateway                                     │
//! │          both share Arc<MonitorContext>                        │
//! └────────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod alert;
pub mod app;
pub mod config;
pub mod context;
pub mod control;
pub mod drivers;
pub mod error;
pub mod gateway;
pub mod http;
pub mod scenario;
pub mod scheduler;
pub mod sensors;
pub mod store;
pub mod telemetry;
