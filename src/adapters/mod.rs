//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements     | Connects to                     |
//! |---------------|----------------|---------------------------------|
//! | `hardware`    | SensorPort     | simulated DHT22 / LDR / MPU-6050|
//! |               | ActuatorPort   | status LED, buzzer              |
//! | `log_sink`    | EventSink      | `log` facade                    |
//! | `serial`      | EventSink      | telemetry channel → stdout      |
//! | `time`        | TimePort       | `Instant` / manual test clock   |
//! | `config_file` | ConfigPort     | JSON file on disk               |

pub mod config_file;
pub mod hardware;
pub mod log_sink;
pub mod serial;
pub mod time;
