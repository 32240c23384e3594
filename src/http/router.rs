//! Route table for the control plane.
//!
//! | Method | Path                  | Body                                   |
//! |--------|-----------------------|----------------------------------------|
//! | GET    | `/api/status`         | -                                      |
//! | POST   | `/api/sensors/dht22`  | `{temperature?, humidity?, disable?}`  |
//! | POST   | `/api/sensors/ldr`    | `{raw_value?, disable?}`               |
//! | POST   | `/api/sensors/mpu6050`| `{accel_x?, accel_y?, accel_z?, disable?}` |
//! | POST   | `/api/sensors/reset`  | -                                      |
//! | POST   | `/api/scenario`       | `{name}`                               |
//! | OPTIONS| any path above        | - (CORS pre-flight, 204)               |
//!
//! Mutating requests spend one token from a bucket shared by all
//! connections. A body is decoded completely before anything is applied,
//! so a rejected request never leaves a partial update behind.

use core::time::Duration;

use burster::Limiter;
use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::control::ControlPlane;
use crate::error::ControlError;
use crate::gateway::{GroupOverride, OverrideCommand};
use crate::sensors::ldr::raw_to_lux;
use crate::sensors::{Channel, SensorGroup};
use crate::telemetry::round_int;

use super::HttpResponse;
use super::request::{Method, Request};

/// Full-scale 12-bit ADC count.
const LDR_RAW_MAX: f32 = 4095.0;

// ── Request bodies ───────────────────────────────────────────

#[derive(Deserialize)]
struct Dht22Body {
    temperature: Option<f32>,
    humidity: Option<f32>,
    #[serde(default)]
    disable: bool,
}

#[derive(Deserialize)]
struct LdrBody {
    raw_value: Option<f32>,
    #[serde(default)]
    disable: bool,
}

#[derive(Deserialize)]
struct Mpu6050Body {
    accel_x: Option<f32>,
    accel_y: Option<f32>,
    accel_z: Option<f32>,
    #[serde(default)]
    disable: bool,
}

#[derive(Deserialize)]
struct ScenarioBody {
    name: String,
}

// ── Router ───────────────────────────────────────────────────

pub struct Router {
    control: ControlPlane,
    limiter: burster::TokenBucket<fn() -> Duration>,
}

impl Router {
    /// `rate_per_sec` tokens refill per second, up to `burst`.
    pub fn new(control: ControlPlane, rate_per_sec: u32, burst: u32) -> Self {
        Self {
            control,
            limiter: burster::TokenBucket::new_with_time_provider(
                rate_per_sec as _,
                burst as _,
                platform_now as fn() -> Duration,
            ),
        }
    }

    pub fn handle(&mut self, req: &Request) -> HttpResponse {
        self.route(req).unwrap_or_else(HttpResponse::error)
    }

    fn route(&mut self, req: &Request) -> Result<HttpResponse, ControlError> {
        if req.method == Method::Options {
            return if is_known_path(&req.path) {
                Ok(HttpResponse::no_content())
            } else {
                Err(ControlError::UnknownRoute)
            };
        }

        match (req.method, req.path.as_str()) {
            (Method::Get, "/api/status") => Ok(HttpResponse::json(200, &self.control.get_status())),
            (Method::Post, "/api/sensors/reset") => {
                self.admit()?;
                Ok(HttpResponse::json(200, &self.control.reset_overrides()))
            }
            (Method::Post, "/api/scenario") => {
                self.admit()?;
                let body: ScenarioBody = decode(req)?;
                let report = self.control.change_scenario(&body.name)?;
                Ok(HttpResponse::json(200, &report))
            }
            (Method::Post, path) => {
                let group = path
                    .strip_prefix("/api/sensors/")
                    .and_then(SensorGroup::from_name)
                    .ok_or(ControlError::UnknownRoute)?;
                self.admit()?;
                let cmd = decode_override(group, req)?;
                let out = self.control.set_channel_override(&cmd);
                Ok(override_response(&out))
            }
            _ => Err(ControlError::UnknownRoute),
        }
    }

    /// Spend one rate-limit token.
    fn admit(&mut self) -> Result<(), ControlError> {
        if self.limiter.try_consume(1).is_ok() {
            Ok(())
        } else {
            warn!("HTTP: rate limit exceeded");
            Err(ControlError::RateLimited)
        }
    }
}

fn is_known_path(path: &str) -> bool {
    matches!(path, "/api/status" | "/api/sensors/reset" | "/api/scenario")
        || path
            .strip_prefix("/api/sensors/")
            .and_then(SensorGroup::from_name)
            .is_some()
}

// ── Body decoding ────────────────────────────────────────────

fn decode<T: DeserializeOwned>(req: &Request) -> Result<T, ControlError> {
    serde_json::from_slice(&req.body).map_err(|_| ControlError::MalformedBody)
}

fn decode_override(group: SensorGroup, req: &Request) -> Result<OverrideCommand, ControlError> {
    let cmd = OverrideCommand::new(group);
    let (cmd, disable) = match group {
        SensorGroup::Dht22 => {
            let b: Dht22Body = decode(req)?;
            let cmd = cmd
                .with_opt(Channel::Temperature, b.temperature)?
                .with_opt(Channel::Humidity, b.humidity)?;
            (cmd, b.disable)
        }
        SensorGroup::Ldr => {
            let b: LdrBody = decode(req)?;
            if b.raw_value.is_some_and(|raw| !(0.0..=LDR_RAW_MAX).contains(&raw)) {
                return Err(ControlError::MalformedBody);
            }
            (cmd.with_opt(Channel::LightRaw, b.raw_value)?, b.disable)
        }
        SensorGroup::Mpu6050 => {
            let b: Mpu6050Body = decode(req)?;
            let cmd = cmd
                .with_opt(Channel::AccelX, b.accel_x)?
                .with_opt(Channel::AccelY, b.accel_y)?
                .with_opt(Channel::AccelZ, b.accel_z)?;
            (cmd, b.disable)
        }
    };
    Ok(if disable {
        OverrideCommand::disable(group)
    } else {
        cmd
    })
}

fn override_response(out: &GroupOverride) -> HttpResponse {
    let v = |ch| out.value(ch);
    let body = match out.group {
        SensorGroup::Dht22 => json!({
            "success": true,
            "temperature": v(Channel::Temperature),
            "humidity": v(Channel::Humidity),
            "override_active": out.active,
        }),
        SensorGroup::Ldr => {
            let raw = v(Channel::LightRaw).unwrap_or(f32::NAN);
            json!({
                "success": true,
                "raw_value": round_int(raw),
                "lux": round_int(raw_to_lux(raw)),
                "override_active": out.active,
            })
        }
        SensorGroup::Mpu6050 => json!({
            "success": true,
            "accel_x": v(Channel::AccelX),
            "accel_y": v(Channel::AccelY),
            "accel_z": v(Channel::AccelZ),
            "override_active": out.active,
        }),
    };
    HttpResponse::json(200, &body)
}

// ── Platform time for rate limiter ───────────────────────────

fn platform_now() -> Duration {
    use std::time::Instant;
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    START.get_or_init(Instant::now).elapsed()
}
