//! Mnemon: host runtime.
//!
//! ```text
//!  main thread      sampler loop: SampleScheduler → MonitorService::tick
//!  http-io          control plane: accept + per-connection tasks
//!  serial-writer    telemetry channel → stdout (JSON lines)
//! ```
//!
//! Logs go to stderr through `tracing-subscriber` (`RUST_LOG`, default
//! `info`); stdout carries telemetry only.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use mnemon::adapters::config_file::JsonFileConfig;
use mnemon::adapters::hardware::HardwareAdapter;
use mnemon::adapters::log_sink::LogEventSink;
use mnemon::adapters::serial::{self, SerialTelemetrySink, TELEMETRY_CHANNEL};
use mnemon::adapters::time::SystemClock;
use mnemon::app::ports::{ConfigError, ConfigPort, EventSink, SchedulerDelegate};
use mnemon::app::service::MonitorService;
use mnemon::config::SystemConfig;
use mnemon::context::MonitorContext;
use mnemon::control::ControlPlane;
use mnemon::drivers::buzzer::Buzzer;
use mnemon::drivers::status_led::StatusLed;
use mnemon::http;
use mnemon::scheduler::SampleScheduler;
use mnemon::sensors::sim::SimulatedSensors;

// ── Scheduler delegate ────────────────────────────────────────
//
// Bridges the scheduler (which knows nothing about sensors) to the
// monitor service: each due tick runs one sampling cycle.

struct SamplerDelegate<'a, S> {
    service: &'a mut MonitorService,
    hw: &'a mut HardwareAdapter,
    sink: &'a mut S,
}

impl<S: EventSink> SchedulerDelegate for SamplerDelegate<'_, S> {
    fn on_sample_due(&mut self, _now: Duration) {
        self.service.tick(self.hw, self.sink);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging init failed: {e}"))?;

    info!("Mnemon v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config (file or defaults) ──────────────────────────
    let config_port = JsonFileConfig::from_env();
    let config = match config_port.load() {
        Ok(c) => c,
        Err(ConfigError::NotFound) => {
            info!("Config: {} not found, using defaults", config_port.path().display());
            SystemConfig::default()
        }
        Err(e) => {
            warn!("Config: {} ({}), using defaults", config_port.path().display(), e);
            SystemConfig::default()
        }
    };

    // ── 3. Shared context ─────────────────────────────────────
    let ctx = Arc::new(MonitorContext::new(
        config.initial_scenario.clone(),
        Box::new(SystemClock::new()),
    ));

    // ── 4. Control plane ──────────────────────────────────────
    let listener = http::server::bind(config.http_port)
        .with_context(|| format!("binding control plane on port {}", config.http_port))?;
    let router = http::Router::new(
        ControlPlane::new(Arc::clone(&ctx)),
        config.control_rate_per_sec,
        config.control_burst,
    );
    http::server::spawn(listener, router).context("spawning http-io thread")?;

    // ── 5. Telemetry writer ───────────────────────────────────
    if config.telemetry_enabled {
        serial::spawn_writer(&TELEMETRY_CHANNEL, std::io::stdout())
            .context("spawning serial-writer thread")?;
    }

    // ── 6. Hardware + service ─────────────────────────────────
    let mut hw = HardwareAdapter::new(SimulatedSensors::new(), StatusLed::new(), Buzzer::new());
    let mut sink = (
        LogEventSink::new(),
        config.telemetry_enabled.then(SerialTelemetrySink::new),
    );
    let mut service = MonitorService::new(Arc::clone(&ctx), config.thresholds);
    service.start(&mut hw, &mut sink);

    // ── 7. Sampler loop ───────────────────────────────────────
    let mut scheduler =
        SampleScheduler::new(Duration::from_millis(config.sample_interval_ms.into()));
    let granularity = Duration::from_millis(config.scheduler_granularity_ms.into());
    let mut delegate = SamplerDelegate {
        service: &mut service,
        hw: &mut hw,
        sink: &mut sink,
    };

    info!("System ready. Entering sampler loop.");
    loop {
        let now = ctx.now();
        scheduler.tick(now, &mut delegate);
        std::thread::sleep(granularity.min(scheduler.until_next(now)));
    }
}
