//! Serial telemetry stream.
//!
//! The sampler must never block on output, so telemetry crosses threads
//! through a bounded `embassy-sync` channel:
//!
//! ```text
//! ┌──────────┐ try_send  ┌───────────────────┐ receive().await ┌──────────────┐
//! │ Sampler  │──────────▶│ TELEMETRY_CHANNEL │────────────────▶│ serial-writer│──▶ stdout
//! │ (sync)   │  (drop if │   depth 4         │                 │   thread     │   JSON lines
//! └──────────┘   full)   └───────────────────┘                 └──────────────┘
//! ```

use std::io::{self, Write};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::telemetry::TelemetryRecord;

/// Records buffered between the sampler and the writer.
pub const TELEMETRY_DEPTH: usize = 4;

pub type TelemetryChannel = Channel<CriticalSectionRawMutex, TelemetryRecord, TELEMETRY_DEPTH>;

/// Sampler → serial writer.
pub static TELEMETRY_CHANNEL: TelemetryChannel = Channel::new();

/// [`EventSink`] that queues telemetry records for the serial writer and
/// ignores every other event.
pub struct SerialTelemetrySink {
    channel: &'static TelemetryChannel,
    dropped: u32,
}

impl Default for SerialTelemetrySink {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialTelemetrySink {
    pub fn new() -> Self {
        Self::with_channel(&TELEMETRY_CHANNEL)
    }

    pub fn with_channel(channel: &'static TelemetryChannel) -> Self {
        Self {
            channel,
            dropped: 0,
        }
    }

    /// Records dropped because the writer fell behind.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl EventSink for SerialTelemetrySink {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::Telemetry(record) = event {
            if self.channel.try_send(record.clone()).is_err() {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("Serial: telemetry channel full, dropping record");
            }
        }
    }
}

/// Write one record as a single JSON line.
pub fn write_record(out: &mut impl Write, record: &TelemetryRecord) -> io::Result<()> {
    let line = record.to_json_line().map_err(io::Error::other)?;
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Spawn the serial writer thread draining `channel` into `out`.
pub fn spawn_writer<W>(
    channel: &'static TelemetryChannel,
    mut out: W,
) -> io::Result<std::thread::JoinHandle<()>>
where
    W: Write + Send + 'static,
{
    std::thread::Builder::new()
        .name("serial-writer".into())
        .spawn(move || {
            futures_lite::future::block_on(async {
                loop {
                    let record = channel.receive().await;
                    if let Err(e) = write_record(&mut out, &record) {
                        warn!("Serial: write failed: {}", e);
                    }
                }
            })
        })
}
