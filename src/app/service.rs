//! Monitor service: the sampler, and the hexagonal core.
//!
//! [`MonitorService`] owns the actuator controller and the alert
//! thresholds, and shares the [`MonitorContext`] with the control plane.
//! All I/O flows through port traits injected at call sites, so the whole
//! tick is testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!                 │        MonitorService         │
//! ActuatorPort ◀──│ store · evaluate · scenario   │
//!                 └───────────────────────────────┘
//!                               ▲
//!                               │ Arc<MonitorContext>
//!                         control plane
//! ```

use std::sync::Arc;

use log::{info, warn};

use crate::alert::{self, AlertLevel, AlertThresholds};
use crate::context::MonitorContext;
use crate::drivers::ActuatorController;
use crate::error::SensorError;
use crate::sensors::{Channel, ReadingSnapshot, SensorGroup};
use crate::telemetry::TelemetryRecord;

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

pub struct MonitorService {
    ctx: Arc<MonitorContext>,
    thresholds: AlertThresholds,
    actuators: ActuatorController,
    /// Groups whose previous live read failed, indexed like `SensorGroup::ALL`.
    faulted: [bool; 3],
    last_snapshot: Option<ReadingSnapshot>,
    tick_count: u64,
}

impl MonitorService {
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(ctx: Arc<MonitorContext>, thresholds: AlertThresholds) -> Self {
        Self {
            ctx,
            thresholds,
            actuators: ActuatorController::new(),
            faulted: [false; 3],
            last_snapshot: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put the actuators in a known dark state and announce the start.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.actuators.shutdown(hw);
        let scenario = self.ctx.scenario_status().name;
        info!("Sampler: started, scenario '{}'", scenario);
        sink.emit(&AppEvent::Started { scenario });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one sampling cycle:
    /// live reads → snapshot → evaluate → actuators → scenario → telemetry.
    ///
    /// The snapshot is taken once, after the live writes, and everything
    /// downstream uses only the snapshot. A control-plane write landing
    /// mid-tick is seen either in this tick or the next, never half.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> TelemetryRecord {
        self.tick_count += 1;
        let now = self.ctx.now();

        // 1. Live reads into the store
        self.sample_live(hw, sink);

        // 2. Resolve every channel once
        let snapshot = self.ctx.store().snapshot();
        self.last_snapshot = Some(snapshot);

        // 3. Classify
        let level = alert::evaluate(&snapshot, &self.thresholds);

        // 4. Drive actuators (writes only on change)
        let actuators = self.actuators.apply(level, hw);

        // 5. Publish level
        let prev = self.ctx.set_alert_level(level);
        if prev != level {
            info!("Sampler: alert {} -> {}", prev, level);
            sink.emit(&AppEvent::AlertChanged {
                from: prev,
                to: level,
            });
        }

        // 6. Scenario step
        let scenario = self.ctx.advance_scenario(now);

        // 7. Telemetry
        let record = TelemetryRecord::new(now, &scenario, &snapshot, actuators, level);
        sink.emit(&AppEvent::Telemetry(record.clone()));
        record
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn context(&self) -> &Arc<MonitorContext> {
        &self.ctx
    }

    pub fn alert_level(&self) -> AlertLevel {
        self.ctx.alert_level()
    }

    /// Snapshot of the most recent tick.
    pub fn last_snapshot(&self) -> Option<ReadingSnapshot> {
        self.last_snapshot
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn sample_live(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) {
        let ctx = Arc::clone(&self.ctx);
        let store = ctx.store();

        let dht22 = hw.read_dht22().map(|(t, h)| {
            store.write_live(Channel::Temperature, t);
            store.write_live(Channel::Humidity, h);
        });
        self.note_result(SensorGroup::Dht22, dht22, sink);

        let ldr = hw
            .read_ldr()
            .map(|raw| store.write_live(Channel::LightRaw, f32::from(raw)));
        self.note_result(SensorGroup::Ldr, ldr, sink);

        let mpu = hw.read_mpu6050().map(|(x, y, z)| {
            store.write_live(Channel::AccelX, x);
            store.write_live(Channel::AccelY, y);
            store.write_live(Channel::AccelZ, z);
        });
        self.note_result(SensorGroup::Mpu6050, mpu, sink);
    }

    /// On failure, NaN the group's live channels. Faults are logged and
    /// emitted on the edge only, not every tick they persist.
    fn note_result(
        &mut self,
        group: SensorGroup,
        result: Result<(), SensorError>,
        sink: &mut impl EventSink,
    ) {
        let slot = group_slot(group);
        match result {
            Ok(()) => {
                if self.faulted[slot] {
                    info!("Sampler: {} recovered", group.name());
                    self.faulted[slot] = false;
                }
            }
            Err(e) => {
                for &ch in group.channels() {
                    self.ctx.store().write_live(ch, f32::NAN);
                }
                if !self.faulted[slot] {
                    warn!("Sampler: {}", e);
                    sink.emit(&AppEvent::SensorFault(e));
                    self.faulted[slot] = true;
                }
            }
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
