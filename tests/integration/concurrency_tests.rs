//! Sampler and control plane running on separate threads against one
//! context. Every resolved value must be one some writer actually wrote.

use std::sync::Arc;
use std::thread;

use mnemon::alert::AlertThresholds;
use mnemon::adapters::time::ManualClock;
use mnemon::app::service::MonitorService;
use mnemon::context::MonitorContext;
use mnemon::control::ControlPlane;
use mnemon::gateway::OverrideCommand;
use mnemon::scenario;
use mnemon::sensors::{Channel, SensorGroup};

use crate::mock_hw::{MockHardware, RecordingSink};

const WRITERS: usize = 4;
const WRITES_PER_THREAD: usize = 500;
const TICKS: usize = 500;

/// Override value written by writer `w`.
fn writer_value(w: usize) -> f32 {
    100.0 + w as f32
}

#[test]
fn overrides_and_ticks_never_tear() {
    let ctx = Arc::new(MonitorContext::new(
        scenario::default_name(),
        Box::new(ManualClock::new()),
    ));
    let cp = ControlPlane::new(Arc::clone(&ctx));
    let mut svc = MonitorService::new(Arc::clone(&ctx), AlertThresholds::default());

    thread::scope(|s| {
        for w in 0..WRITERS {
            let cp = cp.clone();
            s.spawn(move || {
                let v = writer_value(w);
                let set = OverrideCommand::new(SensorGroup::Dht22)
                    .with(Channel::Temperature, v)
                    .and_then(|c| c.with(Channel::Humidity, v))
                    .unwrap();
                for i in 0..WRITES_PER_THREAD {
                    if i % 3 == 2 {
                        cp.set_channel_override(&OverrideCommand::disable(SensorGroup::Dht22));
                    } else {
                        cp.set_channel_override(&set);
                    }
                }
            });
        }

        let status_cp = cp.clone();
        s.spawn(move || {
            for _ in 0..WRITES_PER_THREAD {
                let _ = status_cp.get_status();
            }
        });

        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::new();
        let allowed = |live: f32, t: f32| t == live || (0..WRITERS).any(|w| writer_value(w) == t);
        for _ in 0..TICKS {
            let rec = svc.tick(&mut hw, &mut sink);
            let snap = svc.last_snapshot().unwrap();
            assert!(allowed(22.0, snap.temperature_c), "torn temperature {}", snap.temperature_c);
            assert!(allowed(40.0, snap.humidity_pct), "torn humidity {}", snap.humidity_pct);
            assert!(rec.sensors.dht22.temperature.is_some());
            sink.events.clear();
        }
    });

    // Writers finished: the cell holds exactly one writer's value.
    let cell = ctx.store().cell(Channel::Temperature);
    assert!((0..WRITERS).any(|w| writer_value(w) == cell.override_value));
    assert_eq!(cell.live_value, 22.0);
}

#[test]
fn reset_races_with_overrides_without_deadlock() {
    let ctx = Arc::new(MonitorContext::new(
        scenario::default_name(),
        Box::new(ManualClock::new()),
    ));
    let cp = ControlPlane::new(ctx);

    thread::scope(|s| {
        for g in SensorGroup::ALL {
            let cp = cp.clone();
            s.spawn(move || {
                let ch = g.channels()[0];
                let cmd = OverrideCommand::new(g).with(ch, ch.default_value()).unwrap();
                for _ in 0..200 {
                    cp.set_channel_override(&cmd);
                }
            });
        }
        let cp = cp.clone();
        s.spawn(move || {
            for _ in 0..200 {
                cp.reset_overrides();
            }
        });
    });

    cp.reset_overrides();
    assert!(!cp.context().store().any_override_active());
}
