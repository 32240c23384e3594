//! Control-plane operations against a live store: overrides versus the
//! sampler's live writes, scenario changes, and partial group updates.

use std::sync::Arc;
use std::time::Duration;

use mnemon::alert::AlertThresholds;
use mnemon::adapters::time::ManualClock;
use mnemon::app::service::MonitorService;
use mnemon::context::MonitorContext;
use mnemon::control::ControlPlane;
use mnemon::error::ControlError;
use mnemon::gateway::OverrideCommand;
use mnemon::scenario;
use mnemon::sensors::{Channel, SensorGroup};

use crate::mock_hw::{MockHardware, RecordingSink};

fn setup() -> (ControlPlane, MonitorService, ManualClock) {
    let clock = ManualClock::new();
    let ctx = Arc::new(MonitorContext::new(
        scenario::default_name(),
        Box::new(clock.clone()),
    ));
    let service = MonitorService::new(Arc::clone(&ctx), AlertThresholds::default());
    (ControlPlane::new(ctx), service, clock)
}

#[test]
fn live_writes_never_clear_an_override() {
    let (cp, mut svc, _) = setup();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    let cmd = OverrideCommand::new(SensorGroup::Ldr)
        .with(Channel::LightRaw, 4000.0)
        .unwrap();
    cp.set_channel_override(&cmd);

    for raw in [10, 500, 3000] {
        hw.ldr = Ok(raw);
        let rec = svc.tick(&mut hw, &mut sink);
        assert_eq!(rec.sensors.ldr.raw, Some(4000));
    }
    let cell = cp.context().store().cell(Channel::LightRaw);
    assert_eq!(cell.live_value, 3000.0);
    assert!(cell.override_active);
}

#[test]
fn disable_then_bare_post_stays_live() {
    let (cp, _, _) = setup();
    let store = cp.context().store();

    let set = OverrideCommand::new(SensorGroup::Mpu6050)
        .with(Channel::AccelX, 0.5)
        .unwrap();
    cp.set_channel_override(&set);

    let out = cp.set_channel_override(&OverrideCommand::disable(SensorGroup::Mpu6050));
    assert!(!out.active);
    assert_eq!(out.value(Channel::AccelX), Some(0.5));
    assert_eq!(store.read(Channel::AccelX), 0.0);

    // No fields: nothing to override.
    let out = cp.set_channel_override(&OverrideCommand::new(SensorGroup::Mpu6050));
    assert!(!out.active);
    assert_eq!(store.read(Channel::AccelX), 0.0);

    let out = cp.set_channel_override(&set);
    assert!(out.active);
    assert_eq!(store.read(Channel::AccelX), 0.5);
    assert!(!store.cell(Channel::AccelZ).override_active);
}

#[test]
fn groups_are_independent() {
    let (cp, _, _) = setup();
    let cmd = OverrideCommand::new(SensorGroup::Dht22)
        .with(Channel::Humidity, 95.0)
        .unwrap();
    cp.set_channel_override(&cmd);

    let flags = cp.get_status().overrides;
    assert!(flags.dht22);
    assert!(!flags.ldr);
    assert!(!flags.mpu6050);
}

#[test]
fn rejected_scenario_leaves_tracker_alone() {
    let (cp, mut svc, clock) = setup();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    clock.advance(Duration::from_secs(15));
    svc.tick(&mut hw, &mut sink);

    assert_eq!(cp.change_scenario(""), Err(ControlError::InvalidScenario));
    let too_long = "x".repeat(scenario::MAX_NAME_LEN + 1);
    assert_eq!(
        cp.change_scenario(&too_long),
        Err(ControlError::InvalidScenario)
    );

    let s = cp.get_status();
    assert_eq!(s.scenario.as_str(), "sensor_validation");
    assert_eq!(s.step, 2);
}

#[test]
fn unknown_scenario_is_accepted_but_holds_step() {
    let (cp, mut svc, clock) = setup();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    cp.change_scenario("night_shift").unwrap();
    clock.advance(Duration::from_secs(120));
    let rec = svc.tick(&mut hw, &mut sink);
    assert_eq!(rec.scenario.as_str(), "night_shift");
    assert_eq!(rec.step, 0);
    assert_eq!(rec.elapsed_seconds, 120);
}

#[test]
fn reset_is_idempotent() {
    let (cp, _, _) = setup();
    assert!(cp.reset_overrides().success);
    assert!(cp.reset_overrides().success);
    assert!(!cp.context().store().any_override_active());
}
