//! End-to-end sampler tests: control-plane writes flowing through the
//! store, evaluator and actuators into telemetry.

use std::sync::Arc;
use std::time::Duration;

use mnemon::alert::{AlertLevel, AlertThresholds};
use mnemon::adapters::time::ManualClock;
use mnemon::app::events::AppEvent;
use mnemon::app::service::MonitorService;
use mnemon::context::MonitorContext;
use mnemon::control::ControlPlane;
use mnemon::drivers::{ActuatorColor, BuzzerState};
use mnemon::error::SensorError;
use mnemon::gateway::OverrideCommand;
use mnemon::scenario;
use mnemon::scheduler::SampleScheduler;
use mnemon::sensors::{Channel, SensorGroup};

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

struct Rig {
    clock: ManualClock,
    service: MonitorService,
    control: ControlPlane,
    hw: MockHardware,
    sink: RecordingSink,
}

fn rig() -> Rig {
    let clock = ManualClock::new();
    let ctx = Arc::new(MonitorContext::new(
        scenario::default_name(),
        Box::new(clock.clone()),
    ));
    Rig {
        clock,
        service: MonitorService::new(Arc::clone(&ctx), AlertThresholds::default()),
        control: ControlPlane::new(ctx),
        hw: MockHardware::new(),
        sink: RecordingSink::new(),
    }
}

impl Rig {
    fn tick(&mut self) -> mnemon::telemetry::TelemetryRecord {
        self.service.tick(&mut self.hw, &mut self.sink)
    }
}

#[test]
fn start_darkens_actuators_and_announces() {
    let mut r = rig();
    r.service.start(&mut r.hw, &mut r.sink);
    assert_eq!(r.hw.calls, vec![ActuatorCall::AllOff]);
    assert!(matches!(
        r.sink.events.as_slice(),
        [AppEvent::Started { scenario }] if scenario.as_str() == "sensor_validation"
    ));
}

#[test]
fn temperature_override_drives_critical_then_reset_restores() {
    let mut r = rig();
    r.service.start(&mut r.hw, &mut r.sink);

    let rec = r.tick();
    assert_eq!(rec.alert_level, AlertLevel::Normal);
    assert_eq!(r.hw.led(), (false, true, false));

    let cmd = OverrideCommand::new(SensorGroup::Dht22)
        .with(Channel::Temperature, 50.0)
        .unwrap();
    let out = r.control.set_channel_override(&cmd);
    assert!(out.active);

    let rec = r.tick();
    assert_eq!(rec.sensors.dht22.temperature, Some(50.0));
    assert_eq!(rec.sensors.dht22.humidity, Some(40.0));
    assert_eq!(rec.alert_level, AlertLevel::Critical);
    assert_eq!(rec.actuators.rgb_led, ActuatorColor::Red);
    assert_eq!(rec.actuators.buzzer, BuzzerState::On);
    assert_eq!(r.hw.led(), (true, false, false));
    assert!(r.hw.buzzer_on());
    assert_eq!(r.control.get_status().alert_level, AlertLevel::Critical);

    r.control.reset_overrides();
    let rec = r.tick();
    assert_eq!(rec.sensors.dht22.temperature, Some(22.0));
    assert_eq!(rec.sensors.dht22.humidity, Some(40.0));
    assert_eq!(rec.alert_level, AlertLevel::Normal);
    assert_eq!(r.hw.led(), (false, true, false));
    assert!(!r.hw.buzzer_on());
}

#[test]
fn steady_level_does_not_rewrite_outputs() {
    let mut r = rig();
    for _ in 0..5 {
        r.tick();
    }
    assert_eq!(r.hw.led_writes(), 1);
}

#[test]
fn warning_shows_yellow_without_buzzer() {
    let mut r = rig();
    r.hw.dht22 = Ok((36.0, 40.0));
    let rec = r.tick();
    assert_eq!(rec.alert_level, AlertLevel::Warning);
    assert_eq!(rec.actuators.rgb_led, ActuatorColor::Yellow);
    assert_eq!(r.hw.led(), (true, true, false));
    assert!(!r.hw.buzzer_on());
}

#[test]
fn accel_override_on_one_axis_raises_alert() {
    let mut r = rig();
    let cmd = OverrideCommand::new(SensorGroup::Mpu6050)
        .with(Channel::AccelX, 1.75)
        .unwrap();
    r.control.set_channel_override(&cmd);
    let rec = r.tick();
    // |(1.75, 0, 1)| ≈ 2.02 g
    assert_eq!(rec.alert_level, AlertLevel::Critical);
    assert_eq!(rec.sensors.mpu6050.accel_x, Some(1.75));
    assert_eq!(rec.sensors.mpu6050.accel_z, Some(1.0));
}

#[test]
fn faulted_group_reports_null_until_recovery() {
    let mut r = rig();
    r.hw.ldr = Err(SensorError::ReadFailed(SensorGroup::Ldr));
    let rec = r.tick();
    assert_eq!(rec.sensors.ldr.raw, None);
    assert_eq!(rec.sensors.ldr.lux, None);
    assert_eq!(rec.alert_level, AlertLevel::Normal);

    r.hw.ldr = Ok(1000);
    let rec = r.tick();
    assert_eq!(rec.sensors.ldr.raw, Some(1000));
    assert_eq!(
        r.sink.count(|e| matches!(e, AppEvent::SensorFault(_))),
        1
    );
}

#[test]
fn override_masks_a_faulted_channel() {
    let mut r = rig();
    r.hw.dht22 = Err(SensorError::Timeout(SensorGroup::Dht22));
    let cmd = OverrideCommand::new(SensorGroup::Dht22)
        .with(Channel::Temperature, 30.0)
        .unwrap();
    r.control.set_channel_override(&cmd);
    let rec = r.tick();
    assert_eq!(rec.sensors.dht22.temperature, Some(30.0));
    // Humidity was not sent, so it still reports the failed live read.
    assert_eq!(rec.sensors.dht22.humidity, None);
}

#[test]
fn temperature_only_override_keeps_live_humidity_alert() {
    let mut r = rig();
    r.hw.dht22 = Ok((22.0, 85.0));
    let rec = r.tick();
    assert_eq!(rec.alert_level, AlertLevel::Warning);

    let cmd = OverrideCommand::new(SensorGroup::Dht22)
        .with(Channel::Temperature, 30.0)
        .unwrap();
    r.control.set_channel_override(&cmd);

    let rec = r.tick();
    assert_eq!(rec.sensors.dht22.temperature, Some(30.0));
    assert_eq!(rec.sensors.dht22.humidity, Some(85.0));
    assert_eq!(rec.alert_level, AlertLevel::Warning);
}

#[test]
fn scenario_step_follows_elapsed_time() {
    let mut r = rig();
    assert_eq!(r.tick().step, 1);

    r.clock.advance(Duration::from_secs(25));
    let rec = r.tick();
    assert_eq!(rec.step, 3);
    assert_eq!(rec.elapsed_seconds, 25);
    assert_eq!(rec.timestamp, 25_000);

    let report = r.control.change_scenario("realistic_conditions").unwrap();
    assert_eq!(report.scenario.as_str(), "realistic_conditions");
    let rec = r.tick();
    assert_eq!(rec.scenario.as_str(), "realistic_conditions");
    assert_eq!(rec.step, 1);
    assert_eq!(rec.elapsed_seconds, 0);
}

#[test]
fn scheduler_drives_one_tick_per_interval() {
    struct Delegate<'a>(&'a mut Rig);

    impl mnemon::app::ports::SchedulerDelegate for Delegate<'_> {
        fn on_sample_due(&mut self, _now: Duration) {
            self.0.tick();
        }
    }

    let mut r = rig();
    let clock = r.clock.clone();
    let mut sched = SampleScheduler::new(Duration::from_secs(2));
    let mut delegate = Delegate(&mut r);

    // 10 s at 100 ms granularity.
    for _ in 0..100 {
        sched.tick(mnemon::app::ports::TimePort::uptime(&clock), &mut delegate);
        clock.advance(Duration::from_millis(100));
    }
    assert_eq!(r.service.tick_count(), 5);
}
