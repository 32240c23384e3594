//! Scenario tracker: a named, time-driven step counter.
//!
//! A scenario tells an operator which script of test conditions is being
//! played and how far along it is. It has no influence on alerting.
//!
//! ```text
//!   change(name) ──▶ start := now, step := 0
//!   advance(now) ──▶ step := floor(elapsed / interval) mod count + 1
//! ```
//!
//! Names outside [`SCENARIOS`] are accepted; their step is never advanced
//! and stays at whatever the last change left it (0).

use core::time::Duration;

use log::info;

use crate::error::ControlError;

/// Longest accepted scenario name, in bytes.
pub const MAX_NAME_LEN: usize = 32;

pub type ScenarioName = heapless::String<MAX_NAME_LEN>;

/// Timing of one known scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioSpec {
    pub name: &'static str,
    pub step_interval_secs: u32,
    pub step_count: u32,
}

pub const SCENARIOS: [ScenarioSpec; 3] = [
    ScenarioSpec {
        name: "sensor_validation",
        step_interval_secs: 10,
        step_count: 8,
    },
    ScenarioSpec {
        name: "realistic_conditions",
        step_interval_secs: 30,
        step_count: 10,
    },
    ScenarioSpec {
        name: "extreme_conditions",
        step_interval_secs: 20,
        step_count: 6,
    },
];

pub fn lookup(name: &str) -> Option<&'static ScenarioSpec> {
    SCENARIOS.iter().find(|s| s.name == name)
}

/// Scenario active at boot unless configured otherwise.
pub fn default_name() -> ScenarioName {
    ScenarioName::try_from(SCENARIOS[0].name).unwrap_or_default()
}

/// Step (1-based) reached after `elapsed` in `spec`.
pub fn step_for(spec: &ScenarioSpec, elapsed: Duration) -> u32 {
    let interval = u64::from(spec.step_interval_secs.max(1));
    let count = u64::from(spec.step_count.max(1));
    // The modulo keeps the result below `count`, which came from a u32.
    ((elapsed.as_secs() / interval) % count + 1) as u32
}

/// Parse a caller-supplied name. Empty or over-long names are rejected.
pub fn parse_name(name: &str) -> Result<ScenarioName, ControlError> {
    if name.is_empty() {
        return Err(ControlError::InvalidScenario);
    }
    ScenarioName::try_from(name).map_err(|_| ControlError::InvalidScenario)
}

#[derive(Debug, Clone)]
pub struct ScenarioTracker {
    name: ScenarioName,
    spec: Option<&'static ScenarioSpec>,
    start: Duration,
    step: u32,
}

impl ScenarioTracker {
    /// Start tracking `name` at uptime `now`.
    pub fn new(name: ScenarioName, now: Duration) -> Self {
        let spec = lookup(&name);
        Self {
            name,
            spec,
            start: now,
            step: 0,
        }
    }

    /// Switch to a new scenario. Restarts the clock even when `name` is
    /// the one already active.
    pub fn change(&mut self, name: &str, now: Duration) -> Result<(), ControlError> {
        let name = parse_name(name)?;
        info!("Scenario: '{}' -> '{}'", self.name, name);
        *self = Self::new(name, now);
        if !self.is_known() {
            info!("Scenario: '{}' is not a known scenario, step will not advance", self.name);
        }
        Ok(())
    }

    /// Recompute the step for uptime `now` and return it.
    pub fn advance(&mut self, now: Duration) -> u32 {
        if let Some(spec) = self.spec {
            self.step = step_for(spec, self.elapsed(now));
        }
        self.step
    }

    /// Time since the scenario last changed.
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start)
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the active name is one of [`SCENARIOS`].
    pub fn is_known(&self) -> bool {
        self.spec.is_some()
    }
}
