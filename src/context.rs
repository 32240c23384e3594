//! Monitor context: the one object every execution context shares.
//!
//! Holds the channel store, the scenario tracker, the current alert level
//! and the clock. The sampler and every control-plane request reach shared
//! state only through an `Arc<MonitorContext>`; there are no globals.
//!
//! | Field      | Written by            | Guard                  |
//! |------------|-----------------------|------------------------|
//! | `store`    | sampler, gateway      | per-channel `Mutex`    |
//! | `scenario` | sampler, control plane| `Mutex`                |
//! | `alert`    | sampler               | `AtomicU8`             |

use core::sync::atomic::{AtomicU8, Ordering};
use core::time::Duration;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::alert::AlertLevel;
use crate::app::ports::TimePort;
use crate::error::ControlError;
use crate::scenario::{ScenarioName, ScenarioTracker};
use crate::store::ChannelStore;

/// Point-in-time view of the scenario tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioStatus {
    pub name: ScenarioName,
    pub step: u32,
    pub elapsed: Duration,
}

pub struct MonitorContext {
    store: ChannelStore,
    scenario: Mutex<ScenarioTracker>,
    alert: AtomicU8,
    clock: Box<dyn TimePort>,
}

impl MonitorContext {
    pub fn new(initial_scenario: ScenarioName, clock: Box<dyn TimePort>) -> Self {
        let now = clock.uptime();
        Self {
            store: ChannelStore::new(),
            scenario: Mutex::new(ScenarioTracker::new(initial_scenario, now)),
            alert: AtomicU8::new(AlertLevel::Normal as u8),
            clock,
        }
    }

    pub fn store(&self) -> &ChannelStore {
        &self.store
    }

    /// Monotonic uptime.
    pub fn now(&self) -> Duration {
        self.clock.uptime()
    }

    /// Level computed by the most recent tick (`Normal` before the first).
    pub fn alert_level(&self) -> AlertLevel {
        AlertLevel::from_u8(self.alert.load(Ordering::Acquire))
    }

    /// Publish a new level, returning the previous one.
    pub fn set_alert_level(&self, level: AlertLevel) -> AlertLevel {
        AlertLevel::from_u8(self.alert.swap(level as u8, Ordering::AcqRel))
    }

    /// Scenario name, last computed step and time since the last change.
    pub fn scenario_status(&self) -> ScenarioStatus {
        let now = self.now();
        let tracker = self.tracker();
        Self::status_of(&tracker, now)
    }

    /// Recompute the step for `now`.
    pub fn advance_scenario(&self, now: Duration) -> ScenarioStatus {
        let mut tracker = self.tracker();
        tracker.advance(now);
        Self::status_of(&tracker, now)
    }

    /// Switch scenario at the current uptime. The tracker is left
    /// unchanged when `name` is rejected.
    pub fn change_scenario(&self, name: &str) -> Result<ScenarioStatus, ControlError> {
        let now = self.now();
        let mut tracker = self.tracker();
        tracker.change(name, now)?;
        Ok(Self::status_of(&tracker, now))
    }

    fn tracker(&self) -> MutexGuard<'_, ScenarioTracker> {
        self.scenario.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn status_of(tracker: &ScenarioTracker, now: Duration) -> ScenarioStatus {
        let mut name = ScenarioName::new();
        // Same capacity on both sides, cannot overflow.
        let _ = name.push_str(tracker.name());
        ScenarioStatus {
            name,
            step: tracker.step(),
            elapsed: tracker.elapsed(now),
        }
    }
}
