//! Sample cadence gate.
//!
//! The main loop wakes at the scheduling granularity (100 ms by default)
//! and asks the scheduler whether a sampling tick is due. When one is,
//! the scheduler notifies a [`SchedulerDelegate`]; the main loop
//! implements the delegate by running one monitor tick.
//!
//! ```text
//!   main loop ──poll every 100 ms──▶ SampleScheduler
//!                                        │ due (every 2 s)
//!                                        ▼
//!                               SchedulerDelegate::on_sample_due
//!                                        │
//!                                        ▼
//!                               MonitorService::tick()
//! ```
//!
//! The first poll is always due. A late poll fires once and re-anchors the
//! cadence at that poll: missed intervals are skipped, never replayed.

use core::time::Duration;

use log::{debug, info};

use crate::app::ports::SchedulerDelegate;

pub struct SampleScheduler {
    interval: Duration,
    last_fire: Option<Duration>,
}

impl SampleScheduler {
    pub fn new(interval: Duration) -> Self {
        info!("Scheduler: sampling every {} ms", interval.as_millis());
        Self {
            interval,
            last_fire: None,
        }
    }

    /// Whether a tick is due at uptime `now`. Consumes the tick when it is.
    pub fn poll(&mut self, now: Duration) -> bool {
        let due = match self.last_fire {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        };
        if !due {
            return false;
        }

        if let Some(last) = self.last_fire {
            let late = now.saturating_sub(last);
            if !self.interval.is_zero() && late >= self.interval * 2 {
                let missed = late.as_nanos() / self.interval.as_nanos() - 1;
                debug!("Scheduler: {} interval(s) missed, not replayed", missed);
            }
        }
        self.last_fire = Some(now);
        true
    }

    /// Poll and notify `delegate` when a tick is due.
    pub fn tick(&mut self, now: Duration, delegate: &mut dyn SchedulerDelegate) {
        if self.poll(now) {
            delegate.on_sample_due(now);
        }
    }

    /// Time until the next tick is due (zero if it already is). The main
    /// loop sleeps no longer than this.
    pub fn until_next(&self, now: Duration) -> Duration {
        match self.last_fire {
            None => Duration::ZERO,
            Some(last) => (last + self.interval).saturating_sub(now),
        }
    }
}
