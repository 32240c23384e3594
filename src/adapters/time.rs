//! Monotonic clocks implementing [`TimePort`].
//!
//! - [`SystemClock`]: `std::time::Instant` since construction.
//! - [`ManualClock`]: advanced by hand; shared between a test and the
//!   context that reads it.

use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use std::sync::Arc;
use std::time::Instant;

use crate::app::ports::TimePort;

pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TimePort for SystemClock {
    fn uptime(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        let us = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        self.micros.fetch_add(us, Ordering::AcqRel);
    }

    pub fn set(&self, to: Duration) {
        let us = u64::try_from(to.as_micros()).unwrap_or(u64::MAX);
        self.micros.store(us, Ordering::Release);
    }
}

impl TimePort for ManualClock {
    fn uptime(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::Acquire))
    }
}
